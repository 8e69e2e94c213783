//! Helpers shared by the integration tests.

use std::future::Future;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Drive a storage future to completion on the current thread.
///
/// Every backend in this crate resolves without waking, so a no-op waker is
/// enough.
pub fn block_on<F: Future>(f: F) -> F::Output {
    fn noop_raw_waker() -> RawWaker {
        fn noop(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            noop_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        if let Poll::Ready(output) = f.as_mut().poll(&mut cx) {
            return output;
        }
    }
}
