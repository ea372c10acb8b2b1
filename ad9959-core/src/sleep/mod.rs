use std::time::Duration;

#[cfg(feature = "std")]
pub use spin_sleep::SpinSleeper;

/// A trait for blocking waits such as the settle delay between frames.
pub trait Sleep: std::fmt::Debug {
    /// Blocks the current thread for the specified duration.
    fn sleep(&self, duration: Duration);
}

// GRCOV_EXCL_START
impl Sleep for Box<dyn Sleep> {
    fn sleep(&self, duration: Duration) {
        self.as_ref().sleep(duration);
    }
}

impl<S: Sleep> Sleep for &S {
    fn sleep(&self, duration: Duration) {
        (*self).sleep(duration);
    }
}
// GRCOV_EXCL_STOP

/// A sleeper that uses [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StdSleeper;

impl Sleep for StdSleeper {
    fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        std::thread::sleep(duration);
    }
}

#[cfg(feature = "std")]
impl Sleep for SpinSleeper {
    fn sleep(&self, duration: Duration) {
        SpinSleeper::sleep(*self, duration);
    }
}

/// A sleeper that uses a spin loop to wait until the deadline is reached.
///
/// The settle delay is far below the scheduler granularity of most desktop systems, so this is the
/// most accurate choice for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpinWaitSleeper;

impl Sleep for SpinWaitSleeper {
    fn sleep(&self, duration: Duration) {
        use std::time::Instant;

        let deadline = Instant::now() + duration;
        while Instant::now() < deadline {
            std::hint::spin_loop();
        }
    }
}
