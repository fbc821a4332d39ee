//! Monotonic millisecond clock

/// Millisecond clock; wraps at `u32::MAX`
///
/// All timer arithmetic is wrapping, so a free-running 32-bit counter is
/// enough.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
