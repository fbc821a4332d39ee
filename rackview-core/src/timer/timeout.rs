//! One-shot millisecond timeout

/// One-shot timeout against a wrapping millisecond clock
///
/// Fires on the first poll where strictly more than `duration_ms` elapsed
/// since `start`. A zero duration disables the timeout without disarming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeout {
    started_at: Option<u32>,
    duration_ms: u32,
}

impl Timeout {
    /// Create a disarmed timeout
    pub const fn new(duration_ms: u32) -> Self {
        Self {
            started_at: None,
            duration_ms,
        }
    }

    /// Arm (or re-arm) the timeout
    pub fn start(&mut self, now_ms: u32) {
        self.started_at = Some(now_ms);
    }

    /// Disarm without firing
    pub fn cancel(&mut self) {
        self.started_at = None;
    }

    /// Check if the timeout is armed
    pub const fn is_armed(&self) -> bool {
        self.started_at.is_some()
    }

    /// Configured duration
    pub const fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Change the duration, keeping the start time
    pub fn set_duration(&mut self, duration_ms: u32) {
        self.duration_ms = duration_ms;
    }

    /// Check if the timeout has expired, without consuming it
    pub fn is_expired(&self, now_ms: u32) -> bool {
        match self.started_at {
            Some(start) if self.duration_ms != 0 => now_ms.wrapping_sub(start) > self.duration_ms,
            _ => false,
        }
    }

    /// Fire at most once: returns `true` and disarms on expiry
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if self.is_expired(now_ms) {
            self.started_at = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_strictly_after_duration() {
        let mut t = Timeout::new(3000);
        t.start(1000);
        assert!(!t.poll(4000));
        assert!(t.poll(4001));
        assert!(!t.is_armed());
        assert!(!t.poll(9000));
    }

    #[test]
    fn test_disarmed_never_fires() {
        let mut t = Timeout::new(10);
        assert!(!t.poll(1_000_000));
    }

    #[test]
    fn test_zero_duration_disables() {
        let mut t = Timeout::new(0);
        t.start(0);
        assert!(!t.poll(u32::MAX));
        assert!(t.is_armed());

        // Re-enabling keeps the original start
        t.set_duration(100);
        assert!(t.poll(101));
    }

    #[test]
    fn test_clock_wraparound() {
        let mut t = Timeout::new(300);
        t.start(u32::MAX - 100);
        assert!(!t.poll(150));
        assert!(t.poll(200));
    }

    #[test]
    fn test_restart_extends() {
        let mut t = Timeout::new(100);
        t.start(0);
        t.start(80);
        assert!(!t.poll(150));
        assert!(t.poll(181));
    }
}
