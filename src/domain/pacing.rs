use std::thread;
use std::time::Duration;

/// Called between two consecutive page requests at the same level.
pub trait RateLimiter {
    fn wait_between_pages(&mut self);
}

/// Static pause; GitHub's secondary rate limits dislike bursts.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl RateLimiter for FixedDelay {
    fn wait_between_pages(&mut self) {
        if !self.0.is_zero() {
            thread::sleep(self.0);
        }
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[cfg(test)]
impl RateLimiter for NoDelay {
    fn wait_between_pages(&mut self) {}
}
