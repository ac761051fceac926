//! Watching sessions stored as Redis sorted sets.

mod repository;
mod source;

pub use repository::WatchingSessionRepository;
pub use source::WatchingSessionPageSource;

/// Sizing of the candidate window read for one page.
///
/// The window holds `min(limit * factor, cap)` members, and never fewer
/// than `limit + 1` so a further page can still be detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverfetchPolicy {
    pub factor: u32,
    pub cap: u32,
}

impl Default for OverfetchPolicy {
    fn default() -> Self {
        Self {
            factor: 5,
            cap: 2000,
        }
    }
}

impl OverfetchPolicy {
    pub fn new(factor: u32, cap: u32) -> Self {
        Self { factor, cap }
    }

    /// Returns the number of members to read for a page of `limit`.
    pub fn fetch_size(self, limit: u32) -> usize {
        let window = limit.saturating_mul(self.factor).min(self.cap);
        window.max(limit.saturating_add(1)) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_capped() {
        let policy = OverfetchPolicy::default();
        assert_eq!(policy.fetch_size(20), 100);
        assert_eq!(policy.fetch_size(400), 2000);
        assert_eq!(policy.fetch_size(1000), 2000);
    }

    #[test]
    fn window_always_detects_next_page() {
        assert_eq!(OverfetchPolicy::new(1, 2000).fetch_size(10), 11);
        assert_eq!(OverfetchPolicy::new(5, 3).fetch_size(10), 11);
    }
}
