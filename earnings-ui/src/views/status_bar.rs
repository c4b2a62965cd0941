//! Status bar holding the most recent notice.
//!
//! A notice disappears on its own once its time-to-live has passed, or
//! earlier when dismissed.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct StatusBar {
    ttl: Duration,
    notice: Option<(String, Instant)>,
}

impl StatusBar {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, notice: None }
    }

    /// Replaces any current notice; it expires `ttl` after `now`.
    pub fn show(
        &mut self,
        message: impl Into<String>,
        now: Instant,
    ) {
        self.notice = Some((message.into(), now + self.ttl));
    }

    /// The notice, if it has not expired by `now`.
    pub fn current(
        &self,
        now: Instant,
    ) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|(_, expires_at)| now < *expires_at)
            .map(|(message, _)| message.as_str())
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.notice.as_ref().map(|(_, expires_at)| *expires_at)
    }

    /// Drops the notice if it has expired. Returns `true` when one was dropped.
    pub fn expire(
        &mut self,
        now: Instant,
    ) -> bool {
        let expired = self.expires_at().is_some_and(|at| now >= at);
        if expired {
            self.notice = None;
        }
        expired
    }

    pub fn dismiss(&mut self) {
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn notice_is_visible_until_ttl() {
        let start = Instant::now();
        let mut bar = StatusBar::new(Duration::from_secs(3));

        bar.show("Invalid State", start);

        assert_eq!(bar.current(start), Some("Invalid State"));
        assert_eq!(bar.current(start + Duration::from_millis(2999)), Some("Invalid State"));
        assert_eq!(bar.current(start + Duration::from_secs(3)), None);
    }

    #[test]
    fn expire_drops_only_stale_notice() {
        let start = Instant::now();
        let mut bar = StatusBar::new(Duration::from_secs(3));
        bar.show("Invalid input values", start);

        assert!(!bar.expire(start + Duration::from_secs(1)));
        assert!(bar.expires_at().is_some());
        assert!(bar.expire(start + Duration::from_secs(3)));
        assert_eq!(bar.expires_at(), None);
    }

    #[test]
    fn new_notice_restarts_the_clock() {
        let start = Instant::now();
        let mut bar = StatusBar::new(Duration::from_secs(3));
        bar.show("first", start);

        bar.show("second", start + Duration::from_secs(2));

        assert_eq!(bar.current(start + Duration::from_secs(4)), Some("second"));
    }

    #[test]
    fn dismiss_clears_immediately() {
        let start = Instant::now();
        let mut bar = StatusBar::new(Duration::from_secs(3));
        bar.show("Required fields cannot be empty", start);

        bar.dismiss();

        assert_eq!(bar.current(start), None);
    }
}
