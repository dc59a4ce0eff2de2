use std::time::{Duration, Instant};

/// Start instant of the current broadcast session, if any
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionClock {
    started_at: Option<Instant>,
}

impl SessionClock {
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    pub fn clear(&mut self) {
        self.started_at = None;
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        self.started_at.map(|start| now.saturating_duration_since(start))
    }
}

/// `MM:SS` with whole seconds truncated
pub fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
