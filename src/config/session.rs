//! Interactive session configuration.

pub struct SessionConfig {
    /// Bounded wait for the opening choice (seconds)
    pub search_timeout_secs: u64,
    /// Bounded wait for every later step (seconds)
    pub step_timeout_secs: u64,
}

pub const SESSION: SessionConfig = SessionConfig {
    search_timeout_secs: 120,
    step_timeout_secs: 60,
};
