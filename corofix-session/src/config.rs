/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Session configuration.
//!
//! [`SessionConfig`] is immutable for the session lifetime and outlives the
//! session that borrows it.

use corofix_core::types::CompId;
use std::time::Duration;

/// Configuration for a FIX session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sender CompID (tag 49).
    pub sender_comp_id: CompId,
    /// Target CompID (tag 56).
    pub target_comp_id: CompId,
    /// FIX version BeginString (e.g., "FIX.4.4").
    pub begin_string: String,
    /// Heartbeat interval (HeartBtInt, tag 108).
    pub heartbeat_interval: Duration,
    /// How long to wait for the Logon response.
    pub logon_timeout: Duration,
    /// How long to wait for the Logout response.
    pub logout_timeout: Duration,
    /// Maximum reconnect attempts before the supervisor gives up.
    pub max_reconnect_attempts: u32,
    /// Base reconnect interval; doubled on each attempt, capped at 60s.
    pub reconnect_interval: Duration,
    /// Whether to request a sequence-number reset on logon (tag 141).
    pub reset_seq_on_logon: bool,
    /// Whether to validate incoming message checksums.
    pub validate_checksum: bool,
}

impl SessionConfig {
    /// Creates a new session configuration with required fields and
    /// conventional defaults.
    #[must_use]
    pub fn new(
        sender_comp_id: CompId,
        target_comp_id: CompId,
        begin_string: impl Into<String>,
    ) -> Self {
        Self {
            sender_comp_id,
            target_comp_id,
            begin_string: begin_string.into(),
            heartbeat_interval: Duration::from_secs(30),
            logon_timeout: Duration::from_secs(10),
            logout_timeout: Duration::from_secs(10),
            max_reconnect_attempts: 10,
            reconnect_interval: Duration::from_secs(5),
            reset_seq_on_logon: false,
            validate_checksum: true,
        }
    }

    /// Sets the heartbeat interval.
    #[must_use]
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Sets the logon timeout.
    #[must_use]
    pub fn with_logon_timeout(mut self, timeout: Duration) -> Self {
        self.logon_timeout = timeout;
        self
    }

    /// Sets the logout timeout.
    #[must_use]
    pub fn with_logout_timeout(mut self, timeout: Duration) -> Self {
        self.logout_timeout = timeout;
        self
    }

    /// Sets the maximum reconnect attempts.
    #[must_use]
    pub const fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    /// Sets the base reconnect interval.
    #[must_use]
    pub fn with_reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval = interval;
        self
    }

    /// Sets whether to request a sequence-number reset on logon.
    #[must_use]
    pub const fn with_reset_seq_on_logon(mut self, reset: bool) -> Self {
        self.reset_seq_on_logon = reset;
        self
    }

    /// Returns the heartbeat interval in whole seconds, as carried in tag 108.
    #[must_use]
    pub fn heartbeat_interval_secs(&self) -> u64 {
        self.heartbeat_interval.as_secs()
    }

    /// Returns the canonical session identifier string.
    #[must_use]
    pub fn session_id(&self) -> String {
        format!(
            "{}:{}->{}",
            self.begin_string, self.sender_comp_id, self.target_comp_id
        )
    }
}

/// Builder for session configuration.
#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
    sender_comp_id: Option<CompId>,
    target_comp_id: Option<CompId>,
    begin_string: Option<String>,
    heartbeat_interval: Option<Duration>,
    logon_timeout: Option<Duration>,
    logout_timeout: Option<Duration>,
    max_reconnect_attempts: Option<u32>,
    reconnect_interval: Option<Duration>,
    reset_seq_on_logon: bool,
}

impl SessionConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sender CompID.
    #[must_use]
    pub fn sender_comp_id(mut self, id: CompId) -> Self {
        self.sender_comp_id = Some(id);
        self
    }

    /// Sets the target CompID.
    #[must_use]
    pub fn target_comp_id(mut self, id: CompId) -> Self {
        self.target_comp_id = Some(id);
        self
    }

    /// Sets the FIX version.
    #[must_use]
    pub fn begin_string(mut self, version: impl Into<String>) -> Self {
        self.begin_string = Some(version.into());
        self
    }

    /// Sets the heartbeat interval.
    #[must_use]
    pub fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = Some(interval);
        self
    }

    /// Sets the logon timeout.
    #[must_use]
    pub fn logon_timeout(mut self, timeout: Duration) -> Self {
        self.logon_timeout = Some(timeout);
        self
    }

    /// Sets the logout timeout.
    #[must_use]
    pub fn logout_timeout(mut self, timeout: Duration) -> Self {
        self.logout_timeout = Some(timeout);
        self
    }

    /// Sets the maximum reconnect attempts.
    #[must_use]
    pub const fn max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = Some(attempts);
        self
    }

    /// Sets the base reconnect interval.
    #[must_use]
    pub fn reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval = Some(interval);
        self
    }

    /// Sets whether to request a sequence-number reset on logon.
    #[must_use]
    pub const fn reset_seq_on_logon(mut self, reset: bool) -> Self {
        self.reset_seq_on_logon = reset;
        self
    }

    /// Builds the configuration.
    ///
    /// # Panics
    /// Panics if sender or target CompID is not set.
    #[must_use]
    pub fn build(self) -> SessionConfig {
        let sender = self.sender_comp_id.expect("sender_comp_id is required");
        let target = self.target_comp_id.expect("target_comp_id is required");
        let begin_string = self.begin_string.unwrap_or_else(|| "FIX.4.4".to_string());

        let mut config = SessionConfig::new(sender, target, begin_string);
        if let Some(interval) = self.heartbeat_interval {
            config.heartbeat_interval = interval;
        }
        if let Some(timeout) = self.logon_timeout {
            config.logon_timeout = timeout;
        }
        if let Some(timeout) = self.logout_timeout {
            config.logout_timeout = timeout;
        }
        if let Some(attempts) = self.max_reconnect_attempts {
            config.max_reconnect_attempts = attempts;
        }
        if let Some(interval) = self.reconnect_interval {
            config.reconnect_interval = interval;
        }
        config.reset_seq_on_logon = self.reset_seq_on_logon;

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_new() {
        let config = SessionConfig::new(
            CompId::new("SENDER").unwrap(),
            CompId::new("TARGET").unwrap(),
            "FIX.4.4",
        );

        assert_eq!(config.sender_comp_id.as_str(), "SENDER");
        assert_eq!(config.target_comp_id.as_str(), "TARGET");
        assert_eq!(config.begin_string, "FIX.4.4");
        assert_eq!(config.heartbeat_interval, Duration::from_secs(30));
        assert!(!config.reset_seq_on_logon);
    }

    #[test]
    fn test_session_id_format() {
        let config = SessionConfig::new(
            CompId::new("SENDER").unwrap(),
            CompId::new("TARGET").unwrap(),
            "FIX.4.4",
        );
        assert_eq!(config.session_id(), "FIX.4.4:SENDER->TARGET");
    }

    #[test]
    fn test_session_config_builder() {
        let config = SessionConfigBuilder::new()
            .sender_comp_id(CompId::new("SENDER").unwrap())
            .target_comp_id(CompId::new("TARGET").unwrap())
            .begin_string("FIX.4.2")
            .heartbeat_interval(Duration::from_secs(60))
            .logon_timeout(Duration::from_secs(5))
            .max_reconnect_attempts(3)
            .reset_seq_on_logon(true)
            .build();

        assert_eq!(config.begin_string, "FIX.4.2");
        assert_eq!(config.heartbeat_interval, Duration::from_secs(60));
        assert_eq!(config.logon_timeout, Duration::from_secs(5));
        assert_eq!(config.max_reconnect_attempts, 3);
        assert!(config.reset_seq_on_logon);
    }
}
