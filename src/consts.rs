pub mod cli_consts {
    //! Client Configuration Constants
    //!
    //! Tuning values for the dashboard client, organized by functional area.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// Maximum number of event buffer size for background workers
    pub const EVENT_QUEUE_SIZE: usize = 100;

    // =============================================================================
    // DASHBOARD CONFIGURATION
    // =============================================================================

    /// Number of activity entries shown in the "recent activity" panel.
    pub const RECENT_ACTIVITY_LIMIT: usize = 3;

    /// HTTP transport configuration
    pub mod http {
        use std::time::Duration;

        /// Connect timeout for API requests (seconds)
        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        /// Overall request timeout for API requests (seconds)
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }

    /// Polling configuration
    pub mod polling {
        use std::time::Duration;

        /// Interval between unread-count requests while active (seconds)
        pub const UNREAD_INTERVAL_SECS: u64 = 30;

        /// Cool-down after a rate-limit response (seconds)
        pub const RATE_LIMIT_COOLDOWN_SECS: u64 = 5 * 60;

        /// Interval between full dashboard refreshes in watch mode (seconds)
        pub const REFRESH_INTERVAL_SECS: u64 = 60;

        pub const fn unread_interval() -> Duration {
            Duration::from_secs(UNREAD_INTERVAL_SECS)
        }

        pub const fn rate_limit_cooldown() -> Duration {
            Duration::from_secs(RATE_LIMIT_COOLDOWN_SECS)
        }

        pub const fn refresh_interval() -> Duration {
            Duration::from_secs(REFRESH_INTERVAL_SECS)
        }
    }
}
