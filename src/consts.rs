pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! This module contains all tunables for the dashboard client,
    //! organized by functional area for clarity and maintainability.

    // =============================================================================
    // EVENT CONFIGURATION
    // =============================================================================

    /// Buffer size of the event channel between the aggregator and the terminal.
    pub const EVENT_QUEUE_SIZE: usize = 100;

    // =============================================================================
    // AGGREGATION CONFIGURATION
    // =============================================================================

    /// Page size used when listing the course catalog.
    pub const AVAILABLE_COURSES_PAGE_SIZE: u32 = 50;

    /// Page size used when listing notifications.
    pub const NOTIFICATIONS_PAGE_SIZE: u32 = 20;

    /// Placeholder average duration of a lesson, in minutes.
    /// Used for the remaining-time estimate until lessons report real durations.
    pub const AVERAGE_LESSON_MINUTES: u32 = 30;

    /// Label shown when a course has no current lesson yet.
    pub const NEXT_LESSON_FALLBACK: &str = "Start Course";

    // =============================================================================
    // USER-FACING MESSAGES
    // =============================================================================

    pub mod messages {
        pub const LOAD_FAILED: &str = "Failed to load dashboard data";
        pub const ENROLL_FAILED: &str = "Failed to enroll in course";
        pub const CONTINUE_FAILED: &str = "Failed to update course access";
        pub const COMPLETE_LESSON_FAILED: &str = "Failed to mark lesson as complete";
        pub const MARK_READ_FAILED: &str = "Failed to mark notification as read";
        pub const MARK_ALL_READ_FAILED: &str = "Failed to mark notifications as read";
        pub const DELETE_NOTIFICATION_FAILED: &str = "Failed to delete notification";
        pub const DOWNLOAD_FAILED: &str = "Failed to download certificate";

        pub const ENROLLED: &str = "Successfully enrolled in course!";
        pub const CONTINUED: &str = "Picking up where you left off";
        pub const LESSON_COMPLETED: &str = "Lesson marked as complete";
        pub const NOTIFICATION_READ: &str = "Notification marked as read";
        pub const ALL_NOTIFICATIONS_READ: &str = "All notifications marked as read";
        pub const NOTIFICATION_DELETED: &str = "Notification deleted";
        pub const UNKNOWN_COURSE: &str = "Course is not in your enrolled courses";
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    pub mod network {
        use std::time::Duration;

        /// TCP connect timeout (seconds)
        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        /// Whole-request timeout (seconds)
        pub const REQUEST_TIMEOUT_SECS: u64 = 30;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }

        /// Request path prefixes where a 401 must not clear stored credentials.
        pub const UNAUTHORIZED_EXEMPT_PREFIXES: &[&str] = &["admin/"];
    }
}
