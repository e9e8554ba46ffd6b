use crate::api::error::ApiError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// Classify an API error to determine the level it is logged and displayed at.
pub fn classify_api_error(error: &ApiError) -> LogLevel {
    match error {
        // Rate limiting - low priority
        ApiError::Http { status, .. } if *status == 429 => LogLevel::Debug,

        // Server errors - temporary issues
        ApiError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

        // Authentication errors - critical
        ApiError::Unauthorized { .. } => LogLevel::Error,
        ApiError::Http { status, .. } if *status == 401 || *status == 403 => LogLevel::Error,

        // Malformed responses and local disk failures need attention
        ApiError::Decode(_) | ApiError::Io(_) => LogLevel::Error,

        // Network issues - usually temporary
        ApiError::Reqwest(_) => LogLevel::Warn,

        // Business-rule rejections and other client errors
        _ => LogLevel::Warn,
    }
}
