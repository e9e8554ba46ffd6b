//! Unified messaging system for session operations

use crate::events::{Event, EventType};

// ANSI Color Codes for session messages
pub const COLOR_INFO: &str = "\x1b[1;36m"; // Bold Cyan
pub const COLOR_SUCCESS: &str = "\x1b[1;32m"; // Bold Green
pub const COLOR_ERROR: &str = "\x1b[1;31m"; // Bold Red
pub const COLOR_DIM: &str = "\x1b[2m";
pub const COLOR_RESET: &str = "\x1b[0m";

/// Session-specific message types
#[derive(Debug, Clone)]
pub enum SessionMessage {
    /// Progress and hints
    Info(String),
    /// Completed operations
    Success(String),
    /// Failed operations
    Error(String),
}

impl SessionMessage {
    pub fn info(msg: impl Into<String>) -> Self {
        Self::Info(msg.into())
    }

    pub fn success(msg: impl Into<String>) -> Self {
        Self::Success(msg.into())
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    /// Print the message with appropriate formatting
    pub fn print(&self) {
        match self {
            Self::Info(msg) => {
                println!("{}[INFO]{} {}", COLOR_INFO, COLOR_RESET, msg);
            }
            Self::Success(msg) => {
                println!("{}[SUCCESS]{} {}", COLOR_SUCCESS, COLOR_RESET, msg);
            }
            Self::Error(msg) => {
                eprintln!("{}[ERROR]{} {}", COLOR_ERROR, COLOR_RESET, msg);
            }
        }
    }
}

impl From<&Event> for SessionMessage {
    fn from(event: &Event) -> Self {
        let text = format!("{}: {}", event.source, event.msg);
        match event.event_type {
            EventType::Success => Self::Success(text),
            EventType::Error => Self::Error(text),
            EventType::Refresh => Self::Info(text),
        }
    }
}

/// Print a dashboard event as a toast line, honoring its display threshold.
pub fn print_event(event: &Event) {
    if event.should_display() {
        SessionMessage::from(event).print();
    }
}

pub fn print_not_logged_in() {
    SessionMessage::info(format!(
        "No API token stored. Run `lms-dashboard login --token <TOKEN>` first. {}(requests are sent unauthenticated){}",
        COLOR_DIM, COLOR_RESET
    ))
    .print();
}

pub fn print_session_expired() {
    SessionMessage::error(
        "Your session has expired. Run `lms-dashboard login --token <TOKEN>` to log in again.",
    )
    .print();
}
