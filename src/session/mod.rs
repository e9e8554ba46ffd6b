pub mod messages;
pub mod runner;
pub mod setup;

pub use runner::{Action, run_action};
pub use setup::{SessionData, setup_session};
