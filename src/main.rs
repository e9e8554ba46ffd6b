mod api;
mod config;
mod consts;
mod dashboard;
mod environment;
mod error_classifier;
mod events;
mod logging;
mod pretty;
mod session;

use crate::config::{Config, get_config_path};
use crate::consts::cli_consts::AVERAGE_LESSON_MINUTES;
use crate::dashboard::DashboardConfig;
use crate::environment::Environment;
use crate::pretty::{print_cmd_error, print_cmd_info};
use crate::session::{Action, run_action, setup_session};
use clap::{Parser, Subcommand};
use log::warn;
use std::error::Error;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Student dashboard for the LMS backend",
    long_about = None
)]
struct Args {
    /// API base URL. Defaults to the environment's URL (see LMS_ENVIRONMENT).
    #[arg(long, global = true, env = "LMS_API_URL", value_name = "URL")]
    api_url: Option<String>,

    /// Minutes assumed per remaining lesson when estimating time left.
    #[arg(
        long,
        global = true,
        value_name = "MINUTES",
        default_value_t = AVERAGE_LESSON_MINUTES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    average_lesson_minutes: u32,

    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show enrolled courses, the catalog, notifications and certificates
    Dashboard {
        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Enroll in a course and start tracking progress
    Enroll {
        #[arg(value_name = "COURSE_ID")]
        course_id: String,
    },
    /// Pick up an enrolled course where you left off
    Continue {
        #[arg(value_name = "COURSE_ID")]
        course_id: String,
    },
    /// Mark a lesson as complete
    CompleteLesson {
        #[arg(value_name = "COURSE_ID")]
        course_id: String,
        #[arg(value_name = "LESSON_ID")]
        lesson_id: String,
        /// Time spent on the lesson
        #[arg(long)]
        time_spent: Option<u32>,
        /// Quiz score, for quiz lessons
        #[arg(long)]
        quiz_score: Option<f64>,
    },
    /// Read or delete notifications
    #[command(subcommand)]
    Notifications(NotificationsCommand),
    /// Download certificates
    #[command(subcommand)]
    Certificate(CertificateCommand),
    /// Store an API token for later commands
    Login {
        #[arg(long, value_name = "TOKEN")]
        token: String,
    },
    /// Clear the stored configuration and logout.
    Logout,
}

#[derive(Subcommand)]
enum NotificationsCommand {
    /// Mark one notification as read
    Read {
        #[arg(value_name = "NOTIFICATION_ID")]
        id: String,
    },
    /// Mark every notification as read
    ReadAll,
    /// Delete a notification
    Delete {
        #[arg(value_name = "NOTIFICATION_ID")]
        id: String,
    },
}

#[derive(Subcommand)]
enum CertificateCommand {
    /// Save a certificate PDF
    Download {
        #[arg(value_name = "CERTIFICATE_ID")]
        id: String,
        /// Directory to save into (default: current directory)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init()?;

    let environment = std::env::var("LMS_ENVIRONMENT")
        .ok()
        .and_then(|value| value.parse::<Environment>().ok());

    let config_path = get_config_path()?;
    let args = Args::parse();

    let mut dashboard_config = DashboardConfig {
        average_lesson_minutes: args.average_lesson_minutes,
        ..DashboardConfig::default()
    };

    let action = match args.command {
        Command::Login { token } => {
            return login(&config_path, token, args.api_url, environment);
        }
        Command::Logout => {
            println!("Logging out and clearing configuration file...");
            return Config::clear(&config_path).map_err(Into::into);
        }
        Command::Dashboard { json } => Action::Dashboard { json },
        Command::Enroll { course_id } => Action::Enroll { course_id },
        Command::Continue { course_id } => Action::Continue { course_id },
        Command::CompleteLesson {
            course_id,
            lesson_id,
            time_spent,
            quiz_score,
        } => Action::CompleteLesson {
            course_id,
            lesson_id,
            time_spent,
            quiz_score,
        },
        Command::Notifications(NotificationsCommand::Read { id }) => {
            Action::MarkNotificationRead {
                notification_id: id,
            }
        }
        Command::Notifications(NotificationsCommand::ReadAll) => Action::MarkAllNotificationsRead,
        Command::Notifications(NotificationsCommand::Delete { id }) => {
            Action::DeleteNotification {
                notification_id: id,
            }
        }
        Command::Certificate(CertificateCommand::Download { id, out_dir }) => {
            if let Some(dir) = out_dir {
                dashboard_config.download_dir = dir;
            }
            Action::DownloadCertificate { certificate_id: id }
        }
    };

    let mut config = match Config::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            print_cmd_error!(
                "Failed to read configuration",
                "{}: {}. Run `lms-dashboard logout` to reset it.",
                config_path.display(),
                e
            );
            return Err(e.into());
        }
    };
    if let Some(environment) = environment {
        config.environment = environment;
    }
    let api_url = args
        .api_url
        .unwrap_or_else(|| config.resolved_api_url());

    let session = setup_session(&config, config_path, api_url, dashboard_config)?;
    run_action(session, action).await
}

/// Stores `token` in the config file, keeping any other settings already there.
fn login(
    config_path: &Path,
    token: String,
    api_url: Option<String>,
    environment: Option<Environment>,
) -> Result<(), Box<dyn Error>> {
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(Box::from("Token must not be empty"));
    }

    let mut config = match Config::load_or_default(config_path) {
        Ok(mut existing) => {
            existing.api_token = Some(token);
            existing
        }
        Err(e) => {
            warn!("Replacing unreadable config {}: {}", config_path.display(), e);
            Config::new(token, Environment::default())
        }
    };
    if let Some(environment) = environment {
        config.environment = environment;
    }
    if api_url.is_some() {
        config.api_url = api_url;
    }

    config
        .save(config_path)
        .map_err(|e| format!("Failed to save config: {}", e))?;
    print_cmd_info!("Logged in", "Token saved to {}", config_path.display());
    Ok(())
}
