//! Running one dashboard action per invocation.

use super::SessionData;
use super::messages::{print_event, print_not_logged_in, print_session_expired};
use crate::dashboard::{DashboardAggregator, render_dashboard, render_json};
use crate::events::Event;
use log::warn;
use std::error::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A single action requested on the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Dashboard {
        json: bool,
    },
    Enroll {
        course_id: String,
    },
    Continue {
        course_id: String,
    },
    CompleteLesson {
        course_id: String,
        lesson_id: String,
        time_spent: Option<u32>,
        quiz_score: Option<f64>,
    },
    MarkNotificationRead {
        notification_id: String,
    },
    MarkAllNotificationsRead,
    DeleteNotification {
        notification_id: String,
    },
    DownloadCertificate {
        certificate_id: String,
    },
}

impl Action {
    /// Actions that patch the loaded view need it loaded first.
    fn needs_view(&self) -> bool {
        !matches!(
            self,
            Action::Dashboard { .. } | Action::DownloadCertificate { .. }
        )
    }
}

struct Outcome {
    success: bool,
    output: Option<String>,
}

/// Print events as they arrive until the sending side is dropped.
fn spawn_event_printer(mut receiver: mpsc::Receiver<Event>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            print_event(&event);
        }
    })
}

async fn perform(
    aggregator: &mut DashboardAggregator,
    action: Action,
) -> Result<Outcome, Box<dyn Error>> {
    if action.needs_view() && !aggregator.load_all().await {
        warn!("Dashboard did not load; attempting the action anyway");
    }

    let success = match action {
        Action::Dashboard { json } => {
            let success = aggregator.load_all().await;
            let output = if json {
                render_json(aggregator.view())?
            } else {
                render_dashboard(aggregator.state())
            };
            return Ok(Outcome {
                success,
                output: Some(output),
            });
        }
        Action::Enroll { course_id } => aggregator.enroll(&course_id).await,
        Action::Continue { course_id } => aggregator.continue_learning(&course_id).await,
        Action::CompleteLesson {
            course_id,
            lesson_id,
            time_spent,
            quiz_score,
        } => {
            aggregator
                .complete_lesson(&course_id, &lesson_id, time_spent, quiz_score)
                .await
        }
        Action::MarkNotificationRead { notification_id } => {
            aggregator.mark_notification_read(&notification_id).await
        }
        Action::MarkAllNotificationsRead => aggregator.mark_all_notifications_read().await,
        Action::DeleteNotification { notification_id } => {
            aggregator.delete_notification(&notification_id).await
        }
        Action::DownloadCertificate { certificate_id } => aggregator
            .download_certificate(&certificate_id)
            .await
            .is_some(),
    };

    Ok(Outcome {
        success,
        output: None,
    })
}

/// Runs `action` and prints its events, then any rendered output.
///
/// # Returns
/// * `Ok(())` - The action succeeded
/// * `Err` - The action failed or its output could not be rendered
pub async fn run_action(session: SessionData, action: Action) -> Result<(), Box<dyn Error>> {
    let SessionData {
        mut aggregator,
        event_receiver,
        credentials,
    } = session;

    let had_token = credentials.token().is_some();
    if !had_token {
        print_not_logged_in();
    }

    let printer = spawn_event_printer(event_receiver);
    let outcome = perform(&mut aggregator, action).await;

    // Dropping the aggregator closes the event channel so the printer can finish.
    drop(aggregator);
    let _ = printer.await;

    if had_token && credentials.token().is_none() {
        print_session_expired();
    }

    let outcome = outcome?;
    if let Some(output) = outcome.output {
        println!("{}", output);
    }
    if outcome.success {
        Ok(())
    } else {
        Err(Box::from("Action failed"))
    }
}
