//! Dashboard aggregator
//!
//! Loads courses, progress, notifications and certificates as one unit and runs the
//! dashboard's mutation actions against the backend.
//!
//! Every action follows the same path: snapshot the view, apply a local patch, call the
//! server. A failed call restores the snapshot and raises an error event. A successful
//! one raises a success event and, when configured, reloads everything from the server.

use super::state::{DashboardState, DashboardView};
use super::utils::certificate_file_name;
use super::views::build_view;
use crate::api::LmsApi;
use crate::api::error::ApiError;
use crate::api::models::CompleteLessonRequest;
use crate::consts::cli_consts::{
    AVAILABLE_COURSES_PAGE_SIZE, AVERAGE_LESSON_MINUTES, NOTIFICATIONS_PAGE_SIZE, messages,
};
use crate::error_classifier::classify_api_error;
use crate::events::{Event, EventSender, Source};
use crate::logging::LogLevel;
use chrono::Utc;
use log::{debug, info, warn};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Catalog entries fetched on load (page 1 only).
    pub available_page_size: u32,
    /// Notifications fetched on load (page 1 only).
    pub notifications_page_size: u32,
    /// Minutes assumed per remaining lesson in time estimates.
    pub average_lesson_minutes: u32,
    /// Reload everything after a successful mutation.
    pub reconcile_after_mutation: bool,
    /// Where downloaded certificates are written.
    pub download_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            available_page_size: AVAILABLE_COURSES_PAGE_SIZE,
            notifications_page_size: NOTIFICATIONS_PAGE_SIZE,
            average_lesson_minutes: AVERAGE_LESSON_MINUTES,
            reconcile_after_mutation: true,
            download_dir: PathBuf::from("."),
        }
    }
}

pub struct DashboardAggregator {
    api: Arc<dyn LmsApi>,
    events: EventSender,
    config: DashboardConfig,
    state: DashboardState,
}

impl DashboardAggregator {
    pub fn new(api: Arc<dyn LmsApi>, events: EventSender, config: DashboardConfig) -> Self {
        Self {
            api,
            events,
            config,
            state: DashboardState::new(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn view(&self) -> &DashboardView {
        &self.state.view
    }

    /// Fetch all four collections concurrently and rebuild the view.
    ///
    /// All-or-nothing: when any fetch fails the previous view is kept and `error` is set.
    pub async fn load_all(&mut self) -> bool {
        self.state.begin_loading();

        let (courses, progress, notifications, certificates) = tokio::join!(
            self.api.list_courses(1, self.config.available_page_size),
            self.api.list_progress(),
            self.api
                .list_notifications(1, self.config.notifications_page_size),
            self.api.list_certificates(),
        );

        match (courses, progress, notifications, certificates) {
            (Ok(courses), Ok(progress), Ok(notifications), Ok(certificates)) => {
                let view = build_view(
                    &courses,
                    &progress,
                    &notifications,
                    &certificates,
                    self.config.average_lesson_minutes,
                );
                self.state.finish_ready(view);
                self.events
                    .send_event(Event::refresh("Dashboard data loaded"))
                    .await;
                true
            }
            (courses, progress, notifications, certificates) => {
                let errors: Vec<ApiError> = [
                    courses.err(),
                    progress.err(),
                    notifications.err(),
                    certificates.err(),
                ]
                .into_iter()
                .flatten()
                .collect();

                for error in &errors {
                    let level: log::Level = classify_api_error(error).into();
                    log::log!(level, "Dashboard fetch failed: {}", error);
                }

                let (message, level) = match errors.first() {
                    Some(error) => (
                        error.user_message(messages::LOAD_FAILED),
                        classify_api_error(error),
                    ),
                    None => (messages::LOAD_FAILED.to_string(), LogLevel::Error),
                };
                self.state.finish_failed(message.clone());
                self.events
                    .send_error(Source::Dashboard, message, level)
                    .await;
                false
            }
        }
    }

    /// Enroll in a course and start tracking progress for it.
    ///
    /// Succeeds only when both calls do. The enrollment is not undone server-side when
    /// starting progress fails; the next load shows whatever the server kept.
    pub async fn enroll(&mut self, course_id: &str) -> bool {
        let minutes = self.config.average_lesson_minutes;
        let api = Arc::clone(&self.api);
        let id = course_id.to_string();
        let call = async move {
            let response = api.enroll(&id).await?;
            if let Some(message) = response.message {
                debug!("Enroll {}: {}", id, message);
            }
            api.start_progress(&id).await
        };

        self.run_mutation(
            Source::Enrollment,
            messages::ENROLLED,
            messages::ENROLL_FAILED,
            |view| {
                if !view.move_to_enrolled(course_id, minutes) {
                    debug!("Course {} not in catalog; nothing to move", course_id);
                }
            },
            call,
        )
        .await
    }

    /// Touch an enrolled course so the server refreshes its last-access time.
    pub async fn continue_learning(&mut self, course_id: &str) -> bool {
        if self.state.view.enrolled_course(course_id).is_none() {
            warn!("Cannot continue {}: not an enrolled course", course_id);
            self.events
                .send_error(Source::Progress, messages::UNKNOWN_COURSE, LogLevel::Warn)
                .await;
            return false;
        }

        let now = Utc::now();
        let api = Arc::clone(&self.api);
        let id = course_id.to_string();
        let call = async move { api.start_progress(&id).await };

        self.run_mutation(
            Source::Progress,
            messages::CONTINUED,
            messages::CONTINUE_FAILED,
            |view| {
                view.touch_course(course_id, now);
            },
            call,
        )
        .await
    }

    pub async fn complete_lesson(
        &mut self,
        course_id: &str,
        lesson_id: &str,
        time_spent: Option<u32>,
        quiz_score: Option<f64>,
    ) -> bool {
        let minutes = self.config.average_lesson_minutes;
        let request = CompleteLessonRequest {
            course_id: course_id.to_string(),
            lesson_id: lesson_id.to_string(),
            time_spent: time_spent.unwrap_or(0),
            quiz_score,
        };
        let api = Arc::clone(&self.api);
        let call = async move { api.complete_lesson(&request).await };

        self.run_mutation(
            Source::Progress,
            messages::LESSON_COMPLETED,
            messages::COMPLETE_LESSON_FAILED,
            |view| {
                view.record_lesson_completion(course_id, lesson_id, minutes);
            },
            call,
        )
        .await
    }

    pub async fn mark_notification_read(&mut self, notification_id: &str) -> bool {
        let now = Utc::now();
        let api = Arc::clone(&self.api);
        let id = notification_id.to_string();
        let call = async move { api.mark_notification_read(&id).await };

        self.run_mutation(
            Source::Notifications,
            messages::NOTIFICATION_READ,
            messages::MARK_READ_FAILED,
            |view| {
                view.mark_notification_read(notification_id, now);
            },
            call,
        )
        .await
    }

    pub async fn mark_all_notifications_read(&mut self) -> bool {
        let now = Utc::now();
        let api = Arc::clone(&self.api);
        let call = async move { api.mark_all_notifications_read().await };

        self.run_mutation(
            Source::Notifications,
            messages::ALL_NOTIFICATIONS_READ,
            messages::MARK_ALL_READ_FAILED,
            |view| {
                let changed = view.mark_all_notifications_read(now);
                debug!("Marked {} notifications read locally", changed);
            },
            call,
        )
        .await
    }

    pub async fn delete_notification(&mut self, notification_id: &str) -> bool {
        let api = Arc::clone(&self.api);
        let id = notification_id.to_string();
        let call = async move { api.delete_notification(&id).await };

        self.run_mutation(
            Source::Notifications,
            messages::NOTIFICATION_DELETED,
            messages::DELETE_NOTIFICATION_FAILED,
            |view| {
                view.remove_notification(notification_id);
            },
            call,
        )
        .await
    }

    /// Download a certificate PDF into the configured directory. Returns the saved path.
    pub async fn download_certificate(&mut self, certificate_id: &str) -> Option<PathBuf> {
        match self.save_certificate(certificate_id).await {
            Ok(path) => {
                info!("Certificate {} saved to {}", certificate_id, path.display());
                self.events
                    .send_success(
                        Source::Certificates,
                        format!("Certificate saved to {}", path.display()),
                    )
                    .await;
                Some(path)
            }
            Err(e) => {
                let level = classify_api_error(&e);
                log::log!(log::Level::from(level), "Certificate download failed: {}", e);
                self.events
                    .send_error(
                        Source::Certificates,
                        e.user_message(messages::DOWNLOAD_FAILED),
                        level,
                    )
                    .await;
                None
            }
        }
    }

    async fn save_certificate(&self, certificate_id: &str) -> Result<PathBuf, ApiError> {
        let download = self.api.download_certificate(certificate_id).await?;
        match download.content_type.as_deref() {
            Some(content_type) if content_type.starts_with("application/pdf") => {}
            other => warn!(
                "Certificate {} served as {:?}, expected application/pdf",
                certificate_id, other
            ),
        }

        tokio::fs::create_dir_all(&self.config.download_dir).await?;
        let path = self
            .config
            .download_dir
            .join(certificate_file_name(certificate_id));
        tokio::fs::write(&path, &download.bytes).await?;
        Ok(path)
    }

    async fn run_mutation<Fut>(
        &mut self,
        source: Source,
        success: &str,
        fallback: &str,
        patch: impl FnOnce(&mut DashboardView),
        call: Fut,
    ) -> bool
    where
        Fut: Future<Output = Result<(), ApiError>>,
    {
        let snapshot = self.state.view.clone();
        patch(&mut self.state.view);

        match call.await {
            Ok(()) => {
                info!("{}: {}", source, success);
                self.events.send_success(source, success).await;
                if self.config.reconcile_after_mutation && !self.load_all().await {
                    warn!("Reload after {} action failed; keeping local changes", source);
                }
                true
            }
            Err(e) => {
                let level = classify_api_error(&e);
                log::log!(log::Level::from(level), "{} action failed: {}", source, e);
                self.state.view = snapshot;
                self.events
                    .send_error(source, e.user_message(fallback), level)
                    .await;
                false
            }
        }
    }
}
