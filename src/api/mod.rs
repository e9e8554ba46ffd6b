use crate::api::error::ApiError;
use crate::api::models::{
    Certificate, CertificateDownload, CompleteLessonRequest, Course, EnrollResponse,
    NotificationsPage, ProgressRecord,
};

pub mod auth;
pub(crate) mod client;
pub use client::ApiClient;
pub mod error;
pub mod models;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait LmsApi: Send + Sync {
    /// List one page of the published course catalog.
    async fn list_courses(&self, page: u32, limit: u32) -> Result<Vec<Course>, ApiError>;

    /// All progress records for the current user, each with its course embedded.
    async fn list_progress(&self) -> Result<Vec<ProgressRecord>, ApiError>;

    /// Start (or touch) progress tracking for a course.
    async fn start_progress(&self, course_id: &str) -> Result<(), ApiError>;

    /// Mark a lesson complete.
    async fn complete_lesson(&self, request: &CompleteLessonRequest) -> Result<(), ApiError>;

    /// List one page of the current user's notifications.
    async fn list_notifications(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<NotificationsPage, ApiError>;

    async fn mark_notification_read(&self, notification_id: &str) -> Result<(), ApiError>;

    async fn mark_all_notifications_read(&self) -> Result<(), ApiError>;

    async fn delete_notification(&self, notification_id: &str) -> Result<(), ApiError>;

    /// Certificates earned by the current user.
    async fn list_certificates(&self) -> Result<Vec<Certificate>, ApiError>;

    /// Fetch a certificate's PDF.
    async fn download_certificate(
        &self,
        certificate_id: &str,
    ) -> Result<CertificateDownload, ApiError>;

    /// Enroll the current user in a course. `success: false` answers are errors.
    async fn enroll(&self, course_id: &str) -> Result<EnrollResponse, ApiError>;
}
