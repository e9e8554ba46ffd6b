//! Wire records exchanged with the LMS backend.
//!
//! Field names follow the backend's camelCase JSON with Mongo-style `_id`s. Every
//! optional or list field tolerates `null` and absence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseModule {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub lessons: Option<Vec<Lesson>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub modules: Option<Vec<CourseModule>>,
    #[serde(default)]
    pub instructor: Option<InstructorRef>,
}

impl Course {
    /// Lessons across every module. Missing modules or lesson lists count as zero.
    pub fn total_lessons(&self) -> usize {
        self.modules
            .iter()
            .flatten()
            .map(|module| module.lessons.as_ref().map_or(0, Vec::len))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Instructor {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstructorRef {
    Populated(Instructor),
    Id(String),
}

impl InstructorRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            InstructorRef::Populated(instructor) => instructor.name.as_deref(),
            InstructorRef::Id(_) => None,
        }
    }
}

/// A course reference that the backend may or may not have populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CourseRef {
    Populated(Course),
    Id(String),
}

impl CourseRef {
    pub fn populated(&self) -> Option<&Course> {
        match self {
            CourseRef::Populated(course) => Some(course),
            CourseRef::Id(_) => None,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            CourseRef::Populated(course) => &course.id,
            CourseRef::Id(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LessonRef {
    Populated(LessonSummary),
    Id(String),
}

impl LessonRef {
    pub fn title(&self) -> Option<&str> {
        match self {
            LessonRef::Populated(summary) => summary.title.as_deref(),
            LessonRef::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedLesson {
    pub lesson: String,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_spent: Option<f64>,
    #[serde(default)]
    pub quiz_score: Option<f64>,
}

/// One user's completion state for one course.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub course: Option<CourseRef>,
    #[serde(default)]
    pub completed_lessons: Option<Vec<CompletedLesson>>,
    #[serde(default)]
    pub current_lesson: Option<LessonRef>,
    #[serde(default)]
    pub progress_percentage: f64,
    #[serde(default)]
    pub last_accessed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_time_spent: Option<f64>,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
    CourseEnrollment,
    NewLesson,
    CourseCompletion,
    CertificateIssued,
    CommentReply,
    CourseUpdate,
    LessonCompleted,
    QuizResult,
    NewCourseAvailable,
    InstructorMessage,
    SystemAnnouncement,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    Low,
    High,
    #[default]
    #[serde(other)]
    Medium,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub action_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub course: Option<CourseRef>,
    /// Human-facing certificate number, used by the download endpoint.
    #[serde(default)]
    pub certificate_id: Option<String>,
    #[serde(default)]
    pub completion_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub verification_code: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub grade: Option<String>,
}

// =============================================================================
// RESPONSE ENVELOPES
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoursesPage {
    #[serde(default)]
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsPage {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub unread_count: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificatesData {
    #[serde(default)]
    pub certificates: Vec<Certificate>,
}

/// The backend has shipped both `{ certificates }` and `{ success, data: { certificates } }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificatesResponse {
    #[serde(default)]
    pub certificates: Option<Vec<Certificate>>,
    #[serde(default)]
    pub data: Option<CertificatesData>,
}

impl CertificatesResponse {
    pub fn into_certificates(self) -> Vec<Certificate> {
        self.certificates
            .or_else(|| self.data.map(|data| data.certificates))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnrollResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLessonRequest {
    pub course_id: String,
    pub lesson_id: String,
    pub time_spent: u32,
    /// Serialized as `null` for lessons that are not quizzes.
    pub quiz_score: Option<f64>,
}

/// Raw certificate bytes plus the content type the server declared.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateDownload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}
