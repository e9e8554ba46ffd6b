//! Dashboard state management
//!
//! View-model types and the load-state machine the aggregator drives.

use crate::api::models::{Course, NotificationKind, Priority};
use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Coarse lifecycle of the dashboard data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// An assignment due date. Never populated yet: deadlines need assignment data the
/// dashboard does not fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deadline {
    pub title: String,
    pub due_at: DateTime<Utc>,
}

/// A progress record joined with its course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrolledCourseView {
    pub course_id: String,
    pub title: String,
    pub description: String,
    pub level: Option<String>,
    pub category: Option<String>,
    /// Server-computed, 0..=100.
    pub progress_percentage: f64,
    pub completed_lesson_count: usize,
    pub total_lesson_count: usize,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub enrolled_at: Option<DateTime<Utc>>,
    pub next_lesson_title: String,
    pub estimated_time_remaining: String,
    pub has_quizzes: bool,
    pub has_assignments: bool,
    pub has_discussions: bool,
    pub upcoming_deadlines: Vec<Deadline>,
    #[serde(skip)]
    pub(crate) completed_lesson_ids: BTreeSet<String>,
}

/// Catalog entries are shown as the backend sends them.
pub type AvailableCourseView = Course;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationView {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateView {
    /// Identifier accepted by the download endpoint.
    pub id: String,
    pub course_id: Option<String>,
    pub course_title: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub verification_id: Option<String>,
    pub score: Option<f64>,
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardView {
    pub enrolled_courses: Vec<EnrolledCourseView>,
    pub available_courses: Vec<AvailableCourseView>,
    pub notifications: Vec<NotificationView>,
    pub certificates: Vec<CertificateView>,
    pub unread_count: usize,
}

#[derive(Debug)]
pub struct DashboardState {
    /// Last successfully loaded view, plus any local patches applied since.
    pub view: DashboardView,
    /// Human-readable message from the most recent failed load.
    pub error: Option<String>,
    load_state: LoadState,
    /// Highest progress seen per course this session.
    peak_progress: HashMap<String, f64>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            view: DashboardView::default(),
            error: None,
            load_state: LoadState::Idle,
            peak_progress: HashMap::new(),
        }
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn loading(&self) -> bool {
        matches!(self.load_state, LoadState::Loading)
    }

    pub fn begin_loading(&mut self) {
        self.load_state = LoadState::Loading;
        self.error = None;
    }

    /// Replace the view with a freshly loaded one.
    pub fn finish_ready(&mut self, mut view: DashboardView) {
        self.hold_progress_peaks(&mut view);
        self.view = view;
        self.error = None;
        self.load_state = LoadState::Ready;
    }

    /// Record a failed load. The previous view is kept as the last known good state.
    pub fn finish_failed(&mut self, message: String) {
        self.error = Some(message);
        self.load_state = LoadState::Failed;
    }

    /// A course's displayed progress never goes down within a session.
    fn hold_progress_peaks(&mut self, view: &mut DashboardView) {
        for course in &mut view.enrolled_courses {
            let peak = self
                .peak_progress
                .entry(course.course_id.clone())
                .or_insert(course.progress_percentage);
            if course.progress_percentage < *peak {
                warn!(
                    "Server reported progress {} for course {} below earlier {}; keeping {}",
                    course.progress_percentage, course.course_id, peak, peak
                );
                course.progress_percentage = *peak;
            } else {
                *peak = course.progress_percentage;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with_progress(course_id: &str, progress: f64) -> DashboardView {
        DashboardView {
            enrolled_courses: vec![EnrolledCourseView {
                course_id: course_id.to_string(),
                title: String::new(),
                description: String::new(),
                level: None,
                category: None,
                progress_percentage: progress,
                completed_lesson_count: 0,
                total_lesson_count: 0,
                last_accessed_at: None,
                enrolled_at: None,
                next_lesson_title: String::new(),
                estimated_time_remaining: String::new(),
                has_quizzes: true,
                has_assignments: true,
                has_discussions: true,
                upcoming_deadlines: Vec::new(),
                completed_lesson_ids: BTreeSet::new(),
            }],
            ..DashboardView::default()
        }
    }

    #[test]
    fn state_machine_transitions() {
        let mut state = DashboardState::new();
        assert_eq!(state.load_state(), LoadState::Idle);

        state.begin_loading();
        assert!(state.loading());

        state.finish_failed("boom".into());
        assert_eq!(state.load_state(), LoadState::Failed);
        assert!(!state.loading());
        assert_eq!(state.error.as_deref(), Some("boom"));

        state.begin_loading();
        assert_eq!(state.error, None);
        state.finish_ready(DashboardView::default());
        assert_eq!(state.load_state(), LoadState::Ready);
    }

    #[test]
    fn failed_load_keeps_last_good_view() {
        let mut state = DashboardState::new();
        state.finish_ready(view_with_progress("c1", 10.0));
        state.begin_loading();
        state.finish_failed("offline".into());
        assert_eq!(state.view.enrolled_courses.len(), 1);
    }

    #[test]
    fn progress_never_decreases_within_a_session() {
        let mut state = DashboardState::new();
        state.finish_ready(view_with_progress("c1", 60.0));
        state.finish_ready(view_with_progress("c1", 40.0));
        assert_eq!(state.view.enrolled_courses[0].progress_percentage, 60.0);

        state.finish_ready(view_with_progress("c1", 80.0));
        assert_eq!(state.view.enrolled_courses[0].progress_percentage, 80.0);
    }
}
