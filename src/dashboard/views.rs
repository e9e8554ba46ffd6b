//! Joining wire records into view entities.

use super::state::{CertificateView, DashboardView, EnrolledCourseView, NotificationView};
use super::utils::format_remaining_time;
use crate::api::models::{
    Certificate, Course, CourseRef, Notification, NotificationsPage, ProgressRecord,
};
use crate::consts::cli_consts::NEXT_LESSON_FALLBACK;
use log::{debug, warn};
use std::collections::{BTreeSet, HashSet};

impl EnrolledCourseView {
    /// Zero-progress view of a course the user has just enrolled in.
    pub fn fresh(course: &Course, minutes_per_lesson: u32) -> Self {
        let total = course.total_lessons();
        Self {
            course_id: course.id.clone(),
            title: course.title.clone(),
            description: course.description.clone(),
            level: course.level.clone(),
            category: course.category.clone(),
            progress_percentage: 0.0,
            completed_lesson_count: 0,
            total_lesson_count: total,
            last_accessed_at: None,
            enrolled_at: None,
            next_lesson_title: NEXT_LESSON_FALLBACK.to_string(),
            estimated_time_remaining: format_remaining_time(total, minutes_per_lesson),
            has_quizzes: true,
            has_assignments: true,
            has_discussions: true,
            upcoming_deadlines: Vec::new(),
            completed_lesson_ids: BTreeSet::new(),
        }
    }

    /// Build the view for a progress record. Records whose course is missing or was not
    /// populated by the server yield `None`.
    pub fn from_progress(record: &ProgressRecord, minutes_per_lesson: u32) -> Option<Self> {
        let course = match record.course.as_ref() {
            Some(CourseRef::Populated(course)) => course,
            Some(CourseRef::Id(id)) => {
                warn!("Progress record {} has unpopulated course {}; skipping", record.id, id);
                return None;
            }
            None => {
                warn!("Progress record {} has no course; skipping", record.id);
                return None;
            }
        };

        let completed_lesson_ids: BTreeSet<String> = record
            .completed_lessons
            .iter()
            .flatten()
            .map(|completed| completed.lesson.clone())
            .collect();

        let mut view = Self::fresh(course, minutes_per_lesson);
        view.completed_lesson_ids = completed_lesson_ids;
        view.progress_percentage = record.progress_percentage;
        view.last_accessed_at = record.last_accessed;
        view.enrolled_at = record.created_at;
        if let Some(title) = record.current_lesson.as_ref().and_then(|l| l.title()) {
            view.next_lesson_title = title.to_string();
        }
        view.recount(minutes_per_lesson);
        Some(view)
    }

    /// Recompute the completed count and time estimate from the completed-lesson set.
    pub(crate) fn recount(&mut self, minutes_per_lesson: u32) {
        let distinct = self.completed_lesson_ids.len();
        if distinct > self.total_lesson_count {
            warn!(
                "Course {} reports {} completed lessons out of {}; clamping",
                self.course_id, distinct, self.total_lesson_count
            );
        }
        self.completed_lesson_count = distinct.min(self.total_lesson_count);
        let remaining = self.total_lesson_count - self.completed_lesson_count;
        self.estimated_time_remaining = format_remaining_time(remaining, minutes_per_lesson);
    }
}

impl From<&Notification> for NotificationView {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id.clone(),
            kind: notification.kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            is_read: notification.is_read,
            read_at: notification.read_at,
            created_at: notification.created_at,
            priority: notification.priority,
        }
    }
}

impl From<&Certificate> for CertificateView {
    fn from(certificate: &Certificate) -> Self {
        let course = certificate.course.as_ref();
        Self {
            id: certificate
                .certificate_id
                .clone()
                .unwrap_or_else(|| certificate.id.clone()),
            course_id: course.map(|c| c.id().to_string()),
            course_title: course
                .and_then(CourseRef::populated)
                .map(|c| c.title.clone()),
            completed_at: certificate.completion_date,
            verification_id: certificate.verification_code.clone(),
            score: certificate.score,
        }
    }
}

/// Join the four fetched collections into a dashboard view.
pub fn build_view(
    courses: &[Course],
    progress: &[ProgressRecord],
    notifications: &NotificationsPage,
    certificates: &[Certificate],
    minutes_per_lesson: u32,
) -> DashboardView {
    let enrolled_courses: Vec<EnrolledCourseView> = progress
        .iter()
        .filter_map(|record| EnrolledCourseView::from_progress(record, minutes_per_lesson))
        .collect();

    let enrolled_ids: HashSet<&str> = enrolled_courses
        .iter()
        .map(|view| view.course_id.as_str())
        .collect();
    let available_courses: Vec<Course> = courses
        .iter()
        .filter(|course| !enrolled_ids.contains(course.id.as_str()))
        .cloned()
        .collect();

    let notifications_view: Vec<NotificationView> = notifications
        .notifications
        .iter()
        .map(NotificationView::from)
        .collect();
    let unread_count = notifications.unread_count.unwrap_or_else(|| {
        notifications_view
            .iter()
            .filter(|notification| !notification.is_read)
            .count()
    });

    debug!(
        "Built dashboard view: {} enrolled, {} available, {} notifications, {} certificates",
        enrolled_courses.len(),
        available_courses.len(),
        notifications_view.len(),
        certificates.len()
    );

    DashboardView {
        enrolled_courses,
        available_courses,
        notifications: notifications_view,
        certificates: certificates.iter().map(CertificateView::from).collect(),
        unread_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn course_with_lessons(id: &str, lessons: usize) -> Course {
        let lessons: Vec<_> = (0..lessons)
            .map(|n| json!({ "_id": format!("{id}-l{n}") }))
            .collect();
        serde_json::from_value(json!({
            "_id": id,
            "title": format!("Course {id}"),
            "modules": [{ "lessons": lessons }]
        }))
        .unwrap()
    }

    fn record(course: Option<Course>, completed: &[&str]) -> ProgressRecord {
        ProgressRecord {
            id: "p1".into(),
            course: course.map(CourseRef::Populated),
            completed_lessons: Some(
                completed
                    .iter()
                    .map(|lesson| serde_json::from_value(json!({ "lesson": lesson })).unwrap())
                    .collect(),
            ),
            ..ProgressRecord::default()
        }
    }

    #[test]
    fn finished_course_has_no_time_remaining() {
        let course = course_with_lessons("c1", 2);
        let view =
            EnrolledCourseView::from_progress(&record(Some(course), &["c1-l0", "c1-l1"]), 30)
                .unwrap();
        assert_eq!(view.completed_lesson_count, view.total_lesson_count);
        assert_eq!(view.estimated_time_remaining, "0m");
    }

    #[test]
    fn course_without_modules_counts_zero_lessons() {
        let course: Course = serde_json::from_value(json!({ "_id": "c1" })).unwrap();
        let view = EnrolledCourseView::from_progress(&record(Some(course), &[]), 30).unwrap();
        assert_eq!(view.total_lesson_count, 0);
        assert_eq!(view.completed_lesson_count, 0);
        assert_eq!(view.next_lesson_title, "Start Course");
    }

    #[test]
    fn remaining_lessons_drive_the_estimate() {
        let one_left =
            EnrolledCourseView::from_progress(&record(Some(course_with_lessons("a", 2)), &["a-l0"]), 30)
                .unwrap();
        assert_eq!(one_left.estimated_time_remaining, "30m");

        let three_left =
            EnrolledCourseView::from_progress(&record(Some(course_with_lessons("b", 3)), &[]), 30)
                .unwrap();
        assert_eq!(three_left.estimated_time_remaining, "2h");
    }

    #[test]
    fn lesson_durations_do_not_change_the_estimate() {
        let course: Course = serde_json::from_value(json!({
            "_id": "d",
            "modules": [{ "lessons": [
                { "_id": "d-l0", "duration": 5 },
                { "_id": "d-l1", "duration": 5 }
            ] }]
        }))
        .unwrap();
        let view = EnrolledCourseView::from_progress(&record(Some(course), &[]), 20).unwrap();
        assert_eq!(view.total_lesson_count, 2);
        assert_eq!(view.estimated_time_remaining, "40m");
    }

    #[test]
    fn duplicate_completions_count_once_and_clamp() {
        let course = course_with_lessons("c1", 2);
        let view = EnrolledCourseView::from_progress(
            &record(Some(course.clone()), &["c1-l0", "c1-l0"]),
            30,
        )
        .unwrap();
        assert_eq!(view.completed_lesson_count, 1);

        let over = EnrolledCourseView::from_progress(
            &record(Some(course), &["c1-l0", "c1-l1", "stale-lesson"]),
            30,
        )
        .unwrap();
        assert_eq!(over.completed_lesson_count, 2);
        assert_eq!(over.estimated_time_remaining, "0m");
    }

    #[test]
    fn record_fields_are_copied() {
        let mut progress = record(Some(course_with_lessons("c1", 1)), &[]);
        progress.progress_percentage = 42.5;
        progress.current_lesson = Some(
            serde_json::from_value(json!({ "_id": "c1-l0", "title": "Ownership" })).unwrap(),
        );
        let view = EnrolledCourseView::from_progress(&progress, 30).unwrap();
        assert_eq!(view.progress_percentage, 42.5);
        assert_eq!(view.next_lesson_title, "Ownership");
        assert!(view.has_quizzes && view.has_assignments && view.has_discussions);
        assert!(view.upcoming_deadlines.is_empty());
    }

    #[test]
    fn orphaned_records_are_excluded() {
        let progress = vec![
            record(Some(course_with_lessons("c1", 1)), &[]),
            record(None, &[]),
            ProgressRecord {
                course: Some(CourseRef::Id("c3".into())),
                ..ProgressRecord::default()
            },
        ];
        let view = build_view(&[], &progress, &NotificationsPage::default(), &[], 30);
        assert_eq!(view.enrolled_courses.len(), 1);
    }

    #[test]
    fn available_courses_exclude_enrolled() {
        let catalog = vec![course_with_lessons("c1", 1), course_with_lessons("c2", 1)];
        let progress = vec![record(Some(course_with_lessons("c1", 1)), &[])];
        let view = build_view(&catalog, &progress, &NotificationsPage::default(), &[], 30);
        let ids: Vec<_> = view.available_courses.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c2"]);
    }

    #[test]
    fn unread_count_prefers_server_total() {
        let page: NotificationsPage = serde_json::from_value(json!({
            "notifications": [
                { "_id": "n1", "isRead": false },
                { "_id": "n2", "isRead": true }
            ]
        }))
        .unwrap();
        assert_eq!(build_view(&[], &[], &page, &[], 30).unread_count, 1);

        let page = NotificationsPage {
            unread_count: Some(7),
            ..page
        };
        assert_eq!(build_view(&[], &[], &page, &[], 30).unread_count, 7);
    }

    #[test]
    fn certificate_view_prefers_certificate_number() {
        let certificate: Certificate = serde_json::from_value(json!({
            "_id": "mongo-id",
            "certificateId": "CERT-1",
            "course": { "_id": "c1", "title": "Rust 101" },
            "verificationCode": "V1",
            "score": 93.0
        }))
        .unwrap();
        let view = CertificateView::from(&certificate);
        assert_eq!(view.id, "CERT-1");
        assert_eq!(view.course_title.as_deref(), Some("Rust 101"));
        assert_eq!(view.verification_id.as_deref(), Some("V1"));

        let bare: Certificate =
            serde_json::from_value(json!({ "_id": "mongo-id", "course": "c1" })).unwrap();
        let view = CertificateView::from(&bare);
        assert_eq!(view.id, "mongo-id");
        assert_eq!(view.course_id.as_deref(), Some("c1"));
        assert_eq!(view.course_title, None);
    }
}
