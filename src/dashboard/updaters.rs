//! Dashboard state update logic
//!
//! Local patches the aggregator applies before the server confirms a mutation.

use super::state::{DashboardView, EnrolledCourseView, NotificationView};
use chrono::{DateTime, Utc};

impl DashboardView {
    pub fn enrolled_course(&self, course_id: &str) -> Option<&EnrolledCourseView> {
        self.enrolled_courses.iter().find(|c| c.course_id == course_id)
    }

    fn enrolled_course_mut(&mut self, course_id: &str) -> Option<&mut EnrolledCourseView> {
        self.enrolled_courses
            .iter_mut()
            .find(|c| c.course_id == course_id)
    }

    /// Move a catalog course into the enrolled list with zero progress.
    /// Returns false when the course is not in the catalog.
    pub fn move_to_enrolled(&mut self, course_id: &str, minutes_per_lesson: u32) -> bool {
        let Some(index) = self.available_courses.iter().position(|c| c.id == course_id) else {
            return false;
        };
        let course = self.available_courses.remove(index);
        if self.enrolled_course(course_id).is_none() {
            self.enrolled_courses
                .push(EnrolledCourseView::fresh(&course, minutes_per_lesson));
        }
        true
    }

    pub fn touch_course(&mut self, course_id: &str, now: DateTime<Utc>) -> bool {
        match self.enrolled_course_mut(course_id) {
            Some(course) => {
                course.last_accessed_at = Some(now);
                true
            }
            None => false,
        }
    }

    /// Add `lesson_id` to the course's completed set. Already-completed lessons are a no-op.
    pub fn record_lesson_completion(
        &mut self,
        course_id: &str,
        lesson_id: &str,
        minutes_per_lesson: u32,
    ) -> bool {
        let Some(course) = self.enrolled_course_mut(course_id) else {
            return false;
        };
        if !course.completed_lesson_ids.insert(lesson_id.to_string()) {
            return false;
        }
        course.recount(minutes_per_lesson);
        true
    }

    /// Returns true when the notification moved from unread to read.
    pub fn mark_notification_read(&mut self, notification_id: &str, now: DateTime<Utc>) -> bool {
        let Some(notification) = self
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
        else {
            return false;
        };
        if notification.is_read {
            return false;
        }
        notification.is_read = true;
        notification.read_at = Some(now);
        self.unread_count = self.unread_count.saturating_sub(1);
        true
    }

    /// Returns how many notifications changed state.
    pub fn mark_all_notifications_read(&mut self, now: DateTime<Utc>) -> usize {
        let mut changed = 0;
        for notification in self.notifications.iter_mut().filter(|n| !n.is_read) {
            notification.is_read = true;
            notification.read_at = Some(now);
            changed += 1;
        }
        // The server-side total may cover pages we never loaded.
        self.unread_count = 0;
        changed
    }

    pub fn remove_notification(&mut self, notification_id: &str) -> Option<NotificationView> {
        let index = self
            .notifications
            .iter()
            .position(|n| n.id == notification_id)?;
        let removed = self.notifications.remove(index);
        if !removed.is_read {
            self.unread_count = self.unread_count.saturating_sub(1);
        }
        Some(removed)
    }
}
