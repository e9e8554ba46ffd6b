//! Dashboard main renderer
//!
//! Plain-text rendering of the dashboard view for the terminal.

use super::state::{DashboardState, DashboardView, LoadState};
use super::utils::{format_compact_timestamp, progress_bar};
use std::fmt::Write;

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[1;36m";
const RED: &str = "\x1b[1;31m";
const RESET: &str = "\x1b[0m";

const PROGRESS_BAR_WIDTH: usize = 20;

pub fn render_dashboard(state: &DashboardState) -> String {
    let mut out = String::new();
    if let (LoadState::Failed, Some(error)) = (state.load_state(), state.error.as_deref()) {
        let _ = writeln!(out, "{RED}! {error}{RESET}\n");
    }
    render_view(&mut out, &state.view);
    out
}

/// JSON rendering of the view, for scripting.
pub fn render_json(view: &DashboardView) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(view)
}

fn section(out: &mut String, title: &str, count: usize) {
    let _ = writeln!(out, "{CYAN}{title}{RESET} {DIM}({count}){RESET}");
}

fn render_view(out: &mut String, view: &DashboardView) {
    section(out, "My Courses", view.enrolled_courses.len());
    if view.enrolled_courses.is_empty() {
        let _ = writeln!(out, "  {DIM}Not enrolled in any course yet{RESET}");
    }
    for course in &view.enrolled_courses {
        let _ = writeln!(
            out,
            "  {BOLD}{}{RESET} {DIM}[{}]{RESET}",
            course.title, course.course_id
        );
        let _ = writeln!(
            out,
            "    {} {:>3.0}%  {}/{} lessons  ~{} left",
            progress_bar(course.progress_percentage, PROGRESS_BAR_WIDTH),
            course.progress_percentage,
            course.completed_lesson_count,
            course.total_lesson_count,
            course.estimated_time_remaining
        );
        let _ = writeln!(
            out,
            "    Next: {}  {DIM}last accessed {}{RESET}",
            course.next_lesson_title,
            format_compact_timestamp(course.last_accessed_at)
        );
    }

    out.push('\n');
    section(out, "Available Courses", view.available_courses.len());
    for course in &view.available_courses {
        let level = course.level.as_deref().unwrap_or("all levels");
        let _ = writeln!(
            out,
            "  {} {DIM}[{}] {} lessons, {}{RESET}",
            course.title,
            course.id,
            course.total_lessons(),
            level
        );
    }

    out.push('\n');
    let _ = writeln!(
        out,
        "{CYAN}Notifications{RESET} {DIM}({} unread){RESET}",
        view.unread_count
    );
    for notification in &view.notifications {
        let marker = if notification.is_read { " " } else { "*" };
        let _ = writeln!(
            out,
            "  {marker} {DIM}{}{RESET} {BOLD}{}{RESET}: {} {DIM}[{} {}]{RESET}",
            format_compact_timestamp(notification.created_at),
            notification.title,
            notification.message,
            notification.kind,
            notification.id
        );
    }

    out.push('\n');
    section(out, "Certificates", view.certificates.len());
    for certificate in &view.certificates {
        let title = certificate
            .course_title
            .as_deref()
            .or(certificate.course_id.as_deref())
            .unwrap_or("Unknown course");
        let score = certificate
            .score
            .map(|s| format!(" score {s:.0}"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {title}{score} {DIM}[{}] completed {}{RESET}",
            certificate.id,
            format_compact_timestamp(certificate.completed_at)
        );
    }
}
