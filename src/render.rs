use crate::occupancy::DayStatus;
use crate::planner::{DayPlan, PlanResult};
use std::fmt::Write;

/// Permet de customiser le rendu d'un plan (texte, HTML, etc.).
pub trait PlanRenderer {
    fn render_day(&self, day: &DayPlan) -> String;
    fn render_summary(&self, result: &PlanResult) -> String;
}

/// Rendu texte brut pour la CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl PlanRenderer for TextRenderer {
    fn render_day(&self, day: &DayPlan) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} {}{}",
            day.day.date,
            day.day.weekday,
            if day.day.is_today { " (today)" } else { "" }
        );
        for shift in &day.occupancy {
            let flag = if shift.is_correctly_staffed() {
                "ok"
            } else if shift.is_under_staffed() {
                "under"
            } else {
                "over"
            };
            let _ = writeln!(
                out,
                "  {} {} {}/{} [{}] {}",
                shift.window_label(),
                shift.name,
                shift.assigned,
                shift.required,
                flag,
                shift.employees.join(", ")
            );
        }
        for status in &day.statuses {
            if let DayStatus::Absent { reason, .. } = &status.status {
                let _ = writeln!(out, "  absent: {} ({})", status.employee_name, reason);
            }
        }
        out
    }

    fn render_summary(&self, result: &PlanResult) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}-{:02} [{}] {}: {}",
            result.year,
            result.month,
            result.strategy,
            if result.success { "OK" } else { "INCOMPLETE" },
            result.message
        );
        for h in &result.employee_hours {
            let _ = writeln!(out, "  {} {:.1}h / {:.1}h", h.name, h.hours, h.target_hours);
        }
        out
    }
}
