#![forbid(unsafe_code)]
mod common;

use chrono::Weekday;
use common::*;
use shiftplan::planner::{PlanOptions, Planner, StrategyKind};
use shiftplan::{AbsenceKind, EmployeeId, ShiftDefinition};

fn lp() -> Planner {
    Planner::new(PlanOptions {
        strategy: StrategyKind::LinearProgram,
        ..PlanOptions::default()
    })
}

#[test]
fn lp_splits_four_mondays_two_and_two() {
    let input = february_two_nurses();
    let result = lp().plan(&input).unwrap();

    assert!(result.success, "{}", result.message);
    assert!(!result.fallback_used);
    assert_eq!(result.strategy, StrategyKind::LinearProgram);
    assert_eq!(result.assignments.len(), 4);
    assert_eq!(count_for(&result, "a"), 2);
    assert_eq!(count_for(&result, "b"), 2);
    assert_fully_covered(&result);
}

#[test]
fn lp_hours_stay_inside_the_fairness_band() {
    let mut input = february_two_nurses();
    input.employees.push(employee("c", "Carl", "Nurse"));
    input.shifts = vec![ShiftDefinition::new("D", "Day", time(8, 0), time(16, 0))
        .unwrap()
        .with_id("D")
        .on(&[Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri])
        .requiring("Nurse", 1)];

    let result = lp().plan(&input).unwrap();
    assert!(result.success, "{}", result.message);
    assert!(!result.fallback_used);

    let avg = 20.0 * 8.0 / 3.0;
    for h in &result.employee_hours {
        assert!(
            h.hours >= 0.9 * avg - 1e-6 && h.hours <= 1.1 * avg + 1e-6,
            "{} has {}h, band around {avg}",
            h.name,
            h.hours
        );
    }
    assert_plan_invariants(&result, &input);
    assert_fully_covered(&result);
}

#[test]
fn lp_respects_roles_and_single_shift_per_day() {
    let mut input = february_two_nurses();
    input.employees = vec![
        employee("d1", "Dana", "Doctor"),
        employee("d2", "Dirk", "Doctor"),
        employee("n1", "Nina", "Nurse"),
        employee("n2", "Noah", "Nurse"),
    ];
    input.shifts = vec![
        ShiftDefinition::new("E", "Early", time(6, 0), time(14, 0))
            .unwrap()
            .with_id("E")
            .on(&[Weekday::Mon])
            .requiring("Nurse", 1)
            .requiring("Doctor", 1),
        ShiftDefinition::new("L", "Late", time(14, 0), time(22, 0))
            .unwrap()
            .with_id("L")
            .on(&[Weekday::Mon])
            .requiring("Nurse", 1)
            .requiring("Doctor", 1),
    ];

    let result = lp().plan(&input).unwrap();
    assert!(result.success, "{}", result.message);
    assert!(!result.fallback_used);
    assert_eq!(result.assignments.len(), 16);
    assert_plan_invariants(&result, &input);
    assert_fully_covered(&result);
    for day in &result.days {
        for shift in &day.occupancy {
            for role in &shift.roles {
                assert!(role.assigned <= role.required);
            }
        }
    }
}

#[test]
fn infeasible_band_falls_back_to_round_robin() {
    let mut input = february_two_nurses();
    input.employees.push(employee("c", "Carl", "Nurse"));
    input.absences.push(absence(
        "c",
        AbsenceKind::Vacation,
        date(2021, 2, 1),
        date(2021, 2, 28),
    ));

    let result = lp().plan(&input).unwrap();
    assert!(result.success, "{}", result.message);
    assert!(result.fallback_used);
    assert!(result.message.contains("fallback"));
    assert_eq!(count_for(&result, "a"), 2);
    assert_eq!(count_for(&result, "b"), 2);
    assert_eq!(count_for(&result, "c"), 0);
    assert_eq!(result.hours_of(&EmployeeId::new("c")), Some(0.0));
    assert_plan_invariants(&result, &input);
}

#[test]
fn fallback_fills_what_it_can() {
    let mut input = february_two_nurses();
    input.employees.truncate(1);
    input.shifts = vec![ShiftDefinition::new("F", "Early", time(6, 0), time(14, 0))
        .unwrap()
        .with_id("F")
        .on(&[Weekday::Mon])
        .requiring("Nurse", 2)];

    let result = lp().plan(&input).unwrap();
    assert!(!result.success);
    assert!(result.fallback_used);
    assert_eq!(result.assignments_made, 4);
    assert_plan_invariants(&result, &input);
}

#[test]
fn lp_on_covered_month_is_a_no_op() {
    let mut input = february_two_nurses();
    input.assignments = vec![
        assignment("a", "F", date(2021, 2, 1)),
        assignment("b", "F", date(2021, 2, 8)),
        assignment("a", "F", date(2021, 2, 15)),
        assignment("b", "F", date(2021, 2, 22)),
    ];
    let result = lp().plan(&input).unwrap();
    assert!(result.success);
    assert_eq!(result.assignments_made, 0);
    assert_eq!(result.assignments.len(), 4);
}

#[test]
fn lp_solves_repeated_role_rows_without_fallback() {
    let mut input = february_two_nurses();
    input.shifts = vec![early_monday().requiring("Nurse", 1)];

    let result = lp().plan(&input).unwrap();
    assert!(result.success, "{}", result.message);
    assert!(!result.fallback_used);
    assert_eq!(result.assignments_made, 8);
    assert_eq!(count_for(&result, "a"), 4);
    assert_eq!(count_for(&result, "b"), 4);
    assert_plan_invariants(&result, &input);
}
