#![allow(dead_code)]
use chrono::{NaiveDate, NaiveTime, Weekday};
use shiftplan::{
    Absence, AbsenceKind, Assignment, EmployeeId, PlanInput, PlanResult, ShiftDefinition, ShiftId,
};
use shiftplan::{DayStatus, Employee};
use std::collections::HashSet;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn employee(id: &str, name: &str, role: &str) -> Employee {
    Employee::new(name, role).with_id(id).with_target_hours(160.0)
}

/// Shift "F" 06:00-14:00, lundi seulement, 1 Nurse.
pub fn early_monday() -> ShiftDefinition {
    ShiftDefinition::new("F", "Early", time(6, 0), time(14, 0))
        .unwrap()
        .with_id("F")
        .on(&[Weekday::Mon])
        .requiring("Nurse", 1)
}

/// Février 2021 : 28 jours, le 1er est un lundi (4 lundis).
pub fn february_two_nurses() -> PlanInput {
    let mut input = PlanInput::new(2021, 2);
    input.employees = vec![
        employee("a", "Alice", "Nurse"),
        employee("b", "Bob", "Nurse"),
    ];
    input.shifts = vec![early_monday()];
    input
}

pub fn absence(id: &str, kind: AbsenceKind, start: NaiveDate, end: NaiveDate) -> Absence {
    Absence::new(EmployeeId::new(id), kind, start, end).unwrap()
}

pub fn assignment(employee: &str, shift: &str, on: NaiveDate) -> Assignment {
    Assignment::new(EmployeeId::new(employee), ShiftId::new(shift), on)
}

/// Ward : 5 infirmiers, 2 médecins, trois shifts, quelques absences.
pub fn february_ward() -> PlanInput {
    let mut input = PlanInput::new(2021, 2);
    input.employees = vec![
        employee("n1", "Nina", "Nurse"),
        employee("n2", "Noah", "Nurse"),
        employee("n3", "Nora", "Nurse"),
        employee("n4", "Nils", "Nurse"),
        employee("n5", "Nell", "Nurse"),
        employee("d1", "Dana", "Doctor"),
        employee("d2", "Dirk", "Doctor"),
    ];
    let all = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
    input.shifts = vec![
        ShiftDefinition::new("L", "Late", time(14, 0), time(22, 0))
            .unwrap()
            .with_id("L")
            .on(&all)
            .requiring("Nurse", 1),
        ShiftDefinition::new("E", "Early", time(6, 0), time(14, 0))
            .unwrap()
            .with_id("E")
            .on(&all)
            .requiring("Nurse", 1)
            .requiring("Doctor", 1),
        ShiftDefinition::new("N", "Night", time(22, 0), time(6, 0))
            .unwrap()
            .with_id("N")
            .on(&all[..5])
            .requiring("Nurse", 1),
    ];
    input.absences = vec![
        absence("n1", AbsenceKind::Vacation, date(2021, 2, 1), date(2021, 2, 7)),
        absence("n2", AbsenceKind::SickLeave, date(2021, 2, 10), date(2021, 2, 12)),
        absence("d1", AbsenceKind::Other, date(2021, 2, 20), date(2021, 2, 21)),
    ];
    input
}

pub fn count_for(result: &PlanResult, id: &str) -> usize {
    result
        .assignments
        .iter()
        .filter(|a| a.employee_id.as_str() == id)
        .count()
}

/// Pas de double affectation, aucune affectation pendant une absence.
pub fn assert_plan_invariants(result: &PlanResult, input: &PlanInput) {
    let mut seen = HashSet::new();
    for a in &result.assignments {
        assert!(
            seen.insert((a.employee_id.clone(), a.date)),
            "{} double-booked on {}",
            a.employee_id,
            a.date
        );
        assert!(
            !input
                .absences
                .iter()
                .any(|abs| abs.employee_id == a.employee_id && abs.covers(a.date)),
            "{} assigned while absent on {}",
            a.employee_id,
            a.date
        );
    }
    for day in &result.days {
        for status in &day.statuses {
            if input
                .absences
                .iter()
                .any(|abs| abs.employee_id == status.employee_id && abs.covers(day.day.date))
            {
                assert!(matches!(status.status, DayStatus::Absent { .. }));
            }
        }
    }
}

/// Chaque rôle de chaque shift du mois est exactement pourvu.
pub fn assert_fully_covered(result: &PlanResult) {
    for day in &result.days {
        for shift in &day.occupancy {
            for role in &shift.roles {
                assert_eq!(
                    role.assigned, role.required,
                    "{} {} role {} not covered",
                    day.day.date,
                    shift.name,
                    role.label()
                );
            }
        }
    }
}
