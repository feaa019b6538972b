use crate::absence::AbsenceResolver;
use crate::model::{Absence, Assignment, Employee, EmployeeId, ShiftDefinition, ShiftId};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    DoubleBooking,      // deux shifts le même jour
    AbsenceOverlap,     // affecté pendant une absence
    RoleMismatch,       // rôle absent des besoins du shift
    InapplicableWeekday,
    UnknownShift,
}

impl ConflictKind {
    pub fn label(self) -> &'static str {
        match self {
            ConflictKind::DoubleBooking => "double",
            ConflictKind::AbsenceOverlap => "absence",
            ConflictKind::RoleMismatch => "role",
            ConflictKind::InapplicableWeekday => "weekday",
            ConflictKind::UnknownShift => "unknown_shift",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub employee: EmployeeId,
    pub date: NaiveDate,
    pub shift_a: ShiftId,
    pub shift_b: Option<ShiftId>,
    pub kind: ConflictKind,
}

/// Audite des affectations ; `month` restreint l'audit à un mois donné.
pub fn detect_conflicts(
    employees: &[Employee],
    shifts: &[ShiftDefinition],
    absences: &[Absence],
    assignments: &[Assignment],
    month: Option<(i32, u32)>,
) -> Vec<Conflict> {
    let resolver = AbsenceResolver::new(absences);
    let catalog: HashMap<&ShiftId, &ShiftDefinition> = shifts.iter().map(|s| (&s.id, s)).collect();
    let roles: HashMap<&EmployeeId, &str> =
        employees.iter().map(|e| (&e.id, e.role.as_str())).collect();

    let mut scoped: Vec<&Assignment> = assignments
        .iter()
        .filter(|a| month.map_or(true, |(y, m)| a.date.year() == y && a.date.month() == m))
        .collect();
    scoped.sort_by(|a, b| (a.date, &a.employee_id).cmp(&(b.date, &b.employee_id)));

    let mut out = Vec::new();
    let conflict = |a: &Assignment, shift_b: Option<ShiftId>, kind| Conflict {
        employee: a.employee_id.clone(),
        date: a.date,
        shift_a: a.shift_id.clone(),
        shift_b,
        kind,
    };

    for (idx, a) in scoped.iter().enumerate() {
        if let Some(b) = scoped
            .iter()
            .skip(idx + 1)
            .take_while(|b| b.date == a.date)
            .find(|b| b.employee_id == a.employee_id)
        {
            out.push(conflict(a, Some(b.shift_id.clone()), ConflictKind::DoubleBooking));
        }

        if resolver.is_absent(&a.employee_id, a.date) {
            out.push(conflict(a, None, ConflictKind::AbsenceOverlap));
        }

        let Some(shift) = catalog.get(&a.shift_id) else {
            out.push(conflict(a, None, ConflictKind::UnknownShift));
            continue;
        };
        if !shift.applies_on(a.date.weekday()) {
            out.push(conflict(a, None, ConflictKind::InapplicableWeekday));
        }
        if let Some(role) = roles.get(&a.employee_id) {
            if !shift.roles.is_empty() && !shift.roles.iter().any(|r| r.role == *role) {
                out.push(conflict(a, None, ConflictKind::RoleMismatch));
            }
        }
    }

    out
}
