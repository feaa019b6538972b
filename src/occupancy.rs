//! Calcul d'occupation : effectifs requis / affectés par shift et par rôle
//! pour une journée, à partir des statuts des employés.

use crate::model::{AbsenceKind, Employee, EmployeeId, ShiftDefinition, ShiftId};
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// État d'un employé pour une journée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DayStatus {
    Empty,
    Assigned {
        shift_id: ShiftId,
        shift_name: String,
    },
    Absent {
        kind: AbsenceKind,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDayStatus {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub status: DayStatus,
}

impl EmployeeDayStatus {
    pub fn empty(employee: &Employee) -> Self {
        Self {
            employee_id: employee.id.clone(),
            employee_name: employee.name.clone(),
            status: DayStatus::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.status, DayStatus::Empty)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self.status, DayStatus::Absent { .. })
    }

    pub fn assigned_shift(&self) -> Option<&ShiftId> {
        match &self.status {
            DayStatus::Assigned { shift_id, .. } => Some(shift_id),
            _ => None,
        }
    }
}

/// Occupation d'un rôle sur un shift. `role == None` : créneau ouvert à tous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleOccupancy {
    pub role: Option<String>,
    pub required: u32,
    pub assigned: u32,
    pub employees: Vec<String>,
}

impl RoleOccupancy {
    pub fn accepts(&self, role: &str) -> bool {
        self.role.as_deref().map_or(true, |r| r == role)
    }

    /// Taux assigned/required, `None` pour un besoin nul.
    pub fn ratio(&self) -> Option<f64> {
        (self.required > 0).then(|| f64::from(self.assigned) / f64::from(self.required))
    }

    pub fn is_open(&self) -> bool {
        self.assigned < self.required
    }

    pub fn label(&self) -> &str {
        self.role.as_deref().unwrap_or("*")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftOccupancy {
    pub shift_id: ShiftId,
    pub name: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub required: u32,
    pub assigned: u32,
    pub employees: Vec<String>,
    pub roles: Vec<RoleOccupancy>,
}

impl ShiftOccupancy {
    /// Occupation vide d'un shift ; sans rôle configuré, un créneau ouvert de 1.
    pub fn for_definition(shift: &ShiftDefinition) -> Self {
        let roles: Vec<RoleOccupancy> = if shift.roles.is_empty() {
            vec![RoleOccupancy {
                role: None,
                required: 1,
                assigned: 0,
                employees: Vec::new(),
            }]
        } else {
            // un rôle répété sur plusieurs lignes ne forme qu'un créneau
            let mut merged: Vec<RoleOccupancy> = Vec::with_capacity(shift.roles.len());
            for r in &shift.roles {
                match merged.iter_mut().find(|m| m.role.as_deref() == Some(r.role.as_str())) {
                    Some(slot) => slot.required += r.count,
                    None => merged.push(RoleOccupancy {
                        role: Some(r.role.clone()),
                        required: r.count,
                        assigned: 0,
                        employees: Vec::new(),
                    }),
                }
            }
            merged
        };
        Self {
            shift_id: shift.id.clone(),
            name: shift.name.clone(),
            start: shift.start,
            end: shift.end,
            required: roles.iter().map(|r| r.required).sum(),
            assigned: 0,
            employees: Vec::new(),
            roles,
        }
    }

    pub fn is_under_staffed(&self) -> bool {
        self.assigned < self.required
    }

    pub fn is_correctly_staffed(&self) -> bool {
        self.assigned == self.required
    }

    pub fn has_open_role(&self) -> bool {
        self.roles.iter().any(RoleOccupancy::is_open)
    }

    /// Enregistre une affectation sur le rôle `role_index`.
    pub fn record(&mut self, role_index: usize, employee_name: &str) {
        if let Some(role) = self.roles.get_mut(role_index) {
            role.assigned += 1;
            role.employees.push(employee_name.to_string());
            self.assigned += 1;
        }
        self.employees.push(employee_name.to_string());
    }

    /// Rôle qui accueille un employé : d'abord un rôle compatible non plein,
    /// sinon le premier compatible.
    pub fn slot_for(&self, role: &str) -> Option<usize> {
        self.roles
            .iter()
            .position(|r| r.accepts(role) && r.is_open())
            .or_else(|| self.roles.iter().position(|r| r.accepts(role)))
    }

    pub fn window_label(&self) -> String {
        format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Occupation d'une journée, triée par heure de début ("HHMM", tri stable).
pub fn day_occupancy(
    weekday: Weekday,
    shifts: &[ShiftDefinition],
    employees: &[Employee],
    statuses: &[EmployeeDayStatus],
) -> Vec<ShiftOccupancy> {
    let mut out: Vec<ShiftOccupancy> = shifts
        .iter()
        .filter(|s| s.applies_on(weekday))
        .map(ShiftOccupancy::for_definition)
        .collect();

    let roles: HashMap<&EmployeeId, &str> = employees
        .iter()
        .map(|e| (&e.id, e.role.as_str()))
        .collect();

    for status in statuses {
        let Some(shift_id) = status.assigned_shift() else {
            continue;
        };
        let Some(occupancy) = out.iter_mut().find(|o| &o.shift_id == shift_id) else {
            continue;
        };
        let role = roles.get(&status.employee_id).copied().unwrap_or_default();
        match occupancy.slot_for(role) {
            Some(idx) => occupancy.record(idx, &status.employee_name),
            // rôle hors besoins : listé mais non compté
            None => occupancy.employees.push(status.employee_name.clone()),
        }
    }

    out.sort_by_key(|o| o.start.format("%H%M").to_string());
    out
}
