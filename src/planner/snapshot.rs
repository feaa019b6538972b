use super::types::{DayPlan, EmployeeHours, ExistingPolicy, HourAccounting, PlanError};
use super::PlanInput;
use crate::absence::AbsenceResolver;
use crate::calendar::{self, Day};
use crate::model::{Assignment, Employee, EmployeeId, ShiftDefinition, ShiftId};
use crate::occupancy::{day_occupancy, DayStatus, EmployeeDayStatus};
use chrono::Datelike;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Photographie privée du mois sur laquelle travaillent les stratégies.
///
/// Les employés sont triés par identifiant : c'est l'ordre de parcours des
/// candidats. `statuses` de chaque jour est aligné sur `employees`.
#[derive(Debug, Clone)]
pub struct MonthSnapshot {
    pub year: i32,
    pub month: u32,
    pub employees: Vec<Employee>,
    pub shifts: Vec<ShiftDefinition>,
    pub days: Vec<DayPlan>,
    accumulated_hours: Vec<f64>,
    absences: AbsenceResolver,
    shift_index: HashMap<ShiftId, usize>,
}

impl MonthSnapshot {
    pub fn build(
        input: &PlanInput,
        existing: ExistingPolicy,
        hours: HourAccounting,
    ) -> Result<Self, PlanError> {
        let (year, month) = (input.year, input.month);
        if calendar::first_day(year, month).is_none() {
            return Err(PlanError::InvalidMonth { year, month });
        }

        let mut employees: Vec<Employee> = input.scoped_employees();
        employees.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(dup) = employees.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(PlanError::DuplicateEmployee(dup[0].id.to_string()));
        }

        let mut shift_index = HashMap::with_capacity(input.shifts.len());
        for (idx, shift) in input.shifts.iter().enumerate() {
            if shift_index.insert(shift.id.clone(), idx).is_some() {
                return Err(PlanError::DuplicateShift(shift.id.to_string()));
            }
        }

        let absences = AbsenceResolver::new(&input.absences);
        let mut accumulated_hours = vec![0.0; employees.len()];

        let mut days: Vec<DayPlan> = calendar::month_dates(year, month)
            .into_iter()
            .map(|date| {
                let statuses = employees
                    .iter()
                    .map(|e| match absences.absence_on(&e.id, date) {
                        Some(a) => EmployeeDayStatus {
                            employee_id: e.id.clone(),
                            employee_name: e.name.clone(),
                            status: DayStatus::Absent {
                                kind: a.kind,
                                reason: a.reason_text(),
                            },
                        },
                        None => EmployeeDayStatus::empty(e),
                    })
                    .collect();
                DayPlan {
                    day: Day::new(date, input.today, &input.shifts),
                    occupancy: Vec::new(),
                    statuses,
                }
            })
            .collect();

        if existing == ExistingPolicy::Resume {
            let emp_index: HashMap<&EmployeeId, usize> = employees
                .iter()
                .enumerate()
                .map(|(i, e)| (&e.id, i))
                .collect();
            for a in input
                .assignments
                .iter()
                .filter(|a| a.date.year() == year && a.date.month() == month)
            {
                let Some(&emp) = emp_index.get(&a.employee_id) else {
                    continue;
                };
                let Some(shift) = shift_index.get(&a.shift_id).map(|&i| &input.shifts[i]) else {
                    warn!(shift = %a.shift_id, "existing assignment references unknown shift");
                    continue;
                };
                let day = &mut days[a.date.day0() as usize];
                if !shift.applies_on(day.day.weekday) {
                    warn!(shift = %a.shift_id, date = %a.date, "existing assignment on inapplicable weekday");
                    continue;
                }
                let status = &mut day.statuses[emp];
                match status.status {
                    DayStatus::Empty => {
                        status.status = DayStatus::Assigned {
                            shift_id: shift.id.clone(),
                            shift_name: shift.name.clone(),
                        };
                        accumulated_hours[emp] += hours.hours_for(shift);
                    }
                    DayStatus::Absent { .. } => {
                        debug!(employee = %a.employee_id, date = %a.date, "absence overrides existing assignment");
                    }
                    DayStatus::Assigned { .. } => {
                        warn!(employee = %a.employee_id, date = %a.date, "employee already assigned that day, extra assignment ignored");
                    }
                }
            }
        }

        for day in days.iter_mut() {
            day.occupancy =
                day_occupancy(day.day.weekday, &input.shifts, &employees, &day.statuses);
        }

        Ok(Self {
            year,
            month,
            employees,
            shifts: input.shifts.clone(),
            days,
            accumulated_hours,
            absences,
            shift_index,
        })
    }

    pub fn shift(&self, id: &ShiftId) -> Option<&ShiftDefinition> {
        self.shift_index.get(id).map(|&i| &self.shifts[i])
    }

    pub fn is_absent(&self, employee: usize, day: usize) -> bool {
        self.absences
            .is_absent(&self.employees[employee].id, self.days[day].day.date)
    }

    /// Disponible : statut vide et aucune absence ce jour-là.
    pub fn is_available(&self, employee: usize, day: usize) -> bool {
        self.days[day].statuses[employee].is_empty() && !self.is_absent(employee, day)
    }

    pub fn accumulated_hours(&self, employee: usize) -> f64 {
        self.accumulated_hours[employee]
    }

    /// Charge relative : heures accumulées / objectif mensuel.
    pub fn workload_ratio(&self, employee: usize) -> f64 {
        self.accumulated_hours[employee] / self.employees[employee].target_hours()
    }

    /// Index des jours ayant au moins un rôle sous-pourvu.
    pub fn incomplete_days(&self) -> Vec<usize> {
        self.days
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.is_complete())
            .map(|(i, _)| i)
            .collect()
    }

    /// Affecte l'employé au rôle `role` du shift `occ` du jour `day`.
    pub fn assign(&mut self, day: usize, occ: usize, role: usize, employee: usize, hours: f64) {
        let plan = &mut self.days[day];
        let occupancy = &mut plan.occupancy[occ];
        let name = self.employees[employee].name.clone();
        plan.statuses[employee].status = DayStatus::Assigned {
            shift_id: occupancy.shift_id.clone(),
            shift_name: occupancy.name.clone(),
        };
        occupancy.record(role, &name);
        self.accumulated_hours[employee] += hours;
        debug!(
            date = %plan.day.date,
            shift = %occupancy.shift_id,
            employee = %self.employees[employee].id,
            "assigned"
        );
    }

    /// Heures réelles (durée des shifts) déjà affectées à chaque employé.
    pub fn scheduled_hours(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.employees.len()];
        for day in &self.days {
            for (idx, status) in day.statuses.iter().enumerate() {
                if let Some(shift) = status.assigned_shift().and_then(|id| self.shift(id)) {
                    out[idx] += shift.duration_hours();
                }
            }
        }
        out
    }

    pub fn employee_hours(&self) -> Vec<EmployeeHours> {
        self.scheduled_hours()
            .into_iter()
            .zip(&self.employees)
            .map(|(hours, e)| EmployeeHours {
                employee_id: e.id.clone(),
                name: e.name.clone(),
                hours,
                target_hours: e.target_hours(),
            })
            .collect()
    }

    /// Toutes les affectations du mois, triées par date puis employé.
    pub fn assignments(&self) -> Vec<Assignment> {
        let mut out = Vec::new();
        for day in &self.days {
            for status in &day.statuses {
                if let Some(shift_id) = status.assigned_shift() {
                    out.push(Assignment::new(
                        status.employee_id.clone(),
                        shift_id.clone(),
                        day.day.date,
                    ));
                }
            }
        }
        out
    }

    /// Nombre de rôles dont l'effectif affecté dépasse le besoin.
    pub fn overfilled_roles(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| d.occupancy.iter())
            .flat_map(|o| o.roles.iter())
            .filter(|r| r.assigned > r.required)
            .count()
    }
}
