use crate::model::{Absence, EmployeeId};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Index des absences par employé.
#[derive(Debug, Clone, Default)]
pub struct AbsenceResolver {
    by_employee: HashMap<EmployeeId, Vec<Absence>>,
}

impl AbsenceResolver {
    pub fn new(absences: &[Absence]) -> Self {
        let mut by_employee: HashMap<EmployeeId, Vec<Absence>> = HashMap::new();
        for absence in absences {
            by_employee
                .entry(absence.employee_id.clone())
                .or_default()
                .push(absence.clone());
        }
        for list in by_employee.values_mut() {
            list.sort_by_key(|a| a.start);
        }
        Self { by_employee }
    }

    /// Première absence couvrant la date (bornes incluses).
    pub fn absence_on(&self, employee: &EmployeeId, date: NaiveDate) -> Option<&Absence> {
        self.by_employee
            .get(employee)?
            .iter()
            .find(|a| a.covers(date))
    }

    pub fn is_absent(&self, employee: &EmployeeId, date: NaiveDate) -> bool {
        self.absence_on(employee, date).is_some()
    }
}
