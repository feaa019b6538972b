use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Objectif mensuel appliqué quand l'employé n'en déclare pas.
pub const DEFAULT_TARGET_HOURS: f64 = 160.0;

/// Identifiant fort pour Employee
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifiant fort pour ShiftDefinition
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Employé planifiable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_target_hours: Option<f64>,
}

impl Employee {
    pub fn new<N: Into<String>, R: Into<String>>(name: N, role: R) -> Self {
        Self {
            id: EmployeeId::random(),
            name: name.into(),
            role: role.into(),
            location: None,
            monthly_target_hours: None,
        }
    }

    pub fn with_id<S: AsRef<str>>(mut self, id: S) -> Self {
        self.id = EmployeeId::new(id);
        self
    }

    pub fn with_location<S: Into<String>>(mut self, location: S) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_target_hours(mut self, hours: f64) -> Self {
        self.monthly_target_hours = Some(hours);
        self
    }

    /// Objectif d'heures du mois, 160 h si absent ou non positif.
    pub fn target_hours(&self) -> f64 {
        match self.monthly_target_hours {
            Some(h) if h > 0.0 => h,
            _ => DEFAULT_TARGET_HOURS,
        }
    }
}

/// Besoin en personnel d'un rôle sur un shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRequirement {
    pub role: String,
    pub count: u32,
}

impl RoleRequirement {
    pub fn new<R: Into<String>>(role: R, count: u32) -> Self {
        Self {
            role: role.into(),
            count,
        }
    }
}

/// Définition d'un shift du catalogue (fenêtre horaire + jours + besoins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    pub id: ShiftId,
    pub short_name: String,
    pub name: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    #[serde(default)]
    pub weekdays: Vec<Weekday>,
    #[serde(default)]
    pub roles: Vec<RoleRequirement>,
}

impl ShiftDefinition {
    /// Crée un shift en validant que `start != end`.
    pub fn new<S: Into<String>, N: Into<String>>(
        short_name: S,
        name: N,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Self, String> {
        if start == end {
            return Err("shift start and end cannot be equal".to_string());
        }
        Ok(Self {
            id: ShiftId::random(),
            short_name: short_name.into(),
            name: name.into(),
            start,
            end,
            weekdays: Vec::new(),
            roles: Vec::new(),
        })
    }

    pub fn with_id<S: AsRef<str>>(mut self, id: S) -> Self {
        self.id = ShiftId::new(id);
        self
    }

    pub fn on(mut self, weekdays: &[Weekday]) -> Self {
        self.weekdays = weekdays.to_vec();
        self
    }

    pub fn requiring<R: Into<String>>(mut self, role: R, count: u32) -> Self {
        self.roles.push(RoleRequirement::new(role, count));
        self
    }

    pub fn applies_on(&self, weekday: Weekday) -> bool {
        self.weekdays.contains(&weekday)
    }

    /// Effectif total requis, 1 par défaut sans répartition par rôle.
    pub fn required_total(&self) -> u32 {
        if self.roles.is_empty() {
            1
        } else {
            self.roles.iter().map(|r| r.count).sum()
        }
    }

    /// Durée en heures ; une fin <= début passe au lendemain.
    pub fn duration_hours(&self) -> f64 {
        let mut minutes = (self.end - self.start).num_minutes();
        if minutes <= 0 {
            minutes += 24 * 60;
        }
        minutes as f64 / 60.0
    }

    /// Clé de tri "HHMM" de l'heure de début.
    pub fn start_key(&self) -> String {
        self.start.format("%H%M").to_string()
    }

    pub fn window_label(&self) -> String {
        format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Nature d'une absence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceKind {
    Vacation,
    SickLeave,
    Other,
}

impl AbsenceKind {
    pub fn label(self) -> &'static str {
        match self {
            AbsenceKind::Vacation => "vacation",
            AbsenceKind::SickLeave => "sick_leave",
            AbsenceKind::Other => "other",
        }
    }
}

impl FromStr for AbsenceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vacation" | "conges" | "congés" => Ok(AbsenceKind::Vacation),
            "sick_leave" | "sick" | "maladie" => Ok(AbsenceKind::SickLeave),
            "other" | "autre" => Ok(AbsenceKind::Other),
            other => Err(format!("unknown absence kind: {other}")),
        }
    }
}

/// Absence d'un employé, bornes incluses, au jour près.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Absence {
    pub employee_id: EmployeeId,
    pub kind: AbsenceKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Absence {
    pub fn new(
        employee_id: EmployeeId,
        kind: AbsenceKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, String> {
        if end < start {
            return Err("absence end must not be before start".to_string());
        }
        Ok(Self {
            employee_id,
            kind,
            start,
            end,
            reason: None,
        })
    }

    pub fn with_reason<S: Into<String>>(mut self, reason: S) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Texte affiché : le motif s'il existe, sinon la nature.
    pub fn reason_text(&self) -> String {
        self.reason
            .clone()
            .unwrap_or_else(|| self.kind.label().to_string())
    }
}

/// Affectation d'un employé à un shift pour une date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub employee_id: EmployeeId,
    pub shift_id: ShiftId,
    pub date: NaiveDate,
}

impl Assignment {
    pub fn new(employee_id: EmployeeId, shift_id: ShiftId, date: NaiveDate) -> Self {
        Self {
            employee_id,
            shift_id,
            date,
        }
    }
}

/// Jeu de données complet manipulé par les collaborateurs (CSV, JSON, CLI).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Dataset {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub shifts: Vec<ShiftDefinition>,
    #[serde(default)]
    pub absences: Vec<Absence>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

impl Dataset {
    pub fn find_employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| &e.id == id)
    }
    pub fn find_shift(&self, id: &ShiftId) -> Option<&ShiftDefinition> {
        self.shifts.iter().find(|s| &s.id == id)
    }

    /// Remplace les affectations du mois par un plan accepté.
    pub fn replace_month(&mut self, year: i32, month: u32, plan: Vec<Assignment>) {
        use chrono::Datelike;
        self.assignments
            .retain(|a| !(a.date.year() == year && a.date.month() == month));
        self.assignments.extend(plan);
        self.assignments
            .sort_by(|a, b| (a.date, &a.employee_id).cmp(&(b.date, &b.employee_id)));
    }
}
