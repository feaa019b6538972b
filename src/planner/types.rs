use crate::calendar::Day;
use crate::model::{Assignment, EmployeeId, ShiftDefinition, ShiftId};
use crate::occupancy::{EmployeeDayStatus, ShiftOccupancy};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Stratégie d'optimisation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    Greedy,
    LinearProgram,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StrategyKind::Greedy => "greedy",
            StrategyKind::LinearProgram => "lp",
        })
    }
}

impl FromStr for StrategyKind {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" | "glouton" => Ok(StrategyKind::Greedy),
            "lp" | "linear" | "linear_program" | "simplex" => Ok(StrategyKind::LinearProgram),
            other => Err(PlanError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Heures comptées par affectation dans l'accumulateur de charge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HourAccounting {
    /// Durée réelle du shift.
    ShiftDuration,
    /// Forfait identique pour chaque affectation.
    Fixed(f64),
}

impl Default for HourAccounting {
    fn default() -> Self {
        HourAccounting::ShiftDuration
    }
}

impl HourAccounting {
    pub fn hours_for(self, shift: &ShiftDefinition) -> f64 {
        match self {
            HourAccounting::ShiftDuration => shift.duration_hours(),
            HourAccounting::Fixed(h) => h,
        }
    }
}

/// Traitement des affectations déjà enregistrées pour le mois.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExistingPolicy {
    /// Les affectations existantes amorcent le plan, seul le manque est comblé.
    #[default]
    Resume,
    /// Les affectations existantes sont ignorées, le mois est recalculé.
    Reset,
}

impl FromStr for ExistingPolicy {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resume" => Ok(ExistingPolicy::Resume),
            "reset" => Ok(ExistingPolicy::Reset),
            other => Err(PlanError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Options de planification
#[derive(Debug, Clone, Copy)]
pub struct PlanOptions {
    pub strategy: StrategyKind,
    pub max_iterations: usize,
    pub seed: u64,
    pub hours: HourAccounting,
    pub existing: ExistingPolicy,
    /// Demi-largeur de la bande d'équité du programme linéaire (0.1 = ±10 %).
    pub fairness_tolerance: f64,
    pub timeout: Option<Duration>,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Greedy,
            max_iterations: 1000,
            seed: 0,
            hours: HourAccounting::ShiftDuration,
            existing: ExistingPolicy::Resume,
            fairness_tolerance: 0.1,
            timeout: None,
        }
    }
}

/// Jeton d'annulation partagé entre l'appelant et un run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Cancelled,
    DeadlineExceeded,
}

impl Interrupt {
    pub fn message(self) -> &'static str {
        match self {
            Interrupt::Cancelled => "optimization cancelled",
            Interrupt::DeadlineExceeded => "optimization deadline exceeded",
        }
    }
}

/// Contrôle d'exécution consulté à chaque itération.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    cancel: Option<CancelToken>,
    deadline: Option<Instant>,
}

impl RunControl {
    pub fn new(cancel: Option<CancelToken>, timeout: Option<Duration>) -> Self {
        Self {
            cancel,
            deadline: timeout.map(|t| Instant::now() + t),
        }
    }

    pub fn check(&self) -> Option<Interrupt> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Some(Interrupt::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Some(Interrupt::DeadlineExceeded);
        }
        None
    }
}

/// Rôle qui n'a pas pu être pourvu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stall {
    pub date: NaiveDate,
    pub shift_id: ShiftId,
    pub role: String,
}

/// Résultat brut d'une stratégie sur un snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyOutcome {
    pub success: bool,
    pub message: String,
    pub assignments_made: usize,
    pub iterations: usize,
    pub stalled: Option<Stall>,
    pub fallback_used: bool,
}

impl StrategyOutcome {
    pub fn complete(assignments_made: usize, iterations: usize) -> Self {
        Self {
            success: true,
            message: format!("month fully covered ({assignments_made} assignment(s) made)"),
            assignments_made,
            iterations,
            stalled: None,
            fallback_used: false,
        }
    }

    pub fn failed<S: Into<String>>(message: S, assignments_made: usize, iterations: usize) -> Self {
        Self {
            success: false,
            message: message.into(),
            assignments_made,
            iterations,
            stalled: None,
            fallback_used: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: Day,
    pub occupancy: Vec<ShiftOccupancy>,
    pub statuses: Vec<EmployeeDayStatus>,
}

impl DayPlan {
    pub fn is_complete(&self) -> bool {
        !self.occupancy.iter().any(ShiftOccupancy::has_open_role)
    }

    /// Rôle au plus faible taux de couverture (shift puis rôle, premier en
    /// cas d'égalité). Les besoins nuls sont ignorés.
    pub fn most_needed_role(&self) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), f64)> = None;
        for (o, occupancy) in self.occupancy.iter().enumerate() {
            for (r, role) in occupancy.roles.iter().enumerate() {
                let Some(ratio) = role.ratio() else {
                    continue;
                };
                if best.map_or(true, |(_, b)| ratio < b) {
                    best = Some(((o, r), ratio));
                }
            }
        }
        best.and_then(|(pos, ratio)| (ratio < 1.0).then_some(pos))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeHours {
    pub employee_id: EmployeeId,
    pub name: String,
    pub hours: f64,
    pub target_hours: f64,
}

/// Résultat exposé aux collaborateurs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    pub year: i32,
    pub month: u32,
    pub strategy: StrategyKind,
    pub success: bool,
    pub message: String,
    pub assignments_made: usize,
    pub iterations: usize,
    pub fallback_used: bool,
    pub stalled: Option<Stall>,
    pub days: Vec<DayPlan>,
    pub employee_hours: Vec<EmployeeHours>,
    pub assignments: Vec<Assignment>,
}

impl PlanResult {
    pub fn hours_of(&self, id: &EmployeeId) -> Option<f64> {
        self.employee_hours
            .iter()
            .find(|h| &h.employee_id == id)
            .map(|h| h.hours)
    }
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("invalid month: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("duplicate employee id: {0}")]
    DuplicateEmployee(String),
    #[error("duplicate shift id: {0}")]
    DuplicateShift(String),
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
    #[error("unknown existing-assignment policy: {0}")]
    UnknownPolicy(String),
}
