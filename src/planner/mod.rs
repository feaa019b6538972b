mod conflicts;
mod fallback;
mod greedy;
mod lp;
mod snapshot;
mod types;

pub use conflicts::{detect_conflicts, Conflict, ConflictKind};
pub use greedy::GreedyStrategy;
pub use lp::LinearProgramStrategy;
pub use snapshot::MonthSnapshot;
pub use types::{
    CancelToken, DayPlan, EmployeeHours, ExistingPolicy, HourAccounting, Interrupt, PlanError,
    PlanOptions, PlanResult, RunControl, Stall, StrategyKind, StrategyOutcome,
};

use crate::model::{Absence, Assignment, Dataset, Employee, ShiftDefinition};
use chrono::NaiveDate;
use tracing::info;

/// Stratégie d'optimisation appliquée à un snapshot mensuel.
pub trait Strategy {
    fn kind(&self) -> StrategyKind;
    /// Complète le snapshot en place.
    fn optimize(&self, snapshot: &mut MonthSnapshot, control: &RunControl) -> StrategyOutcome;
}

/// Entrées d'une planification, chargées par l'appelant.
#[derive(Debug, Clone, Default)]
pub struct PlanInput {
    pub year: i32,
    pub month: u32,
    pub employees: Vec<Employee>,
    pub shifts: Vec<ShiftDefinition>,
    pub absences: Vec<Absence>,
    pub assignments: Vec<Assignment>,
    /// Ne garde que les employés rattachés à ce site.
    pub location: Option<String>,
    pub today: Option<NaiveDate>,
}

impl PlanInput {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            ..Self::default()
        }
    }

    pub fn from_dataset(dataset: &Dataset, year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            employees: dataset.employees.clone(),
            shifts: dataset.shifts.clone(),
            absences: dataset.absences.clone(),
            assignments: dataset.assignments.clone(),
            location: None,
            today: None,
        }
    }

    /// Employés retenus pour le run : tous, ou ceux du site `location`.
    pub fn scoped_employees(&self) -> Vec<Employee> {
        self.employees
            .iter()
            .filter(|e| match &self.location {
                Some(loc) => e.location.as_deref() == Some(loc.as_str()),
                None => true,
            })
            .cloned()
            .collect()
    }
}

/// Façade : construit le snapshot, exécute la stratégie configurée.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    options: PlanOptions,
}

impl Planner {
    pub fn new(options: PlanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PlanOptions {
        &self.options
    }

    pub fn strategy(&self) -> Box<dyn Strategy> {
        match self.options.strategy {
            StrategyKind::Greedy => Box::new(GreedyStrategy {
                max_iterations: self.options.max_iterations,
                seed: self.options.seed,
                hours: self.options.hours,
            }),
            StrategyKind::LinearProgram => Box::new(LinearProgramStrategy {
                fairness_tolerance: self.options.fairness_tolerance,
            }),
        }
    }

    /// Snapshot du mois sans optimisation (état courant).
    pub fn snapshot(&self, input: &PlanInput) -> Result<MonthSnapshot, PlanError> {
        MonthSnapshot::build(input, self.options.existing, self.options.hours)
    }

    pub fn plan(&self, input: &PlanInput) -> Result<PlanResult, PlanError> {
        let control = RunControl::new(None, self.options.timeout);
        self.plan_with(input, self.strategy().as_ref(), &control)
    }

    pub fn plan_with_cancel(
        &self,
        input: &PlanInput,
        cancel: CancelToken,
    ) -> Result<PlanResult, PlanError> {
        let control = RunControl::new(Some(cancel), self.options.timeout);
        self.plan_with(input, self.strategy().as_ref(), &control)
    }

    /// Exécute une stratégie donnée ; utile pour injecter une implémentation.
    pub fn plan_with(
        &self,
        input: &PlanInput,
        strategy: &dyn Strategy,
        control: &RunControl,
    ) -> Result<PlanResult, PlanError> {
        let mut snapshot = self.snapshot(input)?;
        info!(
            year = input.year,
            month = input.month,
            strategy = %strategy.kind(),
            employees = snapshot.employees.len(),
            "planning month"
        );
        let outcome = strategy.optimize(&mut snapshot, control);
        Ok(result_from(snapshot, strategy.kind(), outcome))
    }

    /// Conflits des affectations enregistrées pour le mois de `input`.
    pub fn check(&self, input: &PlanInput) -> Vec<Conflict> {
        let employees = input.scoped_employees();
        let assignments: Vec<Assignment> = match input.location {
            Some(_) => input
                .assignments
                .iter()
                .filter(|a| employees.iter().any(|e| e.id == a.employee_id))
                .cloned()
                .collect(),
            None => input.assignments.clone(),
        };
        detect_conflicts(
            &employees,
            &input.shifts,
            &input.absences,
            &assignments,
            Some((input.year, input.month)),
        )
    }
}

fn result_from(snapshot: MonthSnapshot, kind: StrategyKind, outcome: StrategyOutcome) -> PlanResult {
    PlanResult {
        year: snapshot.year,
        month: snapshot.month,
        strategy: kind,
        success: outcome.success,
        message: outcome.message,
        assignments_made: outcome.assignments_made,
        iterations: outcome.iterations,
        fallback_used: outcome.fallback_used,
        stalled: outcome.stalled,
        employee_hours: snapshot.employee_hours(),
        assignments: snapshot.assignments(),
        days: snapshot.days,
    }
}
