//! Programme linéaire en variables binaires, une variable par triplet
//! (employé, jour, shift) admissible, résolu par `good_lp` (backend microlp).
//!
//! Contraintes :
//! - par (jour, shift, rôle) : somme == besoin restant du rôle ; la somme
//!   par (jour, shift) en découle puisque chaque variable porte un seul rôle ;
//! - par (employé, jour) : au plus un shift ;
//! - par employé : heures totales dans `[avg × (1 - tol), avg × (1 + tol)]`,
//!   `avg` = heures requises du mois / nombre d'employés.
//!
//! Si le programme est infaisable, on bascule sur le round-robin.
//!
//! Le `RunControl` n'est consulté qu'avant la résolution : microlp ne rend la
//! main qu'une fois le branch and bound terminé, donc un délai dépassé pendant
//! la résolution est seulement journalisé et la solution trouvée est gardée.

use super::fallback::assign_round_robin;
use super::snapshot::MonthSnapshot;
use super::types::{RunControl, StrategyKind, StrategyOutcome};
use super::Strategy;
use good_lp::{
    constraint, default_solver, variable, variables, Expression, Solution, SolverModel, Variable,
};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy)]
pub struct LinearProgramStrategy {
    pub fairness_tolerance: f64,
}

impl Default for LinearProgramStrategy {
    fn default() -> Self {
        Self {
            fairness_tolerance: 0.1,
        }
    }
}

struct Candidate {
    day: usize,
    occ: usize,
    role: usize,
    employee: usize,
    hours: f64,
    var: Variable,
}

impl Strategy for LinearProgramStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::LinearProgram
    }

    fn optimize(&self, snapshot: &mut MonthSnapshot, control: &RunControl) -> StrategyOutcome {
        if snapshot.incomplete_days().is_empty() {
            return StrategyOutcome::complete(0, 0);
        }
        if let Some(interrupt) = control.check() {
            return StrategyOutcome::failed(interrupt.message(), 0, 0);
        }

        match self.solve(snapshot) {
            Ok(selected) => {
                if let Some(interrupt) = control.check() {
                    warn!("lp: {} during solve, solution kept", interrupt.message());
                }
                let made = selected.len();
                for c in selected {
                    snapshot.assign(c.day, c.occ, c.role, c.employee, c.hours);
                }
                info!(made, "lp: optimal assignment applied");
                finish(snapshot, made, false)
            }
            Err(reason) => {
                warn!(%reason, "lp: infeasible, falling back to round-robin");
                let made = assign_round_robin(snapshot);
                finish(snapshot, made, true)
            }
        }
    }
}

impl LinearProgramStrategy {
    /// Construit et résout le programme ; `Err` décrit l'infaisabilité.
    fn solve(&self, snapshot: &MonthSnapshot) -> Result<Vec<Candidate>, String> {
        let n_employees = snapshot.employees.len();
        if n_employees == 0 {
            return Err("no employee".to_string());
        }

        let mut vars = variables!();
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut total_required_hours = 0.0;
        // (jour, shift, rôle, besoin restant)
        let mut open_slots: Vec<(usize, usize, usize, u32)> = Vec::new();

        for (d, plan) in snapshot.days.iter().enumerate() {
            for (o, occupancy) in plan.occupancy.iter().enumerate() {
                let hours = snapshot
                    .shift(&occupancy.shift_id)
                    .map_or(0.0, |s| s.duration_hours());
                total_required_hours += f64::from(occupancy.required) * hours;

                for (r, slot) in occupancy.roles.iter().enumerate() {
                    let remaining = slot.required.saturating_sub(slot.assigned);
                    if remaining > 0 {
                        open_slots.push((d, o, r, remaining));
                    }
                }

                for (e, employee) in snapshot.employees.iter().enumerate() {
                    if !snapshot.is_available(e, d) {
                        continue;
                    }
                    let role = occupancy
                        .roles
                        .iter()
                        .position(|slot| slot.accepts(&employee.role) && slot.is_open());
                    if let Some(role) = role {
                        candidates.push(Candidate {
                            day: d,
                            occ: o,
                            role,
                            employee: e,
                            hours,
                            var: vars.add(variable().binary()),
                        });
                    }
                }
            }
        }

        let scheduled = snapshot.scheduled_hours();
        let avg = total_required_hours / n_employees as f64;
        let lower = avg * (1.0 - self.fairness_tolerance);
        let upper = avg * (1.0 + self.fairness_tolerance);

        let objective = candidates
            .iter()
            .fold(Expression::from(0.0), |acc, c| acc + c.var);
        let mut problem = vars.maximise(objective).using(default_solver);

        for &(d, o, r, remaining) in &open_slots {
            let mut filled = Expression::from(0.0);
            let mut any = false;
            for c in candidates
                .iter()
                .filter(|c| c.day == d && c.occ == o && c.role == r)
            {
                filled.add_mul(1.0, c.var);
                any = true;
            }
            if !any {
                return Err(format!(
                    "no qualified employee for a slot on {}",
                    snapshot.days[d].day.date
                ));
            }
            let remaining = Expression::from(f64::from(remaining));
            problem = problem.with(constraint!(filled == remaining));
        }

        for d in 0..snapshot.days.len() {
            for e in 0..n_employees {
                let per_day: Vec<Variable> = candidates
                    .iter()
                    .filter(|c| c.day == d && c.employee == e)
                    .map(|c| c.var)
                    .collect();
                if per_day.len() < 2 {
                    continue;
                }
                let mut load = Expression::from(0.0);
                for v in per_day {
                    load.add_mul(1.0, v);
                }
                let one = Expression::from(1.0);
                problem = problem.with(constraint!(load <= one));
            }
        }

        for e in 0..n_employees {
            let mut hours = Expression::from(scheduled[e]);
            let mut any = false;
            for c in candidates.iter().filter(|c| c.employee == e) {
                hours.add_mul(c.hours, c.var);
                any = true;
            }
            if !any {
                if scheduled[e] < lower || scheduled[e] > upper {
                    return Err(format!(
                        "employee {} cannot reach the fairness band",
                        snapshot.employees[e].id
                    ));
                }
                continue;
            }
            let band_low = hours.clone();
            let (floor, ceiling) = (Expression::from(lower), Expression::from(upper));
            problem = problem
                .with(constraint!(band_low >= floor))
                .with(constraint!(hours <= ceiling));
        }

        let solution = problem.solve().map_err(|err| err.to_string())?;
        Ok(candidates
            .into_iter()
            .filter(|c| solution.value(c.var) > 0.5)
            .collect())
    }
}

fn finish(snapshot: &MonthSnapshot, made: usize, fallback_used: bool) -> StrategyOutcome {
    let complete = snapshot.incomplete_days().is_empty();
    let mut outcome = match (complete, fallback_used) {
        (true, false) => StrategyOutcome::complete(made, 1),
        (true, true) => StrategyOutcome {
            success: true,
            message: format!(
                "linear program infeasible, month covered by round-robin fallback ({made} assignment(s) made)"
            ),
            ..StrategyOutcome::complete(made, 1)
        },
        (false, true) => StrategyOutcome::failed(
            format!("linear program infeasible, round-robin fallback left open slots ({made} assignment(s) made)"),
            made,
            1,
        ),
        (false, false) => StrategyOutcome::failed(
            format!("linear program left open slots ({made} assignment(s) made)"),
            made,
            1,
        ),
    };
    outcome.fallback_used = fallback_used;
    outcome
}
