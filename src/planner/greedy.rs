use super::snapshot::MonthSnapshot;
use super::types::{HourAccounting, RunControl, Stall, StrategyKind, StrategyOutcome};
use super::Strategy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

/// Glouton randomisé : comble à chaque itération le rôle le moins couvert
/// d'un jour incomplet tiré au hasard, avec l'employé le moins chargé.
#[derive(Debug, Clone, Copy)]
pub struct GreedyStrategy {
    pub max_iterations: usize,
    pub seed: u64,
    pub hours: HourAccounting,
}

impl Default for GreedyStrategy {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            seed: 0,
            hours: HourAccounting::default(),
        }
    }
}

impl Strategy for GreedyStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Greedy
    }

    fn optimize(&self, snapshot: &mut MonthSnapshot, control: &RunControl) -> StrategyOutcome {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut made = 0usize;
        let mut iterations = 0usize;

        while iterations < self.max_iterations {
            let incomplete = snapshot.incomplete_days();
            if incomplete.is_empty() {
                info!(made, iterations, "greedy: month fully covered");
                return StrategyOutcome::complete(made, iterations);
            }
            if let Some(interrupt) = control.check() {
                warn!(made, iterations, "greedy: {}", interrupt.message());
                return StrategyOutcome::failed(interrupt.message(), made, iterations);
            }
            iterations += 1;

            // tirage parmi les jours incomplets uniquement
            let day = incomplete[rng.random_range(0..incomplete.len())];
            let Some((occ, role)) = snapshot.days[day].most_needed_role() else {
                continue;
            };

            match pick_candidate(snapshot, day, occ, role) {
                Some(employee) => {
                    let shift_id = snapshot.days[day].occupancy[occ].shift_id.clone();
                    let hours = snapshot
                        .shift(&shift_id)
                        .map_or(0.0, |s| self.hours.hours_for(s));
                    snapshot.assign(day, occ, role, employee, hours);
                    made += 1;
                }
                None => {
                    let plan = &snapshot.days[day];
                    let occupancy = &plan.occupancy[occ];
                    let stall = Stall {
                        date: plan.day.date,
                        shift_id: occupancy.shift_id.clone(),
                        role: occupancy.roles[role].label().to_string(),
                    };
                    warn!(date = %stall.date, role = %stall.role, made, "greedy: no available employee");
                    let mut outcome = StrategyOutcome::failed(
                        format!(
                            "no available employee for role {} on {} ({} assignment(s) made)",
                            stall.role, stall.date, made
                        ),
                        made,
                        iterations,
                    );
                    outcome.stalled = Some(stall);
                    return outcome;
                }
            }
        }

        if snapshot.incomplete_days().is_empty() {
            return StrategyOutcome::complete(made, iterations);
        }
        warn!(made, iterations, "greedy: iteration cap reached");
        StrategyOutcome::failed(
            format!(
                "iteration cap of {} reached before full coverage ({} assignment(s) made)",
                self.max_iterations, made
            ),
            made,
            iterations,
        )
    }
}

/// Employé disponible, qualifié, au plus faible ratio de charge ; le premier
/// dans l'ordre du snapshot l'emporte en cas d'égalité.
fn pick_candidate(snapshot: &MonthSnapshot, day: usize, occ: usize, role: usize) -> Option<usize> {
    let slot = &snapshot.days[day].occupancy[occ].roles[role];
    let mut best: Option<(usize, f64)> = None;
    for (idx, employee) in snapshot.employees.iter().enumerate() {
        if !slot.accepts(&employee.role) || !snapshot.is_available(idx, day) {
            continue;
        }
        let ratio = snapshot.workload_ratio(idx);
        if best.map_or(true, |(_, r)| ratio < r) {
            best = Some((idx, ratio));
        }
    }
    best.map(|(idx, _)| idx)
}
