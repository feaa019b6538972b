#![forbid(unsafe_code)]
//! Shiftplan : optimisation de plannings mensuels de service (sans BD).
//!
//! - Glouton randomisé (graine explicite) ou programme linéaire binaire.
//! - Couverture par rôle, pas de double affectation, absences respectées.
//! - Équilibrage de la charge sur l'objectif d'heures de chaque employé.
//! - Stockage fichiers (JSON/CSV) fourni à titre de collaborateur.

pub mod absence;
pub mod calendar;
pub mod io;
pub mod model;
pub mod occupancy;
pub mod planner;
pub mod render;
pub mod storage;

pub use absence::AbsenceResolver;
pub use calendar::Day;
pub use model::{
    Absence, AbsenceKind, Assignment, Dataset, Employee, EmployeeId, RoleRequirement,
    ShiftDefinition, ShiftId,
};
pub use occupancy::{DayStatus, EmployeeDayStatus, RoleOccupancy, ShiftOccupancy};
pub use planner::{
    CancelToken, Conflict, ConflictKind, DayPlan, ExistingPolicy, HourAccounting, PlanError,
    PlanInput, PlanOptions, PlanResult, Planner, Strategy, StrategyKind,
};
pub use render::{PlanRenderer, TextRenderer};
pub use storage::{JsonStorage, Storage};
