#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use shiftplan::{
    io,
    planner::{ExistingPolicy, HourAccounting, PlanInput, PlanOptions, Planner, StrategyKind},
    render::{PlanRenderer, TextRenderer},
    storage::{JsonStorage, Storage},
};
use std::time::Duration;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification mensuelle des shifts (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du jeu de données
    #[arg(long, global = true, default_value = "shiftplan.json")]
    data: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer des employés depuis un CSV
    ImportEmployees {
        #[arg(long)]
        csv: String,
    },

    /// Importer le catalogue de shifts depuis un CSV
    ImportShifts {
        #[arg(long)]
        csv: String,
    },

    /// Importer des absences depuis un CSV
    ImportAbsences {
        #[arg(long)]
        csv: String,
    },

    /// Importer des affectations existantes depuis un CSV
    ImportAssignments {
        #[arg(long)]
        csv: String,
    },

    /// Optimiser un mois
    Plan {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        /// greedy | lp
        #[arg(long, default_value = "greedy")]
        strategy: String,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 1000)]
        max_iterations: usize,
        /// resume | reset
        #[arg(long, default_value = "resume")]
        existing: String,
        /// Forfait d'heures par affectation (sinon durée réelle du shift)
        #[arg(long)]
        fixed_hours: Option<f64>,
        #[arg(long, default_value_t = 0.1)]
        fairness_tolerance: f64,
        #[arg(long)]
        timeout_ms: Option<u64>,
        #[arg(long)]
        location: Option<String>,
        /// Remplace les affectations du mois par le plan calculé
        #[arg(long)]
        apply: bool,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Afficher l'occupation d'un mois
    Show {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        location: Option<String>,
    },

    /// Vérifier les conflits d'un mois
    Check {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.data)?;
    let mut dataset = storage.load()?;
    let today = Utc::now().date_naive();

    let code = match cli.cmd {
        Commands::ImportEmployees { csv } => {
            let added = io::import_employees_csv(csv)?;
            let count = added.len();
            storage.update(|d| {
                d.employees.extend(added);
                Ok(())
            })?;
            println!("{count} employees imported");
            0
        }
        Commands::ImportShifts { csv } => {
            let added = io::import_shifts_csv(csv)?;
            let count = added.len();
            storage.update(|d| {
                d.shifts.extend(added);
                Ok(())
            })?;
            println!("{count} shifts imported");
            0
        }
        Commands::ImportAbsences { csv } => {
            let added = io::import_absences_csv(csv)?;
            let count = added.len();
            storage.update(|d| {
                d.absences.extend(added);
                Ok(())
            })?;
            println!("{count} absences imported");
            0
        }
        Commands::ImportAssignments { csv } => {
            let added = io::import_assignments_csv(csv)?;
            let count = added.len();
            storage.update(|d| {
                d.assignments.extend(added);
                Ok(())
            })?;
            println!("{count} assignments imported");
            0
        }
        Commands::Plan {
            year,
            month,
            strategy,
            seed,
            max_iterations,
            existing,
            fixed_hours,
            fairness_tolerance,
            timeout_ms,
            location,
            apply,
            out_json,
            out_csv,
        } => {
            if dataset.employees.is_empty() {
                bail!("aucun employé dans {}", storage.path().display());
            }
            let options = PlanOptions {
                strategy: strategy.parse::<StrategyKind>()?,
                max_iterations,
                seed,
                hours: fixed_hours.map_or(HourAccounting::ShiftDuration, HourAccounting::Fixed),
                existing: existing.parse::<ExistingPolicy>()?,
                fairness_tolerance,
                timeout: timeout_ms.map(Duration::from_millis),
            };
            let mut input = PlanInput::from_dataset(&dataset, year, month);
            input.location = location;
            input.today = Some(today);

            let result = Planner::new(options).plan(&input)?;
            print!("{}", TextRenderer.render_summary(&result));

            if let Some(path) = out_json {
                io::export_result_json(path, &result)?;
            }
            if let Some(path) = out_csv {
                io::export_plan_csv(path, &result, &dataset)?;
            }
            if apply {
                dataset.replace_month(year, month, result.assignments.clone());
                storage.save(&dataset)?;
            }
            // Code 2 = WARNING/INCOMPLETE
            if result.success {
                0
            } else {
                2
            }
        }
        Commands::Show {
            year,
            month,
            location,
        } => {
            let mut input = PlanInput::from_dataset(&dataset, year, month);
            input.location = location;
            input.today = Some(today);
            let snapshot = Planner::default().snapshot(&input)?;
            for day in &snapshot.days {
                print!("{}", TextRenderer.render_day(day));
            }
            0
        }
        Commands::Check {
            year,
            month,
            report,
        } => {
            let input = PlanInput::from_dataset(&dataset, year, month);
            let conflicts = Planner::default().check(&input);
            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflict(s)", conflicts.len());
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["employee_id", "date", "shift_a", "shift_b", "kind"])?;
                    for c in &conflicts {
                        let date = c.date.to_string();
                        w.write_record([
                            c.employee.as_str(),
                            date.as_str(),
                            c.shift_a.as_str(),
                            c.shift_b.as_ref().map_or("", |s| s.as_str()),
                            c.kind.label(),
                        ])?;
                    }
                    w.flush()?;
                }
                2
            }
        }
    };

    std::process::exit(code);
}
