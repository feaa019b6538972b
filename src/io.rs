use crate::calendar::parse_weekday;
use crate::model::{
    Absence, AbsenceKind, Assignment, Dataset, Employee, EmployeeId, RoleRequirement,
    ShiftDefinition, ShiftId,
};
use crate::planner::PlanResult;
use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import d'employés depuis CSV: header `id,name,role[,location][,monthly_target_hours]`
pub fn import_employees_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Employee>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        let role = rec.get(2).context("missing role")?.trim();
        if id.is_empty() || name.is_empty() || role.is_empty() {
            bail!("invalid employee row (empty)");
        }
        let mut employee = Employee::new(name, role).with_id(id);
        if let Some(loc) = rec.get(3).map(str::trim).filter(|s| !s.is_empty()) {
            employee.location = Some(loc.to_string());
        }
        if let Some(hours) = rec.get(4).map(str::trim).filter(|s| !s.is_empty()) {
            let hours: f64 = hours
                .parse()
                .with_context(|| format!("invalid monthly_target_hours for {id}"))?;
            employee.monthly_target_hours = Some(hours);
        }
        out.push(employee);
    }
    Ok(out)
}

/// Import de shifts: header `id,short_name,name,start,end,weekdays,roles`
///
/// `weekdays` : `mon;tue` ou `1;2`. `roles` : `Nurse:2;Doctor:1` (compte 1 si omis).
pub fn import_shifts_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<ShiftDefinition>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let short = rec.get(1).context("missing short_name")?.trim();
        let name = rec.get(2).context("missing name")?.trim();
        let start = parse_time(rec.get(3).context("missing start")?)?;
        let end = parse_time(rec.get(4).context("missing end")?)?;
        let mut shift = ShiftDefinition::new(short, name, start, end)
            .map_err(anyhow::Error::msg)?
            .with_id(id);
        if let Some(days) = rec.get(5) {
            shift.weekdays = parse_weekdays(days)
                .with_context(|| format!("invalid weekdays for shift {id}"))?;
        }
        if let Some(roles) = rec.get(6) {
            shift.roles =
                parse_roles(roles).with_context(|| format!("invalid roles for shift {id}"))?;
        }
        out.push(shift);
    }
    Ok(out)
}

/// Import d'absences: header `employee_id,kind,start,end[,reason]`
pub fn import_absences_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Absence>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let employee = rec.get(0).context("missing employee_id")?.trim();
        let kind: AbsenceKind = rec
            .get(1)
            .context("missing kind")?
            .parse()
            .map_err(anyhow::Error::msg)?;
        let start = parse_date(rec.get(2).context("missing start")?)?;
        let end = parse_date(rec.get(3).context("missing end")?)?;
        let mut absence = Absence::new(EmployeeId::new(employee), kind, start, end)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid absence for {employee}"))?;
        if let Some(reason) = rec.get(4).map(str::trim).filter(|s| !s.is_empty()) {
            absence = absence.with_reason(reason);
        }
        out.push(absence);
    }
    Ok(out)
}

/// Import d'affectations existantes: header `employee_id,shift_id,date`
pub fn import_assignments_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Assignment>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let employee = rec.get(0).context("missing employee_id")?.trim();
        let shift = rec.get(1).context("missing shift_id")?.trim();
        let date = parse_date(rec.get(2).context("missing date")?)?;
        out.push(Assignment::new(
            EmployeeId::new(employee),
            ShiftId::new(shift),
            date,
        ));
    }
    Ok(out)
}

fn parse_time(raw: &str) -> anyhow::Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .with_context(|| format!("invalid time (expected HH:MM): {raw}"))
}

/// Date seule ou RFC3339 ; l'heure est ignorée.
fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = raw.parse::<DateTime<Utc>>() {
        return Ok(dt.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

fn parse_weekdays(raw: &str) -> anyhow::Result<Vec<chrono::Weekday>> {
    raw.split(';')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| parse_weekday(chunk).with_context(|| format!("unknown weekday: {chunk}")))
        .collect()
}

fn parse_roles(raw: &str) -> anyhow::Result<Vec<RoleRequirement>> {
    raw.split(';')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(parse_role)
        .collect()
}

fn parse_role(chunk: &str) -> anyhow::Result<RoleRequirement> {
    let Some((role, count)) = chunk.split_once(':') else {
        return Ok(RoleRequirement::new(chunk, 1));
    };
    let count: u32 = count
        .trim()
        .parse()
        .with_context(|| format!("invalid count in {chunk}"))?;
    Ok(RoleRequirement::new(role.trim(), count))
}

/// Export JSON du résultat (jolie mise en forme)
pub fn export_result_json<P: AsRef<Path>>(path: P, result: &PlanResult) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(result)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV du plan: header `date,employee_id,employee_name,shift_id,shift_name`
pub fn export_plan_csv<P: AsRef<Path>>(
    path: P,
    result: &PlanResult,
    dataset: &Dataset,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "employee_id", "employee_name", "shift_id", "shift_name"])?;
    for a in &result.assignments {
        let employee = dataset
            .find_employee(&a.employee_id)
            .map(|e| e.name.as_str())
            .unwrap_or("");
        let shift = dataset
            .find_shift(&a.shift_id)
            .map(|s| s.name.as_str())
            .unwrap_or("");
        let date = a.date.to_string();
        w.write_record([
            date.as_str(),
            a.employee_id.as_str(),
            employee,
            a.shift_id.as_str(),
            shift,
        ])?;
    }
    w.flush()?;
    Ok(())
}
