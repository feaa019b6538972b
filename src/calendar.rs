use crate::model::{ShiftDefinition, ShiftId};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Un jour du mois planifié, avec les shifts qui s'y appliquent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub is_weekend: bool,
    pub is_today: bool,
    pub shifts: Vec<ShiftId>,
}

impl Day {
    pub fn new(date: NaiveDate, today: Option<NaiveDate>, catalog: &[ShiftDefinition]) -> Self {
        let weekday = date.weekday();
        Self {
            date,
            weekday,
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
            is_today: today == Some(date),
            shifts: catalog
                .iter()
                .filter(|s| s.applies_on(weekday))
                .map(|s| s.id.clone())
                .collect(),
        }
    }
}

/// Premier jour du mois, `None` si l'année/le mois sont invalides.
pub fn first_day(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Toutes les dates du mois, dans l'ordre.
pub fn month_dates(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(mut current) = first_day(year, month) else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(31);
    while current.month() == month {
        out.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    out
}

/// Parse un jour de semaine : `mon`, `monday`, `lundi` ou numéro ISO 1..=7.
pub fn parse_weekday(raw: &str) -> Option<Weekday> {
    let raw = raw.trim().to_ascii_lowercase();
    if let Ok(n) = raw.parse::<u8>() {
        return match n {
            1 => Some(Weekday::Mon),
            2 => Some(Weekday::Tue),
            3 => Some(Weekday::Wed),
            4 => Some(Weekday::Thu),
            5 => Some(Weekday::Fri),
            6 => Some(Weekday::Sat),
            7 => Some(Weekday::Sun),
            _ => None,
        };
    }
    match raw.as_str() {
        "lun" | "lundi" => Some(Weekday::Mon),
        "mar" | "mardi" => Some(Weekday::Tue),
        "mer" | "mercredi" => Some(Weekday::Wed),
        "jeu" | "jeudi" => Some(Weekday::Thu),
        "ven" | "vendredi" => Some(Weekday::Fri),
        "sam" | "samedi" => Some(Weekday::Sat),
        "dim" | "dimanche" => Some(Weekday::Sun),
        other => other.parse().ok(),
    }
}
