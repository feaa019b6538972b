#![forbid(unsafe_code)]
mod common;

use common::*;
use shiftplan::{Absence, AbsenceKind, AbsenceResolver, EmployeeId};

#[test]
fn absence_bounds_are_inclusive() {
    let resolver = AbsenceResolver::new(&[absence(
        "a",
        AbsenceKind::SickLeave,
        date(2021, 2, 10),
        date(2021, 2, 12),
    )]);
    let a = EmployeeId::new("a");
    assert!(!resolver.is_absent(&a, date(2021, 2, 9)));
    assert!(resolver.is_absent(&a, date(2021, 2, 10)));
    assert!(resolver.is_absent(&a, date(2021, 2, 11)));
    assert!(resolver.is_absent(&a, date(2021, 2, 12)));
    assert!(!resolver.is_absent(&a, date(2021, 2, 13)));
    assert!(!resolver.is_absent(&EmployeeId::new("b"), date(2021, 2, 11)));
}

#[test]
fn single_day_absence_and_reason_text() {
    let one_day = absence("a", AbsenceKind::Other, date(2021, 3, 1), date(2021, 3, 1))
        .with_reason("training");
    let resolver = AbsenceResolver::new(&[one_day]);
    let found = resolver
        .absence_on(&EmployeeId::new("a"), date(2021, 3, 1))
        .unwrap();
    assert_eq!(found.reason_text(), "training");
    assert_eq!(found.kind, AbsenceKind::Other);
}

#[test]
fn reversed_absence_is_rejected() {
    let res = Absence::new(
        EmployeeId::new("a"),
        AbsenceKind::Vacation,
        date(2021, 3, 5),
        date(2021, 3, 1),
    );
    assert!(res.is_err());
}

#[test]
fn absence_kind_parses_common_spellings() {
    assert_eq!("vacation".parse::<AbsenceKind>(), Ok(AbsenceKind::Vacation));
    assert_eq!("SICK_LEAVE".parse::<AbsenceKind>(), Ok(AbsenceKind::SickLeave));
    assert_eq!("maladie".parse::<AbsenceKind>(), Ok(AbsenceKind::SickLeave));
    assert!("holiday-ish".parse::<AbsenceKind>().is_err());
}
