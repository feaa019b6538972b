#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn cli(data: &Path) -> Command {
    let mut cmd = Command::cargo_bin("shiftplan-cli").unwrap();
    cmd.arg("--data").arg(data);
    cmd
}

#[test]
fn import_plan_apply_then_check() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data.json");
    let employees = dir.path().join("employees.csv");
    let shifts = dir.path().join("shifts.csv");
    let assignments = dir.path().join("assignments.csv");
    fs::write(&employees, "id,name,role\na,Alice,Nurse\nb,Bob,Nurse\n").unwrap();
    fs::write(
        &shifts,
        "id,short_name,name,start,end,weekdays,roles\nF,F,Early,06:00,14:00,mon,Nurse:1\n",
    )
    .unwrap();
    fs::write(&assignments, "employee_id,shift_id,date\na,F,2021-02-02\n").unwrap();

    cli(&data)
        .arg("import-employees")
        .arg("--csv")
        .arg(&employees)
        .assert()
        .success();
    cli(&data)
        .arg("import-shifts")
        .arg("--csv")
        .arg(&shifts)
        .assert()
        .success();

    cli(&data)
        .args(["plan", "--year", "2021", "--month", "2", "--apply"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "OK: month fully covered (4 assignment(s) made)",
        ))
        .stdout(predicate::str::contains("Alice 16.0h / 160.0h"));

    cli(&data)
        .args(["check", "--year", "2021", "--month", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: no conflicts"));

    cli(&data)
        .arg("import-assignments")
        .arg("--csv")
        .arg(&assignments)
        .assert()
        .success();
    let report = dir.path().join("conflicts.csv");
    cli(&data)
        .args(["check", "--year", "2021", "--month", "2", "--report"])
        .arg(&report)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Found 1 conflict(s)"));
    let csv = fs::read_to_string(&report).unwrap();
    assert!(csv.contains("a,2021-02-02,F,,weekday"));
}

#[test]
fn plan_without_employees_fails() {
    let dir = tempdir().unwrap();
    cli(&dir.path().join("empty.json"))
        .args(["plan", "--year", "2021", "--month", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("aucun employé"));
}

#[test]
fn incomplete_plan_exits_with_warning_code() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data.json");
    let employees = dir.path().join("employees.csv");
    let shifts = dir.path().join("shifts.csv");
    fs::write(&employees, "id,name,role\nd,Dana,Doctor\n").unwrap();
    fs::write(
        &shifts,
        "id,short_name,name,start,end,weekdays,roles\nF,F,Early,06:00,14:00,mon,Nurse\n",
    )
    .unwrap();
    for (cmd, path) in [("import-employees", &employees), ("import-shifts", &shifts)] {
        cli(&data).arg(cmd).arg("--csv").arg(path).assert().success();
    }

    cli(&data)
        .args(["plan", "--year", "2021", "--month", "2", "--strategy", "greedy"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("INCOMPLETE"));
}
