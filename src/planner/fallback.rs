use super::snapshot::MonthSnapshot;
use std::collections::HashMap;

/// Affectation déterministe en round-robin, jour par jour.
///
/// Un curseur par rôle (le créneau ouvert a le sien) parcourt les employés
/// dans l'ordre du snapshot et persiste d'un jour à l'autre. Retourne le
/// nombre d'affectations faites.
pub(super) fn assign_round_robin(snapshot: &mut MonthSnapshot) -> usize {
    let total = snapshot.employees.len();
    if total == 0 {
        return 0;
    }

    let mut cursors: HashMap<Option<String>, usize> = HashMap::new();
    let mut made = 0usize;

    for day in 0..snapshot.days.len() {
        for occ in 0..snapshot.days[day].occupancy.len() {
            let hours = snapshot
                .shift(&snapshot.days[day].occupancy[occ].shift_id)
                .map_or(0.0, |s| s.duration_hours());

            for role in 0..snapshot.days[day].occupancy[occ].roles.len() {
                while snapshot.days[day].occupancy[occ].roles[role].is_open() {
                    let slot = &snapshot.days[day].occupancy[occ].roles[role];
                    let cursor = cursors.entry(slot.role.clone()).or_insert(0);

                    let chosen = (0..total).find_map(|_| {
                        let candidate = *cursor;
                        *cursor = (*cursor + 1) % total;

                        let employee = &snapshot.employees[candidate];
                        if slot.accepts(&employee.role) && snapshot.is_available(candidate, day) {
                            return Some(candidate);
                        }
                        None
                    });

                    match chosen {
                        Some(employee) => {
                            snapshot.assign(day, occ, role, employee, hours);
                            made += 1;
                        }
                        None => break,
                    }
                }
            }
        }
    }

    made
}
