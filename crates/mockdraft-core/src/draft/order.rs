// Snake draft order: odd rounds run 1..T, even rounds run T..1.
//
// Everything here is a pure function of the overall pick number and the team
// count, so the team on the clock never depends on draft history.

/// Round (1-based) containing overall pick `pick` (1-based).
pub fn round_for_pick(pick: usize, num_teams: usize) -> usize {
    debug_assert!(pick >= 1 && num_teams >= 1);
    (pick - 1) / num_teams + 1
}

/// Position within its round (1-based) of overall pick `pick`.
pub fn pick_in_round(pick: usize, num_teams: usize) -> usize {
    debug_assert!(pick >= 1 && num_teams >= 1);
    (pick - 1) % num_teams + 1
}

/// First-round slot (1-based) of the team that makes overall pick `pick`.
pub fn team_slot_for_pick(pick: usize, num_teams: usize) -> usize {
    let round = round_for_pick(pick, num_teams);
    let i = pick_in_round(pick, num_teams);
    if round % 2 == 1 {
        i
    } else {
        num_teams - i + 1
    }
}

/// Slots in picking order for a given round.
pub fn round_order(round: usize, num_teams: usize) -> Vec<usize> {
    let first = (round - 1) * num_teams + 1;
    (first..first + num_teams)
        .map(|pick| team_slot_for_pick(pick, num_teams))
        .collect()
}

/// Overall pick numbers (1-based) belonging to the team at `slot`.
pub fn picks_for_slot(slot: usize, num_teams: usize, num_rounds: usize) -> Vec<usize> {
    (1..=num_teams * num_rounds)
        .filter(|&pick| team_slot_for_pick(pick, num_teams) == slot)
        .collect()
}
