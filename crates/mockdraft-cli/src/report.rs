// Plain-text rendering of the draft and file export of the results.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::File;
use std::path::Path;

use anyhow::Context;
use mockdraft_core::draft::pick::{BoardRow, Pick};
use mockdraft_core::draft::player::{Player, Position};
use mockdraft_core::draft::state::{DraftSnapshot, TeamState};

/// "R2.07 #17   Team 4           Garrett Wilson (WR - NYJ, ADP 15) -> WR"
pub fn pick_line(pick: &Pick) -> String {
    format!(
        "R{}.{:02} #{:<4} {:<16} {} -> {}{}",
        pick.round,
        pick.pick_in_round,
        pick.overall,
        truncate(&pick.team_name, 16),
        pick.player.label(),
        pick.slot,
        if pick.is_human() { "  (you)" } else { "" }
    )
}

/// One numbered row of the available-player list.
pub fn player_line(index: usize, player: &Player) -> String {
    format!(
        "{:>3}. {:<28} {:<4} {:<4} ADP {:>6.1}{}",
        index,
        truncate(&player.name, 28),
        player.position,
        player.nfl_team,
        player.adp,
        if player.rookie { "  (R)" } else { "" }
    )
}

/// Open slots left, e.g. "Needs: QB 1, RB 2, FLEX 1". Filled kinds are omitted.
pub fn needs_line(needs: &BTreeMap<Position, usize>) -> String {
    let mut open: Vec<(Position, usize)> = needs
        .iter()
        .filter(|(_, &n)| n > 0)
        .map(|(&pos, &n)| (pos, n))
        .collect();
    if open.is_empty() {
        return "Needs: none".to_string();
    }
    open.sort_by_key(|(pos, _)| pos.sort_order());
    let parts: Vec<String> = open.iter().map(|(pos, n)| format!("{pos} {n}")).collect();
    format!("Needs: {}", parts.join(", "))
}

/// A team's roster, one line per slot in display order.
pub fn roster_lines(team: &TeamState) -> Vec<String> {
    team.roster
        .slots()
        .iter()
        .map(|slot| match &slot.player {
            Some(player) => format!("  {:<5} {}", slot.position, player.label()),
            None => format!("  {:<5} -", slot.position),
        })
        .collect()
}

/// The full board as a fixed-width table.
pub fn board_table(rows: &[BoardRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<6} {:<16} {:<28} {:<4} {:<5} {:>6}  {:>7}",
        "Pick", "Rd.Pk", "Team", "Player", "Pos", "Slot", "ADP", "Score"
    );
    for row in rows {
        let score = row
            .score
            .map(|s| format!("{s:.3}"))
            .unwrap_or_else(|| "human".to_string());
        let _ = writeln!(
            out,
            "{:>4}  {:<6} {:<16} {:<28} {:<4} {:<5} {:>6.1}  {:>7}",
            row.overall_pick,
            format!("{}.{:02}", row.round, row.pick_in_round),
            truncate(&row.team, 16),
            truncate(&row.player, 28),
            row.position,
            row.slot,
            row.adp,
            score
        );
    }
    out
}

/// Write the board as CSV, creating parent directories as needed.
pub fn write_board_csv(path: &Path, rows: &[BoardRow]) -> anyhow::Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("failed to write board row {}", row.overall_pick))?;
    }
    writer.flush().context("failed to flush board CSV")?;
    Ok(())
}

/// Write the draft snapshot as pretty-printed JSON.
pub fn write_summary_json(path: &Path, snapshot: &DraftSnapshot<'_>) -> anyhow::Result<()> {
    ensure_parent(path)?;
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, snapshot).context("failed to serialize draft summary")?;
    Ok(())
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}~")
    }
}
