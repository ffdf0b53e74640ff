// ADP table loading.
//
// Reads the ADP_Table.csv layout: ADP, Position, Player, Team, plus an
// optional Rookie column. Position codes carry a rank suffix ("WR-01") which
// is dropped.

use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::draft::player::{Player, Position};

/// Columns every ADP table must have.
pub const REQUIRED_COLUMNS: &[&str] = &["ADP", "Position", "Player", "Team"];

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV row
// ---------------------------------------------------------------------------

/// One ADP table row. Columns are matched by header; extra ones are ignored.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawAdpRow {
    ADP: f64,
    Position: String,
    Player: String,
    #[serde(default)]
    Team: String,
    #[serde(default)]
    Rookie: Option<String>,
}

/// Position group from a ranked code such as "RB-12".
fn position_group(code: &str) -> Option<Position> {
    let group = code.split('-').next().unwrap_or(code);
    Position::from_str_pos(group).filter(|p| !p.is_meta_slot())
}

fn parse_rookie(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "y")
    )
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Parse players from any reader. `source` names the input in errors.
///
/// Ids are assigned from 1 in the order rows are accepted. Rows that cannot
/// become a valid player are logged and skipped.
pub fn load_players_from_reader<R: Read>(rdr: R, source: &str) -> Result<Vec<Player>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);

    let headers = reader.headers().map_err(|e| DatasetError::Csv {
        path: source.to_string(),
        source: e,
    })?;
    let present: HashSet<&str> = headers.iter().collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !present.contains(c))
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::Validation(format!(
            "{source} is missing columns: {}",
            missing.join(", ")
        )));
    }

    let mut players = Vec::new();
    let mut names = HashSet::new();
    for (row, result) in reader.deserialize::<RawAdpRow>().enumerate() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed ADP row {}: {}", row + 1, e);
                continue;
            }
        };
        let name = raw.Player.trim();
        if name.is_empty() {
            warn!("skipping ADP row {}: empty player name", row + 1);
            continue;
        }
        if !raw.ADP.is_finite() || raw.ADP <= 0.0 {
            warn!("skipping '{}': ADP {} out of range", name, raw.ADP);
            continue;
        }
        let Some(position) = position_group(&raw.Position) else {
            warn!("skipping '{}': unknown position '{}'", name, raw.Position);
            continue;
        };
        if !names.insert(name.to_string()) {
            warn!("duplicate ADP entry for '{}', keeping both rows", name);
        }

        let id = players.len() as u32 + 1;
        let mut player = Player::new(id, name, position, raw.ADP).with_team(raw.Team.trim());
        player.rookie = parse_rookie(raw.Rookie.as_deref());
        players.push(player);
    }

    if players.is_empty() {
        return Err(DatasetError::Validation(format!(
            "{source} produced zero valid rows"
        )));
    }
    Ok(players)
}

/// Load players from an ADP table on disk.
pub fn load_players(path: &Path) -> Result<Vec<Player>, DatasetError> {
    let file = std::fs::File::open(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let players = load_players_from_reader(file, &path.display().to_string())?;
    info!("Loaded {} players from {}", players.len(), path.display());
    Ok(players)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
