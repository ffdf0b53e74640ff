// Individual pick representation and the draft board.

use serde::{Deserialize, Serialize};

use super::player::{Player, Position};
use crate::bot::scoring::ScoreBreakdown;

/// How a pick was decided.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Selection {
    /// Chosen by the bot, with the score that won it.
    Bot(ScoreBreakdown),
    /// Supplied by a human-controlled team.
    Human,
}

/// A single finalized draft pick. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    /// Overall pick number (1-indexed).
    pub overall: usize,
    pub round: usize,
    pub pick_in_round: usize,
    /// ID of the team that made the pick (e.g. "team_3").
    pub team_id: String,
    pub team_name: String,
    /// First-round slot of the team (1-indexed).
    pub team_slot: usize,
    pub player: Player,
    /// Roster slot kind the player was placed in.
    pub slot: Position,
    pub selection: Selection,
}

impl Pick {
    /// The winning bot score, or `None` for a human pick.
    pub fn score(&self) -> Option<f64> {
        match &self.selection {
            Selection::Bot(breakdown) => Some(breakdown.total),
            Selection::Human => None,
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self.selection, Selection::Human)
    }
}

/// One row of the draft board, flattened for CSV export and display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardRow {
    pub overall_pick: usize,
    pub round: usize,
    pub pick_in_round: usize,
    pub team: String,
    pub player: String,
    pub position: String,
    pub nfl_team: String,
    pub adp: f64,
    pub rookie: bool,
    pub slot: String,
    pub source: &'static str,
    pub score: Option<f64>,
}

impl From<&Pick> for BoardRow {
    fn from(pick: &Pick) -> Self {
        BoardRow {
            overall_pick: pick.overall,
            round: pick.round,
            pick_in_round: pick.pick_in_round,
            team: pick.team_name.clone(),
            player: pick.player.name.clone(),
            position: pick.player.position.to_string(),
            nfl_team: pick.player.nfl_team.clone(),
            adp: pick.player.adp,
            rookie: pick.player.rookie,
            slot: pick.slot.to_string(),
            source: if pick.is_human() { "human" } else { "bot" },
            score: pick.score(),
        }
    }
}
