// Player records and football positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Football positions used for players and roster slot assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
    Defense,
    Flex,
    Bench,
}

/// Every concrete playing position, in display order.
pub const PLAYING_POSITIONS: &[Position] = &[
    Position::Quarterback,
    Position::RunningBack,
    Position::WideReceiver,
    Position::TightEnd,
    Position::Kicker,
    Position::Defense,
];

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Handles common fantasy-site abbreviations:
    /// - "DST", "D/ST", "DEF" -> Defense
    /// - "PK" -> Kicker
    /// - "FLEX", "W/R/T" -> Flex
    /// - "BE", "BN" -> Bench
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DEF" | "DST" | "D/ST" => Some(Position::Defense),
            "FLEX" | "W/R/T" => Some(Position::Flex),
            "BE" | "BN" => Some(Position::Bench),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DEF",
            Position::Flex => "FLEX",
            Position::Bench => "BE",
        }
    }

    /// Whether this is a meta-slot (not a concrete playing position).
    pub fn is_meta_slot(&self) -> bool {
        matches!(self, Position::Flex | Position::Bench)
    }

    /// Deterministic ordering index for roster slot display.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::Quarterback => 0,
            Position::RunningBack => 1,
            Position::WideReceiver => 2,
            Position::TightEnd => 3,
            Position::Flex => 4,
            Position::Kicker => 5,
            Position::Defense => 6,
            Position::Bench => 7,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.display_str())
    }
}

/// Stable identifier of a player within one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A draftable player. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    /// NFL team abbreviation. Empty when the dataset doesn't carry one.
    #[serde(default)]
    pub nfl_team: String,
    /// Average draft position; lower is more desirable.
    pub adp: f64,
    #[serde(default)]
    pub rookie: bool,
}

impl Player {
    pub fn new(id: u32, name: &str, position: Position, adp: f64) -> Self {
        Player {
            id: PlayerId(id),
            name: name.to_string(),
            position,
            nfl_team: String::new(),
            adp,
            rookie: false,
        }
    }

    pub fn with_team(mut self, nfl_team: &str) -> Self {
        self.nfl_team = nfl_team.to_string();
        self
    }

    pub fn as_rookie(mut self) -> Self {
        self.rookie = true;
        self
    }

    /// Short label used in logs and the CLI, e.g. "Bijan Robinson (RB - ATL, ADP 3)".
    pub fn label(&self) -> String {
        if self.nfl_team.is_empty() {
            format!("{} ({}, ADP {:.0})", self.name, self.position, self.adp)
        } else {
            format!(
                "{} ({} - {}, ADP {:.0})",
                self.name, self.position, self.nfl_team, self.adp
            )
        }
    }
}
