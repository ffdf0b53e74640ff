// Draft configuration, team lineup, and start-time validation.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::player::{Player, Position, PLAYING_POSITIONS};
use super::DraftError;
use crate::bot::scoring::{NoiseConfig, ScoringWeights};

// ---------------------------------------------------------------------------
// Roster rules
// ---------------------------------------------------------------------------

/// Slot requirements shared by every team in the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRules {
    slots: BTreeMap<Position, usize>,
    flex_positions: Vec<Position>,
}

impl Default for RosterRules {
    /// 1 QB, 2 RB, 2 WR, 1 TE, 1 FLEX (RB/WR/TE), 1 K, 1 DEF, 6 BE.
    fn default() -> Self {
        let slots = BTreeMap::from([
            (Position::Quarterback, 1),
            (Position::RunningBack, 2),
            (Position::WideReceiver, 2),
            (Position::TightEnd, 1),
            (Position::Flex, 1),
            (Position::Kicker, 1),
            (Position::Defense, 1),
            (Position::Bench, 6),
        ]);
        RosterRules {
            slots,
            flex_positions: vec![
                Position::RunningBack,
                Position::WideReceiver,
                Position::TightEnd,
            ],
        }
    }
}

impl RosterRules {
    pub fn new(slots: BTreeMap<Position, usize>, flex_positions: Vec<Position>) -> Self {
        RosterRules {
            slots: slots.into_iter().filter(|(_, n)| *n > 0).collect(),
            flex_positions,
        }
    }

    /// Build rules from config-file keys, e.g. `{"QB": 1, "RB": 2, "BE": 6}`.
    ///
    /// Unknown position keys are rejected rather than skipped.
    pub fn from_config(
        roster: &HashMap<String, usize>,
        flex_positions: &[String],
    ) -> Result<Self, DraftError> {
        let mut slots = BTreeMap::new();
        for (key, &count) in roster {
            let pos = Position::from_str_pos(key).ok_or_else(|| {
                DraftError::invalid(format!("roster.{key}"), "unknown roster position")
            })?;
            *slots.entry(pos).or_insert(0) += count;
        }
        let mut flex = Vec::new();
        for key in flex_positions {
            let pos = Position::from_str_pos(key).ok_or_else(|| {
                DraftError::invalid("flex.positions", format!("unknown position `{key}`"))
            })?;
            if !flex.contains(&pos) {
                flex.push(pos);
            }
        }
        Ok(RosterRules::new(slots, flex))
    }

    pub fn slots(&self) -> &BTreeMap<Position, usize> {
        &self.slots
    }

    pub fn flex_positions(&self) -> &[Position] {
        &self.flex_positions
    }

    /// Slots configured for a slot kind.
    pub fn required(&self, pos: Position) -> usize {
        self.slots.get(&pos).copied().unwrap_or(0)
    }

    /// Every non-bench slot.
    pub fn starter_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|(pos, _)| **pos != Position::Bench)
            .map(|(_, n)| n)
            .sum()
    }

    pub fn bench_count(&self) -> usize {
        self.required(Position::Bench)
    }

    pub fn total_count(&self) -> usize {
        self.slots.values().sum()
    }

    fn validate(&self, num_rounds: usize) -> Result<(), DraftError> {
        if self.required(Position::Flex) > 0 {
            if self.flex_positions.is_empty() {
                return Err(DraftError::invalid(
                    "flex.positions",
                    "FLEX slots are configured but no position is flex-eligible",
                ));
            }
            if let Some(meta) = self.flex_positions.iter().find(|p| p.is_meta_slot()) {
                return Err(DraftError::invalid(
                    "flex.positions",
                    format!("{meta} is not a playing position"),
                ));
            }
        }

        let starters = self.starter_count();
        if starters > num_rounds {
            return Err(DraftError::invalid(
                "roster",
                format!("{starters} starter slots cannot be filled in {num_rounds} rounds"),
            ));
        }
        let total = self.total_count();
        if total < num_rounds {
            return Err(DraftError::invalid(
                "roster",
                format!("{total} roster slots (bench included) leave no room for {num_rounds} rounds"),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Draft config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftConfig {
    pub num_teams: usize,
    pub num_rounds: usize,
    pub roster: RosterRules,
    pub scoring: ScoringWeights,
    pub noise: NoiseConfig,
}

impl Default for DraftConfig {
    fn default() -> Self {
        DraftConfig {
            num_teams: 12,
            num_rounds: 15,
            roster: RosterRules::default(),
            scoring: ScoringWeights::default(),
            noise: NoiseConfig::default(),
        }
    }
}

impl DraftConfig {
    /// Number of picks in a complete draft.
    pub fn total_picks(&self) -> usize {
        self.num_teams * self.num_rounds
    }

    /// Check internal consistency, independent of players and teams.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.num_teams < 2 {
            return Err(DraftError::invalid(
                "num_teams",
                format!("must be at least 2, got {}", self.num_teams),
            ));
        }
        if self.num_rounds == 0 {
            return Err(DraftError::invalid("num_rounds", "must be greater than 0"));
        }
        self.roster.validate(self.num_rounds)?;
        self.scoring.validate()?;
        self.noise.validate()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// A team entering the draft. Position in the list is its first-round slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSpec {
    pub name: String,
    pub human: bool,
}

impl TeamSpec {
    pub fn bot(name: &str) -> Self {
        TeamSpec {
            name: name.to_string(),
            human: false,
        }
    }

    pub fn human(name: &str) -> Self {
        TeamSpec {
            name: name.to_string(),
            human: true,
        }
    }

    /// `num_teams` teams named "Team 1".."Team N", human at the given 1-based slots.
    pub fn lineup(num_teams: usize, human_slots: &[usize]) -> Vec<TeamSpec> {
        (1..=num_teams)
            .map(|slot| TeamSpec {
                name: format!("Team {slot}"),
                human: human_slots.contains(&slot),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Start-time validation
// ---------------------------------------------------------------------------

/// Validate config, teams, and players together before any state exists.
pub(crate) fn validate_start(
    config: &DraftConfig,
    players: &[Player],
    teams: &[TeamSpec],
) -> Result<(), DraftError> {
    config.validate()?;

    if teams.len() != config.num_teams {
        return Err(DraftError::invalid(
            "teams",
            format!(
                "expected {} teams, got {}",
                config.num_teams,
                teams.len()
            ),
        ));
    }

    validate_players(players)?;

    let total_picks = config.total_picks();
    if total_picks > players.len() {
        return Err(DraftError::invalid(
            "players",
            format!(
                "{} teams x {} rounds needs {} players, dataset has {}",
                config.num_teams,
                config.num_rounds,
                total_picks,
                players.len()
            ),
        ));
    }

    let supply_at = |pos: Position| players.iter().filter(|p| p.position == pos).count();
    for &pos in PLAYING_POSITIONS {
        let needed = config.num_teams * config.roster.required(pos);
        let supply = supply_at(pos);
        if supply < needed {
            return Err(DraftError::invalid(
                "players",
                format!("{needed} {pos} slots to fill but only {supply} {pos} in the dataset"),
            ));
        }
    }

    // FLEX slots draw on whatever the dedicated slots leave over.
    let flex_needed = config.num_teams * config.roster.required(Position::Flex);
    let flex_supply: usize = config
        .roster
        .flex_positions()
        .iter()
        .map(|&pos| supply_at(pos).saturating_sub(config.num_teams * config.roster.required(pos)))
        .sum();
    if flex_supply < flex_needed {
        return Err(DraftError::invalid(
            "players",
            format!(
                "{flex_needed} FLEX slots to fill but only {flex_supply} flex-eligible players \
                 beyond the dedicated slots"
            ),
        ));
    }

    Ok(())
}

fn validate_players(players: &[Player]) -> Result<(), DraftError> {
    let mut seen = HashSet::new();
    for player in players {
        if !seen.insert(player.id) {
            return Err(DraftError::invalid(
                "players",
                format!("duplicate player id {}", player.id),
            ));
        }
        if player.name.trim().is_empty() {
            return Err(DraftError::invalid(
                "players",
                format!("player {} has an empty name", player.id),
            ));
        }
        if player.position.is_meta_slot() {
            return Err(DraftError::invalid(
                "players",
                format!("{} has non-playing position {}", player.name, player.position),
            ));
        }
        if !player.adp.is_finite() || player.adp <= 0.0 {
            return Err(DraftError::invalid(
                "players",
                format!("{} has out-of-range ADP {}", player.name, player.adp),
            ));
        }
    }
    Ok(())
}
