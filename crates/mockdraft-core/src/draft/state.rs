// Draft state: teams, pool, pick history, and the pick-by-pick state machine.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::order::{pick_in_round, round_for_pick, team_slot_for_pick};
use super::pick::{BoardRow, Pick, Selection};
use super::player::{Player, PlayerId, Position};
use super::pool::PlayerPool;
use super::roster::Roster;
use super::settings::{validate_start, DraftConfig, TeamSpec};
use super::supply::LeagueSupply;
use super::DraftError;
use crate::bot::decide::decide;
use crate::bot::scoring::{PickContext, Scorer};

/// The state of a single team during the draft.
#[derive(Debug, Clone, Serialize)]
pub struct TeamState {
    /// Team identifier (e.g., "team_1").
    pub team_id: String,
    /// Display name of the team.
    pub team_name: String,
    /// First-round draft slot (1-indexed).
    pub slot: usize,
    /// Whether picks for this team are supplied by a person.
    pub human: bool,
    /// The team's roster.
    pub roster: Roster,
}

/// Lifecycle of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DraftStatus {
    NotStarted,
    InProgress,
    Complete,
}

/// Result of a single `advance_one` call.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// A pick was finalized and recorded.
    Picked(Pick),
    /// A human team is on the clock and no selection was supplied.
    /// Nothing changed.
    AwaitingHuman { team_slot: usize },
}

/// The complete state of one draft.
#[derive(Debug, Clone)]
pub struct DraftState {
    config: DraftConfig,
    pool: PlayerPool,
    /// All teams, in first-round order.
    teams: Vec<TeamState>,
    /// All recorded picks in order.
    picks: Vec<Pick>,
    /// Next overall pick to be made (1-indexed).
    current_pick: usize,
    status: DraftStatus,
    seed: u64,
    rng: ChaCha8Rng,
}

/// Read-only view of a draft, for presentation layers and JSON export.
#[derive(Debug, Serialize)]
pub struct DraftSnapshot<'a> {
    pub status: DraftStatus,
    pub current_pick: usize,
    pub current_round: usize,
    pub total_picks: usize,
    pub seed: u64,
    pub on_the_clock: Option<&'a str>,
    pub config: &'a DraftConfig,
    pub teams: &'a [TeamState],
    pub picks: &'a [Pick],
    pub players_remaining: usize,
}

impl DraftState {
    /// Validate inputs and build a draft that has not started yet.
    ///
    /// `teams` are given in first-round order; `seed` fixes every random draw
    /// the bots will make.
    pub fn new(
        config: DraftConfig,
        players: Vec<Player>,
        teams: Vec<TeamSpec>,
        seed: u64,
    ) -> Result<Self, DraftError> {
        validate_start(&config, &players, &teams)?;

        let teams: Vec<TeamState> = teams
            .into_iter()
            .enumerate()
            .map(|(idx, spec)| TeamState {
                team_id: format!("team_{}", idx + 1),
                team_name: spec.name,
                slot: idx + 1,
                human: spec.human,
                roster: Roster::new(&config.roster),
            })
            .collect();

        Ok(DraftState {
            pool: PlayerPool::new(players),
            teams,
            picks: Vec::new(),
            current_pick: 1,
            status: DraftStatus::NotStarted,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            config,
        })
    }

    /// Put the first team on the clock.
    pub fn begin(&mut self) {
        if self.status != DraftStatus::NotStarted {
            warn!("begin() called on a draft that is already {:?}", self.status);
            return;
        }
        self.status = DraftStatus::InProgress;
        info!(
            "Draft started: {} teams, {} rounds, {} players, seed {}",
            self.config.num_teams,
            self.config.num_rounds,
            self.pool.len(),
            self.seed
        );
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Make the next pick.
    ///
    /// A human team on the clock needs `selection`; without one this returns
    /// `Advance::AwaitingHuman` and changes nothing. Bot teams must not be
    /// given a selection. Any error leaves the state exactly as it was.
    pub fn advance_one(&mut self, selection: Option<PlayerId>) -> Result<Advance, DraftError> {
        match self.status {
            DraftStatus::NotStarted => return Err(DraftError::NotStarted),
            DraftStatus::Complete => return Err(DraftError::DraftAlreadyComplete),
            DraftStatus::InProgress => {}
        }

        let team_idx = self.on_the_clock_index();
        let picks_remaining = self.picks_remaining_for(team_idx);
        let ctx = self.pick_context();
        let team = &self.teams[team_idx];

        let (player_id, selection, rng) = match (team.human, selection) {
            (true, None) => {
                debug!("Pick {}: waiting on {}", self.current_pick, team.team_name);
                return Ok(Advance::AwaitingHuman {
                    team_slot: team.slot,
                });
            }
            (true, Some(id)) => {
                let player = self.pool.get(id).ok_or_else(|| {
                    DraftError::InvalidSelection(format!("player {id} is not available"))
                })?;
                if !team.roster.can_roster(player, picks_remaining) {
                    return Err(DraftError::InvalidSelection(format!(
                        "{} has no usable roster slot for {}",
                        team.team_name,
                        player.label()
                    )));
                }
                if !self.spares(team_idx, player, &self.league_supply()) {
                    return Err(DraftError::InvalidSelection(format!(
                        "{} is one of the last {} needed to fill other teams' starting slots",
                        player.label(),
                        player.position
                    )));
                }
                (id, Selection::Human, None)
            }
            (false, Some(_)) => {
                return Err(DraftError::InvalidSelection(format!(
                    "{} is bot-controlled; it is not a human team's turn",
                    team.team_name
                )));
            }
            (false, None) => {
                // Draw on a copy so a failed decision leaves the stream untouched.
                let mut rng = self.rng.clone();
                let scorer = Scorer::new(&self.config.scoring, &self.config.noise);
                let league = self.league_supply();
                let decision = decide(
                    &team.team_name,
                    &team.roster,
                    &self.pool,
                    |p: &Player| {
                        team.roster.can_roster(p, picks_remaining)
                            && self.spares(team_idx, p, &league)
                    },
                    &ctx,
                    &scorer,
                    &mut rng,
                )?;
                (decision.player, Selection::Bot(decision.score), Some(rng))
            }
        };

        let pick = self.finalize(team_idx, player_id, selection, &ctx)?;
        if let Some(rng) = rng {
            self.rng = rng;
        }
        Ok(Advance::Picked(pick))
    }

    /// Keep making bot picks until a human team is on the clock, the draft
    /// completes, or `stop` returns true (checked before every pick).
    ///
    /// Returns the picks made by this call.
    pub fn advance_until<F>(&mut self, mut stop: F) -> Result<Vec<Pick>, DraftError>
    where
        F: FnMut(&DraftState) -> bool,
    {
        if self.status == DraftStatus::NotStarted {
            return Err(DraftError::NotStarted);
        }

        let mut made = Vec::new();
        while self.status == DraftStatus::InProgress && !self.is_human_turn() && !stop(self) {
            match self.advance_one(None)? {
                Advance::Picked(pick) => made.push(pick),
                Advance::AwaitingHuman { .. } => break,
            }
        }
        Ok(made)
    }

    /// Auto-draft until a human team's turn or the end of the draft.
    pub fn auto_draft(&mut self) -> Result<Vec<Pick>, DraftError> {
        self.advance_until(|_| false)
    }

    /// Move a validated player from the pool to the roster and record the pick.
    fn finalize(
        &mut self,
        team_idx: usize,
        player_id: PlayerId,
        selection: Selection,
        ctx: &PickContext,
    ) -> Result<Pick, DraftError> {
        let player = self
            .pool
            .get(player_id)
            .cloned()
            .ok_or(DraftError::NotFound(player_id))?;

        // Roster placement is the last step that can fail; the pool is only
        // touched once it has succeeded.
        let team = &mut self.teams[team_idx];
        let slot = team.roster.add(player.clone())?;
        self.pool.discard(player_id);

        let pick = Pick {
            overall: ctx.overall,
            round: ctx.round,
            pick_in_round: pick_in_round(ctx.overall, self.config.num_teams),
            team_id: team.team_id.clone(),
            team_name: team.team_name.clone(),
            team_slot: team.slot,
            player,
            slot,
            selection,
        };
        debug!(
            "Pick {} (R{}.{}): {} took {} into {}{}",
            pick.overall,
            pick.round,
            pick.pick_in_round,
            pick.team_name,
            pick.player.label(),
            pick.slot,
            pick.score()
                .map(|s| format!(" [score {s:.3}]"))
                .unwrap_or_default()
        );

        self.picks.push(pick.clone());
        self.current_pick += 1;
        if self.current_pick > self.config.total_picks() {
            self.status = DraftStatus::Complete;
            info!("Draft complete after {} picks", self.picks.len());
        }
        Ok(pick)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn status(&self) -> DraftStatus {
        self.status
    }

    pub fn is_complete(&self) -> bool {
        self.status == DraftStatus::Complete
    }

    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next overall pick number (1-indexed).
    pub fn current_pick(&self) -> usize {
        self.current_pick
    }

    /// Round of the next pick, capped at the last round once complete.
    pub fn current_round(&self) -> usize {
        round_for_pick(self.current_pick, self.config.num_teams).min(self.config.num_rounds)
    }

    pub fn total_picks(&self) -> usize {
        self.config.total_picks()
    }

    /// The team whose pick it is, if the draft is still running.
    pub fn on_the_clock(&self) -> Option<&TeamState> {
        if self.status == DraftStatus::Complete {
            return None;
        }
        Some(&self.teams[self.on_the_clock_index()])
    }

    /// Whether a human-controlled team is on the clock right now.
    pub fn is_human_turn(&self) -> bool {
        self.status == DraftStatus::InProgress
            && self.on_the_clock().is_some_and(|team| team.human)
    }

    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    /// The last `n` picks, oldest first.
    pub fn recent_picks(&self, n: usize) -> &[Pick] {
        let start = self.picks.len().saturating_sub(n);
        &self.picks[start..]
    }

    /// All teams, in first-round order.
    pub fn teams(&self) -> &[TeamState] {
        &self.teams
    }

    /// Look up a team by ID.
    pub fn team(&self, team_id: &str) -> Option<&TeamState> {
        self.teams.iter().find(|t| t.team_id == team_id)
    }

    /// Look up a team by first-round slot (1-indexed).
    pub fn team_at_slot(&self, slot: usize) -> Option<&TeamState> {
        slot.checked_sub(1).and_then(|idx| self.teams.get(idx))
    }

    pub fn pool(&self) -> &PlayerPool {
        &self.pool
    }

    /// Remaining players in ranking order.
    pub fn available(&self, filter: Option<Position>) -> Vec<&Player> {
        self.pool.available(filter)
    }

    /// Whether the team on the clock may take this player right now.
    ///
    /// Applies the same checks as a human selection: the player is still
    /// available, the team has a usable slot for them, and taking them leaves
    /// enough players for every other team's open starting slots.
    pub fn can_take(&self, id: PlayerId) -> bool {
        if self.status != DraftStatus::InProgress {
            return false;
        }
        let team_idx = self.on_the_clock_index();
        let Some(player) = self.pool.get(id) else {
            return false;
        };
        self.teams[team_idx]
            .roster
            .can_roster(player, self.picks_remaining_for(team_idx))
            && self.spares(team_idx, player, &self.league_supply())
    }

    /// Remaining roster needs for the team at `slot`.
    pub fn needs(&self, slot: usize) -> Option<BTreeMap<Position, usize>> {
        self.team_at_slot(slot).map(|team| team.roster.needs())
    }

    /// The draft board so far, one row per pick.
    pub fn board(&self) -> Vec<BoardRow> {
        self.picks.iter().map(BoardRow::from).collect()
    }

    pub fn snapshot(&self) -> DraftSnapshot<'_> {
        DraftSnapshot {
            status: self.status,
            current_pick: self.current_pick,
            current_round: self.current_round(),
            total_picks: self.total_picks(),
            seed: self.seed,
            on_the_clock: self.on_the_clock().map(|t| t.team_name.as_str()),
            config: &self.config,
            teams: &self.teams,
            picks: &self.picks,
            players_remaining: self.pool.len(),
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn on_the_clock_index(&self) -> usize {
        let pick = self.current_pick.min(self.config.total_picks());
        team_slot_for_pick(pick, self.config.num_teams) - 1
    }

    /// Picks the team still has to make, including the current one.
    fn picks_remaining_for(&self, team_idx: usize) -> usize {
        self.config
            .num_rounds
            .saturating_sub(self.teams[team_idx].roster.filled_count())
    }

    fn league_supply(&self) -> LeagueSupply {
        LeagueSupply::tally(
            &self.pool,
            self.config.roster.flex_positions(),
            self.teams.iter().map(|t| &t.roster),
        )
    }

    /// Whether the pool can spare `player` for this team without stranding
    /// another team's starting lineup.
    fn spares(&self, team_idx: usize, player: &Player, league: &LeagueSupply) -> bool {
        self.teams[team_idx]
            .roster
            .slot_for(player)
            .is_some_and(|slot| league.permits(player, slot))
    }

    fn pick_context(&self) -> PickContext {
        PickContext {
            overall: self.current_pick,
            round: round_for_pick(self.current_pick, self.config.num_teams),
            num_teams: self.config.num_teams,
            best_adp: self.pool.best_adp().unwrap_or(0.0),
        }
    }
}
