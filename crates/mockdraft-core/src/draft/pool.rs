// Available-player pool, ranked by ADP.

use serde::Serialize;

use super::player::{Player, PlayerId, Position};
use super::DraftError;

/// All players not yet drafted.
///
/// Players are kept in ranking order (ascending ADP, ties broken by id), so
/// every query returns the same sequence until the next removal.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerPool {
    players: Vec<Player>,
}

impl PlayerPool {
    /// Build a pool from validated player records.
    pub fn new(mut players: Vec<Player>) -> Self {
        players.sort_by(|a, b| a.adp.total_cmp(&b.adp).then(a.id.cmp(&b.id)));
        PlayerPool { players }
    }

    /// Remaining players in ranking order, optionally restricted to one position.
    pub fn available(&self, filter: Option<Position>) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| filter.map_or(true, |pos| p.position == pos))
            .collect()
    }

    /// Remove a player, handing ownership to the caller.
    ///
    /// Removal is permanent: a removed id is `NotFound` from then on.
    pub fn remove(&mut self, id: PlayerId) -> Result<Player, DraftError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(DraftError::NotFound(id))?;
        Ok(self.players.remove(idx))
    }

    /// Drop a player if present. Used once the pick is already placed.
    pub(crate) fn discard(&mut self, id: PlayerId) {
        self.players.retain(|p| p.id != id);
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.get(id).is_some()
    }

    /// Find a remaining player by exact name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Player> {
        let name = name.trim();
        self.players
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// ADP of the top-ranked remaining player.
    pub fn best_adp(&self) -> Option<f64> {
        self.players.first().map(|p| p.adp)
    }

    /// Number of remaining players at a position.
    pub fn count_at(&self, position: Position) -> usize {
        self.players.iter().filter(|p| p.position == position).count()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
