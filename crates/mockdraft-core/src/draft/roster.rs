// Roster construction and slot assignment.

use std::collections::BTreeMap;

use serde::Serialize;

use super::player::{Player, PlayerId, Position};
use super::settings::RosterRules;
use super::DraftError;

/// A single slot on a team's roster.
#[derive(Debug, Clone, Serialize)]
pub struct RosterSlot {
    /// The position designation of this slot.
    pub position: Position,
    /// The player occupying this slot, if any.
    pub player: Option<Player>,
}

/// A team's complete roster of slots.
#[derive(Debug, Clone, Serialize)]
pub struct Roster {
    slots: Vec<RosterSlot>,
    flex_positions: Vec<Position>,
    /// Ids in the order they were drafted.
    draft_order: Vec<PlayerId>,
}

impl Roster {
    /// Create an empty roster with one slot per configured requirement.
    ///
    /// Slots are created in deterministic order based on `Position::sort_order()`.
    pub fn new(rules: &RosterRules) -> Self {
        let mut slots: Vec<RosterSlot> = Vec::new();
        for (&position, &count) in rules.slots() {
            for _ in 0..count {
                slots.push(RosterSlot {
                    position,
                    player: None,
                });
            }
        }
        slots.sort_by_key(|s| s.position.sort_order());

        Roster {
            slots,
            flex_positions: rules.flex_positions().to_vec(),
            draft_order: Vec::new(),
        }
    }

    pub fn slots(&self) -> &[RosterSlot] {
        &self.slots
    }

    /// Whether there is an empty slot for the given position.
    pub fn has_empty_slot(&self, pos: Position) -> bool {
        self.slots
            .iter()
            .any(|s| s.position == pos && s.player.is_none())
    }

    /// Number of slots of the given kind.
    pub fn required(&self, pos: Position) -> usize {
        self.slots.iter().filter(|s| s.position == pos).count()
    }

    /// Number of open slots of the given kind.
    pub fn open_at(&self, pos: Position) -> usize {
        self.slots
            .iter()
            .filter(|s| s.position == pos && s.player.is_none())
            .count()
    }

    /// Whether players at `pos` may fill a FLEX slot on this roster.
    pub fn is_flex_eligible(&self, pos: Position) -> bool {
        self.flex_positions.contains(&pos)
    }

    /// The slot a player would land in if drafted now.
    ///
    /// Slot assignment priority:
    /// 1. Dedicated position slot
    /// 2. FLEX slot (flex-eligible positions only)
    /// 3. Bench (BE) slot
    pub fn slot_for(&self, player: &Player) -> Option<Position> {
        let pos = player.position;
        if pos.is_meta_slot() {
            return None;
        }
        if self.has_empty_slot(pos) {
            return Some(pos);
        }
        if self.is_flex_eligible(pos) && self.has_empty_slot(Position::Flex) {
            return Some(Position::Flex);
        }
        if self.has_empty_slot(Position::Bench) {
            return Some(Position::Bench);
        }
        None
    }

    /// Whether the team can take `player` with `picks_remaining` picks left
    /// (counting the current one).
    ///
    /// A bench placement is refused when it would leave more open starter
    /// slots than picks to fill them.
    pub fn can_roster(&self, player: &Player, picks_remaining: usize) -> bool {
        match self.slot_for(player) {
            None => false,
            Some(Position::Bench) => self.open_starter_slots() < picks_remaining,
            Some(_) => true,
        }
    }

    /// Place a player in the first compatible open slot.
    ///
    /// Returns the slot kind used.
    pub fn add(&mut self, player: Player) -> Result<Position, DraftError> {
        let target = self
            .slot_for(&player)
            .ok_or_else(|| DraftError::SlotUnavailable {
                player: player.name.clone(),
                position: player.position,
            })?;
        let Some(slot) = self
            .slots
            .iter_mut()
            .find(|s| s.position == target && s.player.is_none())
        else {
            return Err(DraftError::SlotUnavailable {
                player: player.name.clone(),
                position: player.position,
            });
        };
        self.draft_order.push(player.id);
        slot.player = Some(player);
        Ok(target)
    }

    /// Remaining required count per slot kind (bench excluded).
    ///
    /// The FLEX entry only shrinks once a flex-eligible player overflows its
    /// dedicated slots, because placement always prefers dedicated slots.
    pub fn needs(&self) -> BTreeMap<Position, usize> {
        let mut needs = BTreeMap::new();
        for slot in &self.slots {
            if slot.position == Position::Bench {
                continue;
            }
            let entry = needs.entry(slot.position).or_insert(0);
            if slot.player.is_none() {
                *entry += 1;
            }
        }
        needs
    }

    /// Count of open non-bench slots.
    pub fn open_starter_slots(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.position != Position::Bench && s.player.is_none())
            .count()
    }

    /// Whether a player is already on this roster.
    pub fn has_player(&self, id: PlayerId) -> bool {
        self.draft_order.contains(&id)
    }

    /// Drafted players in the order this team picked them.
    pub fn drafted(&self) -> Vec<&Player> {
        self.draft_order
            .iter()
            .filter_map(|id| {
                self.slots
                    .iter()
                    .filter_map(|s| s.player.as_ref())
                    .find(|p| p.id == *id)
            })
            .collect()
    }

    /// Drafted players grouped by slot kind, each list in draft order.
    pub fn by_slot(&self) -> BTreeMap<Position, Vec<&Player>> {
        let mut grouped: BTreeMap<Position, Vec<&Player>> = BTreeMap::new();
        for slot in &self.slots {
            if let Some(player) = &slot.player {
                grouped.entry(slot.position).or_default().push(player);
            }
        }
        grouped
    }

    /// Number of filled (non-empty) slots.
    pub fn filled_count(&self) -> usize {
        self.draft_order.len()
    }

    /// Total number of slots.
    pub fn total_count(&self) -> usize {
        self.slots.len()
    }

    /// Count of empty slots, bench included.
    pub fn empty_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.player.is_none()).count()
    }
}
