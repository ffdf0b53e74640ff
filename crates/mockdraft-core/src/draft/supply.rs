// League-wide starter demand measured against what is left in the pool.

use std::collections::BTreeMap;

use super::player::{Player, Position};
use super::pool::PlayerPool;
use super::roster::Roster;

/// Open starter slots summed over every team, next to the remaining supply
/// at each position.
///
/// Two conditions hold from the start of a draft to its end:
/// - every position has at least as many players left as open dedicated
///   slots league-wide;
/// - the flex-eligible players beyond those dedicated slots cover every
///   open FLEX slot.
///
/// A pick into its own dedicated slot keeps both. A FLEX or bench pick is
/// only allowed when it keeps both, which is what `permits` checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeagueSupply {
    supply: BTreeMap<Position, usize>,
    open: BTreeMap<Position, usize>,
    open_flex: usize,
    flex_positions: Vec<Position>,
}

impl LeagueSupply {
    /// Count remaining players in `pool` and open starter slots across `rosters`.
    pub fn tally<'a>(
        pool: &PlayerPool,
        flex_positions: &[Position],
        rosters: impl IntoIterator<Item = &'a Roster>,
    ) -> Self {
        let mut supply = BTreeMap::new();
        for player in pool.available(None) {
            *supply.entry(player.position).or_insert(0) += 1;
        }

        let mut open = BTreeMap::new();
        let mut open_flex = 0;
        for roster in rosters {
            for (pos, n) in roster.needs() {
                if pos == Position::Flex {
                    open_flex += n;
                } else {
                    *open.entry(pos).or_insert(0) += n;
                }
            }
        }

        LeagueSupply {
            supply,
            open,
            open_flex,
            flex_positions: flex_positions.to_vec(),
        }
    }

    /// Players left at a position.
    pub fn supply(&self, pos: Position) -> usize {
        self.supply.get(&pos).copied().unwrap_or(0)
    }

    /// Open dedicated slots for a position, league-wide.
    pub fn open_at(&self, pos: Position) -> usize {
        self.open.get(&pos).copied().unwrap_or(0)
    }

    pub fn open_flex(&self) -> usize {
        self.open_flex
    }

    /// Flex-eligible players left over once every dedicated slot is filled.
    pub fn flex_surplus(&self) -> usize {
        self.flex_positions
            .iter()
            .map(|&pos| self.supply(pos).saturating_sub(self.open_at(pos)))
            .sum()
    }

    /// Whether `player` may go into `slot` without leaving some team's
    /// starting lineup impossible to complete.
    pub fn permits(&self, player: &Player, slot: Position) -> bool {
        let pos = player.position;
        if slot == pos {
            return true;
        }
        if self.supply(pos) <= self.open_at(pos) {
            return false;
        }
        match slot {
            Position::Bench if self.flex_positions.contains(&pos) => {
                self.flex_surplus() > self.open_flex
            }
            _ => true,
        }
    }
}
