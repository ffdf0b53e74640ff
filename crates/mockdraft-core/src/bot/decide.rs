// Bot pick selection: score every legal candidate, take the best.

use std::cmp::Ordering;

use rand::Rng;
use tracing::trace;

use super::scoring::{PickContext, ScoreBreakdown, Scorer};
use crate::draft::player::{Player, PlayerId};
use crate::draft::pool::PlayerPool;
use crate::draft::roster::Roster;
use crate::draft::DraftError;

/// The player a bot settled on and the score that won it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub player: PlayerId,
    pub score: ScoreBreakdown,
}

/// Choose a player for a bot-controlled team.
///
/// Only players for which `legal` returns true are scored. Candidates are
/// scored in pool ranking order so the random stream is consumed the same
/// way on every run. Ties on total go to the lower ADP, then the lower id.
pub fn decide<R, F>(
    team: &str,
    roster: &Roster,
    pool: &PlayerPool,
    legal: F,
    ctx: &PickContext,
    scorer: &Scorer<'_>,
    rng: &mut R,
) -> Result<Decision, DraftError>
where
    R: Rng,
    F: Fn(&Player) -> bool,
{
    let mut best: Option<(&Player, ScoreBreakdown)> = None;

    for player in pool.available(None) {
        if !legal(player) {
            continue;
        }
        let score = scorer.score(player, roster, ctx, rng);
        trace!(
            "{} candidate {}: total={:.3} adp={:.3} need={:.2} noise={:.3}",
            team,
            player.name,
            score.total,
            score.adp,
            score.need,
            score.noise
        );
        let better = match &best {
            None => true,
            Some((incumbent, incumbent_score)) => {
                compare(player, &score, incumbent, incumbent_score) == Ordering::Greater
            }
        };
        if better {
            best = Some((player, score));
        }
    }

    best.map(|(player, score)| Decision {
        player: player.id,
        score,
    })
    .ok_or_else(|| DraftError::PoolExhausted {
        team: team.to_string(),
    })
}

/// Greater means `a` is preferred over `b`.
fn compare(a: &Player, a_score: &ScoreBreakdown, b: &Player, b_score: &ScoreBreakdown) -> Ordering {
    a_score
        .total
        .total_cmp(&b_score.total)
        .then_with(|| b.adp.total_cmp(&a.adp))
        .then_with(|| b.id.cmp(&a.id))
}
