// Draft engine: player pool, rosters, snake order, and the pick state machine.

pub mod order;
pub mod pick;
pub mod player;
pub mod pool;
pub mod roster;
pub mod settings;
pub mod state;
pub mod supply;

use thiserror::Error;

use self::player::{Player, PlayerId, Position};
use self::settings::{DraftConfig, TeamSpec};
use self::state::DraftState;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    /// Player records or draft configuration failed validation at start.
    #[error("invalid draft input for `{field}`: {message}")]
    InvalidDataset { field: String, message: String },

    #[error("player {0} is not in the pool")]
    NotFound(PlayerId),

    #[error("no open roster slot for {player} ({position})")]
    SlotUnavailable { player: String, position: Position },

    #[error("no legal candidate left for {team}")]
    PoolExhausted { team: String },

    /// A human selection was rejected; the draft state is unchanged.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("the draft is already complete")]
    DraftAlreadyComplete,

    #[error("the draft has not been started")]
    NotStarted,
}

impl DraftError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        DraftError::InvalidDataset {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate the inputs, build the draft state, and put it on the clock.
///
/// Equivalent to `DraftState::new` followed by `DraftState::begin`.
pub fn start(
    config: DraftConfig,
    players: Vec<Player>,
    teams: Vec<TeamSpec>,
    seed: u64,
) -> Result<DraftState, DraftError> {
    let mut state = DraftState::new(config, players, teams, seed)?;
    state.begin();
    Ok(state)
}
