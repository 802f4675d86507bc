use thiserror::Error;

use crate::action::ActionKind;
use crate::role::Role;
use crate::MAX_PLAYERS;

/// Every way an action or roster change can be refused.
///
/// None of these are fatal to a match: a refused action leaves the game
/// untouched and the same player keeps the turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoupError {
    #[error("{0} is no longer in the game")]
    InactivePlayer(String),

    #[error("it is not {0}'s turn")]
    InvalidTurn(String),

    #[error("{0} is on coup trial and cannot act")]
    OnCoupTrial(String),

    #[error("{name} holds {coins} coins and must coup")]
    MustCoup { name: String, coins: u32 },

    #[error("{name} needs {required} coins but has {available}")]
    InsufficientFunds {
        name: String,
        required: u32,
        available: u32,
    },

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("{name} is a {role} and cannot use {ability}")]
    RoleMismatch {
        name: String,
        role: Role,
        ability: ActionKind,
    },

    #[error("{0}")]
    ActionBlocked(String),

    #[error("maximum {} players allowed", MAX_PLAYERS)]
    RosterFull,

    #[error("no players in the game")]
    NoPlayers,

    #[error("game is still ongoing")]
    NoWinnerYet,

    #[error("no player in seat {0}")]
    UnknownPlayer(usize),

    #[error("invalid role: {0}")]
    UnknownRole(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("{0} requires a target")]
    MissingTarget(ActionKind),
}
