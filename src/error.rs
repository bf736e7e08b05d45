use crate::turn_phase::TurnPhase;
use thiserror::Error;

/// Rejected game action. Always caught at the phase-controller boundary
/// (strategy drivers, HTTP worker) and surfaced as a refused move; never
/// allowed to unwind the turn loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameActionError {
    #[error("it's not the {0:?} phase")]
    WrongPhase(TurnPhase),
    #[error("it's not player {0}'s turn")]
    NotYourTurn(usize),
    #[error("invalid player ID {0}")]
    UnknownPlayer(usize),
    #[error("unknown territory '{0}'")]
    UnknownTerritory(String),
    #[error("territory '{0}' does not belong to player {1}")]
    NotOwned(String, usize),
    #[error("'{to}' is not adjacent to '{from}'")]
    NotAdjacent { from: String, to: String },
    #[error("'{from}' and '{to}' are not connected through owned territories")]
    NotConnected { from: String, to: String },
    #[error("territory '{0}' needs more than one army to act")]
    InsufficientArmies(String),
    #[error("a player cannot attack their own territory '{0}'")]
    SelfAttack(String),
    #[error("no legal attack available")]
    NoValidAttack,
    #[error("not enough reinforcement armies available")]
    NotEnoughReinforcements,
    #[error("invalid card trade: {0}")]
    InvalidTrade(String),
}

/// Map or scenario defect found while building the game. Fatal before play
/// begins; nothing in the core produces it after setup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapValidationError {
    #[error("adjacency is not symmetric: '{a}' lists '{b}' but not the reverse")]
    AsymmetricAdjacency { a: String, b: String },
    #[error("territory '{territory}' lists unknown adjacent territory '{adjacent}'")]
    DanglingAdjacency { territory: String, adjacent: String },
    #[error("territory '{0}' has no adjacent territories")]
    EmptyAdjacency(String),
    #[error("territory '{territory}' references unknown continent '{continent}'")]
    UnknownContinent { territory: String, continent: String },
    #[error("territory '{0}' belongs to no continent")]
    NoContinent(String),
    #[error("territory '{0}' belongs to more than one continent")]
    MultipleContinents(String),
    #[error("territory '{0}' is assigned to more than one player")]
    DuplicateAssignment(String),
    #[error("territory '{0}' is not assigned to any player")]
    UnassignedTerritory(String),
    #[error("{requested} players cannot share a {territories}-territory map")]
    InvalidPlayerCount { requested: usize, territories: usize },
}
