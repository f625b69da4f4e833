//! Error types for dealing, selection and loading.

use thiserror::Error;

use super::entity::CardId;
use crate::persistence::PersistenceError;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("configuration invalid: {0}")]
    InvalidConfig(String),
    #[error("no such card in the current round: {0}")]
    UnknownCard(CardId),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type Result<T> = std::result::Result<T, GameError>;
