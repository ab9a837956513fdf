use thiserror::Error;

use crate::net::{PlaceId, TransitionId};

/// Errors raised by the base net model.
#[derive(Debug, Error, PartialEq)]
pub enum NetError {
    #[error("unknown place id {0}")]
    UnknownPlace(PlaceId),

    #[error("unknown transition id {0}")]
    UnknownTransition(TransitionId),

    #[error("place '{place}' holds {have} tokens, cannot remove {want}")]
    InsufficientTokens {
        place: String,
        have: u32,
        want: u32,
    },

    #[error("place '{0}' token count overflow")]
    TokenOverflow(String),

    #[error("duplicate place name '{0}'")]
    DuplicatePlace(String),

    #[error("duplicate transition name '{0}'")]
    DuplicateTransition(String),

    #[error("arc weight must be at least 1")]
    ZeroWeight,
}
