//! # taktnet-core
//!
//! Base place/transition net model for the taktnet workspace.
//! Holds the marking, weighted arcs, and the structural-enablement check;
//! timing semantics live in `taktnet-time`, which wraps this layer through
//! the [`TokenNet`] trait.
//!
//! ### Key Submodules:
//! - `net`: places, transitions, `PetriNet`, `NetBuilder`, `TokenNet` seam
//! - `error`: unified `NetError`

pub mod error;
pub mod net;

pub use error::NetError;
pub use net::{NetBuilder, PetriNet, Place, PlaceId, TokenNet, Transition, TransitionId, Weight};
