//! Place/transition net with weighted arcs and black tokens.
//!
//! Ids are dense indices handed out by [`NetBuilder`]; every lookup is a
//! plain vector access. A transition is structurally enabled ("has a mode")
//! when each of its input places holds at least the arc weight.

use crate::error::NetError;

pub type PlaceId = usize;
pub type TransitionId = usize;
pub type Weight = u32;

/// A place: token store plus the set of transitions it feeds.
#[derive(Debug, Clone)]
pub struct Place {
    pub name: String,
    /// Transitions for which this place is an input (the postset).
    pub postset: Vec<TransitionId>,
}

/// A transition with weighted input and output arcs.
#[derive(Debug, Clone)]
pub struct Transition {
    pub name: String,
    pub inputs: Vec<(PlaceId, Weight)>,
    pub outputs: Vec<(PlaceId, Weight)>,
}

/// The seam a timing (or other) overlay wraps.
///
/// Structural enablement, topology, and token mutation are exposed here so
/// an overlay can observe every token move without reaching into the
/// concrete net. `Mode` is one binding of a transition firing; the uncolored
/// [`PetriNet`] uses `()`, a colored net would carry its substitution here.
pub trait TokenNet {
    type Mode: Clone;

    fn place_count(&self) -> usize;
    fn transition_count(&self) -> usize;
    fn place_name(&self, place: PlaceId) -> &str;
    fn transition_name(&self, transition: TransitionId) -> &str;
    fn postset(&self, place: PlaceId) -> &[TransitionId];
    fn input_arcs(&self, transition: TransitionId) -> &[(PlaceId, Weight)];
    fn output_arcs(&self, transition: TransitionId) -> &[(PlaceId, Weight)];

    /// True when the transition has at least one structurally valid firing
    /// mode under the current marking, ignoring any timing overlay.
    fn has_mode(&self, transition: TransitionId) -> bool;

    /// Structural check for one specific binding.
    fn mode_enabled(&self, transition: TransitionId, mode: &Self::Mode) -> bool;

    fn tokens(&self, place: PlaceId) -> u32;
    fn add_tokens(&mut self, place: PlaceId, count: u32) -> Result<(), NetError>;
    fn remove_tokens(&mut self, place: PlaceId, count: u32) -> Result<(), NetError>;
    fn set_tokens(&mut self, place: PlaceId, count: u32) -> Result<(), NetError>;
}

/// Uncolored reference net: one `u32` token count per place.
#[derive(Debug, Clone)]
pub struct PetriNet {
    places: Vec<Place>,
    transitions: Vec<Transition>,
    marking: Vec<u32>,
}

impl PetriNet {
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Current token count of every place, in place-id order.
    pub fn marking(&self) -> &[u32] {
        &self.marking
    }
}

impl TokenNet for PetriNet {
    type Mode = ();

    fn place_count(&self) -> usize {
        self.places.len()
    }

    fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    fn place_name(&self, place: PlaceId) -> &str {
        &self.places[place].name
    }

    fn transition_name(&self, transition: TransitionId) -> &str {
        &self.transitions[transition].name
    }

    fn postset(&self, place: PlaceId) -> &[TransitionId] {
        &self.places[place].postset
    }

    fn input_arcs(&self, transition: TransitionId) -> &[(PlaceId, Weight)] {
        &self.transitions[transition].inputs
    }

    fn output_arcs(&self, transition: TransitionId) -> &[(PlaceId, Weight)] {
        &self.transitions[transition].outputs
    }

    fn has_mode(&self, transition: TransitionId) -> bool {
        self.transitions[transition]
            .inputs
            .iter()
            .all(|&(place, weight)| self.marking[place] >= weight)
    }

    fn mode_enabled(&self, transition: TransitionId, _mode: &Self::Mode) -> bool {
        // Black tokens: the only binding is the trivial one.
        self.has_mode(transition)
    }

    fn tokens(&self, place: PlaceId) -> u32 {
        self.marking[place]
    }

    fn add_tokens(&mut self, place: PlaceId, count: u32) -> Result<(), NetError> {
        let have = *self.marking.get(place).ok_or(NetError::UnknownPlace(place))?;
        self.marking[place] = have
            .checked_add(count)
            .ok_or_else(|| NetError::TokenOverflow(self.places[place].name.clone()))?;
        Ok(())
    }

    fn remove_tokens(&mut self, place: PlaceId, count: u32) -> Result<(), NetError> {
        let have = *self.marking.get(place).ok_or(NetError::UnknownPlace(place))?;
        if have < count {
            return Err(NetError::InsufficientTokens {
                place: self.places[place].name.clone(),
                have,
                want: count,
            });
        }
        self.marking[place] = have - count;
        Ok(())
    }

    fn set_tokens(&mut self, place: PlaceId, count: u32) -> Result<(), NetError> {
        let slot = self
            .marking
            .get_mut(place)
            .ok_or(NetError::UnknownPlace(place))?;
        *slot = count;
        Ok(())
    }
}

/// Incremental net construction; names must be unique per kind.
#[derive(Debug, Default)]
pub struct NetBuilder {
    places: Vec<Place>,
    transitions: Vec<Transition>,
    marking: Vec<u32>,
}

impl NetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&mut self, name: &str, tokens: u32) -> Result<PlaceId, NetError> {
        if self.places.iter().any(|p| p.name == name) {
            return Err(NetError::DuplicatePlace(name.to_string()));
        }
        self.places.push(Place {
            name: name.to_string(),
            postset: Vec::new(),
        });
        self.marking.push(tokens);
        Ok(self.places.len() - 1)
    }

    pub fn transition(&mut self, name: &str) -> Result<TransitionId, NetError> {
        if self.transitions.iter().any(|t| t.name == name) {
            return Err(NetError::DuplicateTransition(name.to_string()));
        }
        self.transitions.push(Transition {
            name: name.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        });
        Ok(self.transitions.len() - 1)
    }

    /// Arc from a place into a transition.
    pub fn input_arc(
        &mut self,
        place: PlaceId,
        transition: TransitionId,
        weight: Weight,
    ) -> Result<(), NetError> {
        self.check(place, transition, weight)?;
        push_arc(&mut self.transitions[transition].inputs, place, weight);
        let postset = &mut self.places[place].postset;
        if !postset.contains(&transition) {
            postset.push(transition);
        }
        Ok(())
    }

    /// Arc from a transition into a place.
    pub fn output_arc(
        &mut self,
        transition: TransitionId,
        place: PlaceId,
        weight: Weight,
    ) -> Result<(), NetError> {
        self.check(place, transition, weight)?;
        push_arc(&mut self.transitions[transition].outputs, place, weight);
        Ok(())
    }

    pub fn build(self) -> PetriNet {
        PetriNet {
            places: self.places,
            transitions: self.transitions,
            marking: self.marking,
        }
    }

    fn check(
        &self,
        place: PlaceId,
        transition: TransitionId,
        weight: Weight,
    ) -> Result<(), NetError> {
        if place >= self.places.len() {
            return Err(NetError::UnknownPlace(place));
        }
        if transition >= self.transitions.len() {
            return Err(NetError::UnknownTransition(transition));
        }
        if weight == 0 {
            return Err(NetError::ZeroWeight);
        }
        Ok(())
    }
}

/// Repeated arcs between the same pair accumulate their weights.
fn push_arc(arcs: &mut Vec<(PlaceId, Weight)>, place: PlaceId, weight: Weight) {
    if let Some(arc) = arcs.iter_mut().find(|(p, _)| *p == place) {
        arc.1 += weight;
    } else {
        arcs.push((place, weight));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_place_net() -> (PetriNet, PlaceId, PlaceId, TransitionId) {
        let mut builder = NetBuilder::new();
        let p = builder.place("p", 2).unwrap();
        let q = builder.place("q", 0).unwrap();
        let t = builder.transition("t").unwrap();
        builder.input_arc(p, t, 2).unwrap();
        builder.output_arc(t, q, 1).unwrap();
        (builder.build(), p, q, t)
    }

    #[test]
    fn test_mode_requires_arc_weight() {
        let (mut net, p, _q, t) = two_place_net();
        assert!(net.has_mode(t));
        net.remove_tokens(p, 1).unwrap();
        assert!(!net.has_mode(t));
        net.add_tokens(p, 1).unwrap();
        assert!(net.has_mode(t));
    }

    #[test]
    fn test_source_transition_always_has_mode() {
        let mut builder = NetBuilder::new();
        let q = builder.place("q", 0).unwrap();
        let t = builder.transition("source").unwrap();
        builder.output_arc(t, q, 1).unwrap();
        let net = builder.build();
        assert!(net.has_mode(t));
    }

    #[test]
    fn test_remove_more_than_present_fails() {
        let (mut net, p, _q, _t) = two_place_net();
        let err = net.remove_tokens(p, 3).unwrap_err();
        assert_eq!(
            err,
            NetError::InsufficientTokens {
                place: "p".to_string(),
                have: 2,
                want: 3,
            }
        );
        // Failed removal leaves the marking untouched.
        assert_eq!(net.tokens(p), 2);
    }

    #[test]
    fn test_add_tokens_overflow_detected() {
        let (mut net, p, _q, _t) = two_place_net();
        net.set_tokens(p, u32::MAX).unwrap();
        assert_eq!(
            net.add_tokens(p, 1).unwrap_err(),
            NetError::TokenOverflow("p".to_string())
        );
        assert_eq!(net.tokens(p), u32::MAX);
    }

    #[test]
    fn test_postset_tracks_input_arcs() {
        let (net, p, q, t) = two_place_net();
        assert_eq!(net.postset(p), &[t]);
        assert!(net.postset(q).is_empty());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut builder = NetBuilder::new();
        builder.place("p", 0).unwrap();
        assert_eq!(
            builder.place("p", 1).unwrap_err(),
            NetError::DuplicatePlace("p".to_string())
        );
        builder.transition("t").unwrap();
        assert_eq!(
            builder.transition("t").unwrap_err(),
            NetError::DuplicateTransition("t".to_string())
        );
    }

    #[test]
    fn test_repeated_arcs_accumulate_weight() {
        let mut builder = NetBuilder::new();
        let p = builder.place("p", 1).unwrap();
        let t = builder.transition("t").unwrap();
        builder.input_arc(p, t, 1).unwrap();
        builder.input_arc(p, t, 1).unwrap();
        let net = builder.build();
        assert_eq!(net.input_arcs(t), &[(p, 2)]);
        assert!(!net.has_mode(t));
    }

    #[test]
    fn test_zero_weight_arc_rejected() {
        let mut builder = NetBuilder::new();
        let p = builder.place("p", 0).unwrap();
        let t = builder.transition("t").unwrap();
        assert_eq!(builder.input_arc(p, t, 0).unwrap_err(), NetError::ZeroWeight);
    }
}
