//! Runtime keys for the various types of reactor components.
//!
//! Each key is a generational arena index (see the `slotmap` crate): an
//! instance freed and a later instance created at the same slot never compare
//! equal, which rules out the stale-index class of bug that raw integer IDs
//! are prone to.

slotmap::new_key_type! {
    /// Runtime key for a reactor instance.
    pub struct ReactorKey;
}

slotmap::new_key_type! {
    /// Runtime key for a reaction.
    pub struct ReactionKey;
}

slotmap::new_key_type! {
    /// Runtime key for a port.
    pub struct PortKey;
}

slotmap::new_key_type! {
    /// Runtime key for an action.
    pub struct ActionKey;
}
