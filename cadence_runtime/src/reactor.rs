//! A [`Reactor`] is the private mutable state of one reactor instance. Ports
//! and actions are addressed independently through `Env`'s top-level maps —
//! a reactor only owns the state a reaction body downcasts to.

use downcast_rs::{impl_downcast, DowncastSync};

use cadence_core::ReactorKey;

/// Marker trait for a reactor's private mutable state. `DowncastSync` lets the
/// scheduler hold a type-erased `Box<dyn ReactorState>` per instance and
/// downcast to the concrete type inside a reaction body.
pub trait ReactorState: DowncastSync + Send {}
impl_downcast!(sync ReactorState);

impl ReactorState for () {}

/// State for a reactor with no mutable fields of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyState;
impl ReactorState for EmptyState {}

pub struct Reactor {
    name: String,
    key: ReactorKey,
    state: Box<dyn ReactorState>,
}

impl std::fmt::Debug for Reactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reactor")
            .field("name", &self.name)
            .field("key", &self.key)
            .finish()
    }
}

impl Reactor {
    pub fn new(name: &str, key: ReactorKey, state: Box<dyn ReactorState>) -> Self {
        Self {
            name: name.to_owned(),
            key,
            state,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> ReactorKey {
        self.key
    }

    pub fn state(&self) -> &dyn ReactorState {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> &mut dyn ReactorState {
        self.state.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Counter(u32);
    impl ReactorState for Counter {}

    #[test]
    fn state_downcasts_to_concrete_type() {
        let mut reactors: slotmap::SlotMap<ReactorKey, ()> = slotmap::SlotMap::with_key();
        let key = reactors.insert(());
        let mut reactor = Reactor::new("r0", key, Box::new(Counter(0)));
        reactor
            .state_mut()
            .downcast_mut::<Counter>()
            .unwrap()
            .0 += 1;
        assert_eq!(reactor.state().downcast_ref::<Counter>().unwrap().0, 1);
    }
}
