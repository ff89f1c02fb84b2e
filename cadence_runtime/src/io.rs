//! [`IoCtx`] is the handle a reaction body receives to read its input ports,
//! write its output ports, and schedule its actions.
//!
//! Ports and actions live in `Env`'s top-level arenas, addressed by key. A
//! reaction's input and output port sets can overlap in the same underlying
//! `SlotMap` (different keys, same arena), so `IoCtx` never holds more than
//! one live borrow of an arena at a time — every accessor indexes, acts, and
//! releases the borrow before returning. That sidesteps the aliasing problem
//! a slice of `&mut dyn BasePort` would run into without `unsafe`.

use slotmap::SlotMap;

use cadence_core::{ActionKey, PortKey};

use crate::{Action, ActionRef, BaseAction, BasePort, Context, Port, ReactorData};

pub struct IoCtx<'a> {
    ports: &'a mut SlotMap<PortKey, Box<dyn BasePort>>,
    actions: &'a mut SlotMap<ActionKey, Box<dyn BaseAction>>,
    input_keys: &'a [PortKey],
    output_keys: &'a [PortKey],
    action_keys: &'a [ActionKey],
}

impl<'a> IoCtx<'a> {
    pub fn new(
        ports: &'a mut SlotMap<PortKey, Box<dyn BasePort>>,
        actions: &'a mut SlotMap<ActionKey, Box<dyn BaseAction>>,
        input_keys: &'a [PortKey],
        output_keys: &'a [PortKey],
        action_keys: &'a [ActionKey],
    ) -> Self {
        Self {
            ports,
            actions,
            input_keys,
            output_keys,
            action_keys,
        }
    }

    pub fn num_inputs(&self) -> usize {
        self.input_keys.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.output_keys.len()
    }

    /// Read the current value of the `idx`-th declared input port.
    pub fn input<T: ReactorData>(&self, idx: usize) -> Option<&T> {
        self.ports[self.input_keys[idx]]
            .downcast_ref::<Port<T>>()
            .expect("type mismatch reading reaction input")
            .get()
            .as_ref()
    }

    pub fn input_is_set(&self, idx: usize) -> bool {
        self.ports[self.input_keys[idx]].is_set()
    }

    /// Set the `idx`-th declared output port's value for the current tag.
    pub fn set_output<T: ReactorData>(&mut self, idx: usize, value: T) {
        self.ports[self.output_keys[idx]]
            .downcast_mut::<Port<T>>()
            .expect("type mismatch setting reaction output")
            .set(value);
    }

    pub fn output_is_set(&self, idx: usize) -> bool {
        self.ports[self.output_keys[idx]].is_set()
    }

    pub fn output_key(&self, idx: usize) -> PortKey {
        self.output_keys[idx]
    }

    /// Borrow the `idx`-th declared action for reading/scheduling.
    pub fn action<T: ReactorData>(&mut self, idx: usize) -> ActionRef<'_, T> {
        ActionRef::from(
            self.actions[self.action_keys[idx]]
                .downcast_mut::<Action<T>>()
                .expect("type mismatch borrowing reaction action")
                as &mut dyn BaseAction,
        )
    }

    pub fn action_present<T: ReactorData>(&mut self, ctx: &Context, idx: usize) -> bool {
        self.action::<T>(idx).is_present(ctx)
    }
}
