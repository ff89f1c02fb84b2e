//! [`Env`] holds the flattened runtime state for every reactor instance in the
//! program; [`ReactionGraph`] holds the static dependency structure the
//! builder resolved ahead of time. Both are addressed by the small, stable
//! keys from `cadence_core`.

use slotmap::{SecondaryMap, SlotMap};

use cadence_core::{ActionKey, PortKey, ReactionKey, ReactorKey, Tag};

use crate::reaction_queue::LevelReactionKey;
use crate::{BaseAction, BasePort, Reaction, Reactor};

/// `Env` stores the resolved runtime state of all the reactors. The reactor
/// hierarchy has been flattened by the graph-assembly API below.
#[derive(Default)]
pub struct Env {
    pub reactors: SlotMap<ReactorKey, Reactor>,
    pub actions: SlotMap<ActionKey, Box<dyn BaseAction>>,
    pub ports: SlotMap<PortKey, Box<dyn BasePort>>,
    pub reactions: SlotMap<ReactionKey, Reaction>,
}

impl Env {
    pub fn find_reactor_by_name(&self, name: &str) -> Option<&Reactor> {
        self.reactors.values().find(|reactor| reactor.name() == name)
    }
}

/// Invariant data for the runtime, describing the resolved reaction graph and
/// its dependencies. Populated once by the graph-assembly API and read-only
/// from then on.
#[derive(Default)]
pub struct ReactionGraph {
    /// For each action, the reactions it triggers.
    pub action_triggers: SecondaryMap<ActionKey, Vec<LevelReactionKey>>,
    /// For each port, the reactions it triggers.
    pub port_triggers: SecondaryMap<PortKey, Vec<LevelReactionKey>>,
    /// Actions triggered once at program startup, paired with the tag they fire at.
    pub startup_actions: Vec<(ActionKey, Tag)>,
    /// Actions triggered once at program shutdown.
    pub shutdown_actions: Vec<ActionKey>,
    /// For each reaction, its declared input ports in declaration order.
    pub reaction_use_ports: SecondaryMap<ReactionKey, Vec<PortKey>>,
    /// For each reaction, its declared output ports in declaration order.
    pub reaction_effect_ports: SecondaryMap<ReactionKey, Vec<PortKey>>,
    /// For each reaction, its declared actions (read and/or scheduled).
    pub reaction_actions: SecondaryMap<ReactionKey, Vec<ActionKey>>,
    /// For each reaction, the reactor instance it belongs to.
    pub reaction_reactors: SecondaryMap<ReactionKey, ReactorKey>,
}

impl ReactionGraph {
    pub fn shutdown_reactions(&self) -> impl Iterator<Item = LevelReactionKey> + '_ {
        self.shutdown_actions
            .iter()
            .flat_map(|&action_key| self.action_triggers[action_key].iter().copied())
    }

}

/// The highest level assigned to any reaction in `env`, used to size a
/// [`crate::reaction_queue::ReactionQueue`].
pub fn max_level(env: &Env) -> crate::reaction_queue::Level {
    env.reactions
        .values()
        .map(|r| r.level())
        .max()
        .unwrap_or_default()
}

/// Builds an [`Env`]/[`ReactionGraph`] pair incrementally. This is the
/// low-level insertion API a higher-level reactor-definition DSL would sit on
/// top of; here it is used directly.
#[derive(Default)]
pub struct GraphBuilder {
    pub env: Env,
    pub graph: ReactionGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_reactor(&mut self, name: &str, state: Box<dyn crate::ReactorState>) -> ReactorKey {
        self.env
            .reactors
            .insert_with_key(|key| Reactor::new(name, key, state))
    }

    pub fn insert_action<F>(&mut self, action_fn: F) -> ActionKey
    where
        F: FnOnce(ActionKey) -> Box<dyn BaseAction>,
    {
        let action_key = self.env.actions.insert_with_key(action_fn);
        self.graph.action_triggers.insert(action_key, vec![]);
        action_key
    }

    pub fn insert_port<F>(&mut self, port_fn: F) -> PortKey
    where
        F: FnOnce(PortKey) -> Box<dyn BasePort>,
    {
        let port_key = self.env.ports.insert_with_key(port_fn);
        self.graph.port_triggers.insert(port_key, vec![]);
        port_key
    }

    pub fn insert_reaction(
        &mut self,
        reaction: Reaction,
        reactor_key: ReactorKey,
        use_ports: impl IntoIterator<Item = PortKey>,
        effect_ports: impl IntoIterator<Item = PortKey>,
        actions: impl IntoIterator<Item = ActionKey>,
    ) -> ReactionKey {
        let reaction_key = self.env.reactions.insert(reaction);
        self.graph
            .reaction_use_ports
            .insert(reaction_key, use_ports.into_iter().collect());
        self.graph
            .reaction_effect_ports
            .insert(reaction_key, effect_ports.into_iter().collect());
        self.graph
            .reaction_actions
            .insert(reaction_key, actions.into_iter().collect());
        self.graph.reaction_reactors.insert(reaction_key, reactor_key);
        reaction_key
    }

    pub fn insert_startup_action(&mut self, action_key: ActionKey, tag: Tag) {
        self.graph.startup_actions.push((action_key, tag));
    }

    pub fn insert_shutdown_action(&mut self, action_key: ActionKey) {
        self.graph.shutdown_actions.push(action_key);
    }

    pub fn insert_port_trigger(&mut self, port_key: PortKey, trigger: LevelReactionKey) {
        self.graph
            .port_triggers
            .get_mut(port_key)
            .expect("port not found")
            .push(trigger);
    }

    pub fn insert_action_trigger(&mut self, action_key: ActionKey, trigger: LevelReactionKey) {
        self.graph
            .action_triggers
            .get_mut(action_key)
            .expect("action not found")
            .push(trigger);
    }

    /// Check that every structure derived from the reaction set has an entry
    /// for every reaction (and likewise for actions/ports). A mismatch here
    /// means the builder was used incorrectly, not a runtime condition.
    pub fn validate(&self) {
        itertools::assert_equal(self.env.actions.keys(), self.graph.action_triggers.keys());
        itertools::assert_equal(self.env.ports.keys(), self.graph.port_triggers.keys());
        itertools::assert_equal(self.env.reactions.keys(), self.graph.reaction_use_ports.keys());
        itertools::assert_equal(
            self.env.reactions.keys(),
            self.graph.reaction_effect_ports.keys(),
        );
        itertools::assert_equal(self.env.reactions.keys(), self.graph.reaction_actions.keys());
        itertools::assert_equal(self.env.reactions.keys(), self.graph.reaction_reactors.keys());
    }

    pub fn build(self) -> (Env, ReactionGraph) {
        self.validate();
        (self.env, self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, EmptyState, Port};

    #[test]
    fn builder_round_trips_a_trivial_reactor() {
        let mut builder = GraphBuilder::new();
        let reactor_key = builder.insert_reactor("r0", Box::new(EmptyState));
        let port_key = builder.insert_port(|key| Port::<i32>::new("out", key, 0).boxed());
        let action_key = builder.insert_action(|key| Action::<()>::new_startup(key).boxed());
        builder.insert_startup_action(action_key, Tag::ZERO);

        let (env, graph) = builder.build();
        assert_eq!(env.reactors.len(), 1);
        assert_eq!(env.ports.len(), 1);
        assert_eq!(graph.startup_actions, vec![(action_key, Tag::ZERO)]);
        assert!(graph.port_triggers.contains_key(port_key));
        assert_eq!(env.find_reactor_by_name("r0").unwrap().key(), reactor_key);
    }
}
