//! Actions are reactor elements that can be scheduled. When an action triggers,
//! all reactions dependent on it are enqueued.
//!
//! Actions come in two flavours:
//! - *logical*: scheduled at the current *logical* time plus an offset.
//! - *physical*: scheduled at the current *physical* time plus an offset; used
//!   to admit events originating outside the deterministic core (e.g. sensor
//!   input), subject to a deadline/STP check on arrival.
//!
//! [`Timer`]-style periodic actions reschedule themselves at `tag + period`
//! every time they fire, until the program stops.

use std::fmt::{Debug, Display};
use std::time::Duration;

use cadence_core::Tag;
use downcast_rs::Downcast;

mod action_ref;
pub mod store;

pub use action_ref::*;
pub use cadence_core::ActionKey;
use store::ActionStore;

use crate::ReactorData;

pub trait BaseAction: Debug + Downcast + Send + Sync {
    fn name(&self) -> &str;
    fn key(&self) -> ActionKey;
    /// The action's statically configured minimum delay, if any.
    fn min_delay(&self) -> Option<Duration>;
    fn is_logical(&self) -> bool;
    fn type_name(&self) -> &'static str;
    /// Push a new value onto the action's store. Panics on a type mismatch,
    /// which indicates a malformed graph rather than a recoverable condition.
    fn push_value(&mut self, tag: Tag, value: Box<dyn ReactorData>);
    /// Timers and periodic actions reschedule themselves here; other actions no-op.
    fn reschedule_if_periodic(&self, _current_tag: Tag) -> Option<Tag> {
        None
    }
}

downcast_rs::impl_downcast!(BaseAction);

impl Display for dyn BaseAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Action({})", self.name())
    }
}

pub struct Action<T: ReactorData = ()> {
    name: String,
    key: ActionKey,
    min_delay: Option<Duration>,
    store: ActionStore<T>,
    is_logical: bool,
    /// Non-zero for a timer-like periodic action.
    period: Option<Duration>,
}

impl<T: ReactorData> Debug for Action<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("min_delay", &self.min_delay)
            .field("is_logical", &self.is_logical)
            .field("period", &self.period)
            .finish()
    }
}

impl<T: ReactorData> BaseAction for Action<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> ActionKey {
        self.key
    }

    fn min_delay(&self) -> Option<Duration> {
        self.min_delay
    }

    fn is_logical(&self) -> bool {
        self.is_logical
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn push_value(&mut self, tag: Tag, value: Box<dyn ReactorData>) {
        match value.downcast::<T>() {
            Ok(v) => self.store.push(tag, *v),
            Err(_) => panic!(
                "type mismatch scheduling action {:?}: expected {}",
                self.key,
                self.type_name()
            ),
        }
    }

    fn reschedule_if_periodic(&self, current_tag: Tag) -> Option<Tag> {
        self.period.map(|period| current_tag.delay(period))
    }
}

impl<T: ReactorData> Action<T> {
    pub fn new(name: &str, key: ActionKey, min_delay: Option<Duration>, is_logical: bool) -> Self {
        Self {
            name: name.into(),
            key,
            min_delay,
            store: ActionStore::new(),
            is_logical,
            period: None,
        }
    }

    /// Build a periodic (timer-equivalent) logical action: fires at `offset`, then every `period`.
    pub fn new_timer(name: &str, key: ActionKey, offset: Duration, period: Duration) -> Self {
        Self {
            name: name.into(),
            key,
            min_delay: Some(offset),
            store: ActionStore::new(),
            is_logical: true,
            period: if period.is_zero() { None } else { Some(period) },
        }
    }

    pub fn boxed(self) -> Box<dyn BaseAction>
    where
        T: 'static,
    {
        Box::new(self)
    }
}

impl Action<()> {
    /// A startup pseudo-action, triggered once at the initial tag.
    pub fn new_startup(key: ActionKey) -> Self {
        Self::new("startup", key, None, true)
    }

    /// A shutdown pseudo-action, triggered once at the final tag.
    pub fn new_shutdown(key: ActionKey) -> Self {
        Self::new("shutdown", key, None, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn boxed_action_roundtrip() {
        let mut keys: SlotMap<ActionKey, ()> = SlotMap::with_key();
        let key = keys.insert(());
        let mut action = Action::<i32>::new("a0", key, None, true).boxed();
        action.push_value(Tag::ZERO, Box::new(42_i32));
        let typed: &mut Action<i32> = action.downcast_mut().unwrap();
        assert_eq!(typed.store_for_test().get_current(Tag::ZERO), Some(&42));
    }

    #[test]
    fn timer_reschedules_at_period() {
        let mut keys: SlotMap<ActionKey, ()> = SlotMap::with_key();
        let key = keys.insert(());
        let timer = Action::<()>::new_timer("t", key, Duration::ZERO, Duration::from_millis(50));
        let next = timer.reschedule_if_periodic(Tag::new(Duration::from_millis(100), 0));
        assert_eq!(next, Some(Tag::new(Duration::from_millis(150), 0)));
    }

    impl<T: ReactorData> Action<T> {
        fn store_for_test(&mut self) -> &mut ActionStore<T> {
            &mut self.store
        }
    }
}
