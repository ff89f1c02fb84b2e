use std::time::Duration;

use cadence_core::Tag;

use crate::Context;

use super::{Action, ActionKey, BaseAction, ReactorData};

pub trait ActionCommon<T: ReactorData> {
    fn name(&self) -> &str;
    fn key(&self) -> ActionKey;
    fn min_delay(&self) -> Duration;
    fn is_logical(&self) -> bool;
}

/// The handle a reaction body receives to read and schedule an action.
pub struct ActionRef<'a, T: ReactorData = ()>(&'a mut Action<T>);

impl<'a, T: ReactorData> From<&'a mut dyn BaseAction> for ActionRef<'a, T> {
    fn from(value: &'a mut dyn BaseAction) -> Self {
        Self(value.downcast_mut().expect("type mismatch on ActionRef"))
    }
}

impl<'a, T: ReactorData> ActionRef<'a, T> {
    /// Return true if the action is present at the current tag.
    pub fn is_present(&mut self, context: &Context) -> bool {
        self.0.store.get_current(context.get_tag()).is_some()
    }

    pub fn get_value_at(&mut self, tag: Tag) -> Option<&T> {
        self.0.store.get_current(tag)
    }

    pub(crate) fn set_value(&mut self, tag: Tag, value: T) {
        self.0.store.push(tag, value);
    }

    /// Schedule `value` to become present at `base + min_delay + extra_delay`,
    /// where `base` is the current logical tag for a logical action or the
    /// current physical time for a physical action. Records the effect on
    /// `context` for the scheduler to pick up once the reaction body returns.
    pub fn schedule(&mut self, context: &mut Context, value: T, extra_delay: Duration) -> Tag {
        let total_delay = self.min_delay() + extra_delay;
        let base = if self.is_logical() {
            context.get_tag()
        } else {
            Tag::from_physical_time(context.get_start_time(), context.get_physical_time())
        };
        let tag = base.delay(total_delay);
        self.set_value(tag, value);
        context.schedule_at(self.key(), tag);
        tag
    }
}

impl<'a, T: ReactorData> ActionCommon<T> for ActionRef<'a, T> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn key(&self) -> ActionKey {
        self.0.key()
    }

    fn min_delay(&self) -> Duration {
        self.0.min_delay.unwrap_or_default()
    }

    fn is_logical(&self) -> bool {
        self.0.is_logical()
    }
}
