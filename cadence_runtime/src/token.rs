//! A [`Token`] is the ref-counted container an action's scheduled payload
//! lives in between being produced by `schedule()` and consumed by the
//! reactions it triggers.
//!
//! In the original design a token's reference count is incremented once per
//! destination and the payload is freed when it drops to zero. Rust's `Arc`
//! already gives exactly that guarantee — the last clone to drop runs the
//! payload's destructor — so `Token<T>` is a thin, explicitly-named wrapper
//! around `Arc<T>` rather than a hand-rolled counter: the runtime never
//! inspects or decrements a count itself, it just stops holding a clone.

use std::ops::Deref;
use std::sync::Arc;

#[derive(Debug)]
pub struct Token<T>(Arc<T>);

impl<T> Token<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn value(&self) -> &T {
        &self.0
    }

    /// Number of live references to this token's payload, including this one.
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl<T> Clone for Token<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Deref for Token<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: PartialEq> PartialEq for Token<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
