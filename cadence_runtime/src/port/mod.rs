use downcast_rs::{impl_downcast, Downcast};
use std::{
    fmt::{Debug, Display},
    ops::{Deref, DerefMut},
};

use crate::ReactorData;

pub use cadence_core::PortKey;

pub trait BasePort: Debug + Display + Downcast + Send + Sync {
    fn get_name(&self) -> &str;
    fn get_key(&self) -> PortKey;
    /// True if the port carries a value produced at the current tag.
    fn is_set(&self) -> bool;
    /// Clear the port's value; called once per tag after dispatch.
    fn cleanup(&mut self);
    fn type_name(&self) -> &'static str;
    /// Statically known fan-out; governs how many downstream reads a token must serve.
    fn num_destinations(&self) -> usize;
}
impl_downcast!(BasePort);

pub struct Port<T: ReactorData> {
    name: String,
    key: PortKey,
    value: Option<T>,
    num_destinations: usize,
}

impl<T: ReactorData> Debug for Port<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Port")
            .field("name", &self.name)
            .field("key", &self.key)
            .finish()
    }
}

impl<T: ReactorData> Display for Port<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Port<{ty}>(\"{name}\")",
            ty = std::any::type_name::<T>(),
            name = &self.name,
        )
    }
}

impl<T: ReactorData> Deref for Port<T> {
    type Target = Option<T>;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T: ReactorData> DerefMut for Port<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

impl<T: ReactorData> Port<T> {
    pub fn new(name: &str, key: PortKey, num_destinations: usize) -> Self {
        Self {
            name: name.to_owned(),
            key,
            value: None,
            num_destinations,
        }
    }

    pub fn get(&self) -> &Option<T> {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }

    pub fn boxed(self) -> Box<dyn BasePort>
    where
        T: 'static,
    {
        Box::new(self)
    }
}

impl<T: ReactorData> BasePort for Port<T> {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_key(&self) -> PortKey {
        self.key
    }

    fn is_set(&self) -> bool {
        self.value.is_some()
    }

    fn cleanup(&mut self) {
        self.value = None;
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn num_destinations(&self) -> usize {
        self.num_destinations
    }
}

/// The type a reaction body receives for an input port it reads.
pub struct InputRef<'a, T: ReactorData = ()>(&'a Port<T>);

impl<T: ReactorData> InputRef<'_, T> {
    pub fn name(&self) -> &str {
        self.0.get_name()
    }

    pub fn key(&self) -> PortKey {
        self.0.get_key()
    }
}

impl<'a, T: ReactorData> From<&'a Port<T>> for InputRef<'a, T> {
    fn from(port: &'a Port<T>) -> Self {
        Self(port)
    }
}

impl<T: ReactorData> Deref for InputRef<'_, T> {
    type Target = <Port<T> as Deref>::Target;

    fn deref(&self) -> &Self::Target {
        self.0.deref()
    }
}

impl<'a, T: ReactorData> TryFrom<&'a dyn BasePort> for InputRef<'a, T> {
    type Error = crate::error::RuntimeError;

    fn try_from(port: &'a dyn BasePort) -> Result<Self, Self::Error> {
        let found = port.type_name();
        port.downcast_ref::<Port<T>>()
            .map(InputRef::from)
            .ok_or(crate::error::RuntimeError::TypeMismatch {
                found,
                wanted: std::any::type_name::<T>(),
            })
    }
}

/// The type a reaction body receives for an output port it may write.
pub struct OutputRef<'a, T: ReactorData = ()>(&'a mut Port<T>);

impl<T: ReactorData> OutputRef<'_, T> {
    pub fn name(&self) -> &str {
        self.0.get_name()
    }

    pub fn key(&self) -> PortKey {
        self.0.get_key()
    }
}

impl<'a, T: ReactorData> From<&'a mut Port<T>> for OutputRef<'a, T> {
    fn from(port: &'a mut Port<T>) -> Self {
        Self(port)
    }
}

impl<T: ReactorData> Deref for OutputRef<'_, T> {
    type Target = <Port<T> as Deref>::Target;

    fn deref(&self) -> &Self::Target {
        self.0.deref()
    }
}

impl<T: ReactorData> DerefMut for OutputRef<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.deref_mut()
    }
}

impl<'a, T: ReactorData> TryFrom<&'a mut dyn BasePort> for OutputRef<'a, T> {
    type Error = crate::error::RuntimeError;

    fn try_from(port: &'a mut dyn BasePort) -> Result<Self, Self::Error> {
        let found = port.type_name();
        port.downcast_mut::<Port<T>>()
            .map(OutputRef::from)
            .ok_or(crate::error::RuntimeError::TypeMismatch {
                found,
                wanted: std::any::type_name::<T>(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn port_set_and_cleanup() {
        let mut keys: SlotMap<PortKey, ()> = SlotMap::with_key();
        let key = keys.insert(());
        let mut port = Port::<i32>::new("p", key, 1);
        assert!(!port.is_set());
        port.set(7);
        assert!(port.is_set());
        assert_eq!(*port.get(), Some(7));
        port.cleanup();
        assert!(!port.is_set());
    }
}
