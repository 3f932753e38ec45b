//! Concurrent type-keyed service registry

use crate::{ModuleError, Result};
use dashmap::DashMap;
use std::any::{type_name, Any, TypeId};
use std::sync::Arc;
use tracing::{debug, warn};

type Binding = Arc<dyn Any + Send + Sync>;

/// Maps a service type to one shared instance.
///
/// `T` may be unsized, so both a concrete client and a trait object such as
/// `dyn StorageService` can be bound side by side.
#[derive(Default)]
pub struct Registry {
    bindings: DashMap<TypeId, Binding>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` as the instance for `T`, replacing any earlier binding
    pub fn bind<T>(&self, value: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let binding: Binding = Arc::new(value);
        if self.bindings.insert(TypeId::of::<T>(), binding).is_some() {
            warn!("Replacing existing binding for {}", type_name::<T>());
        } else {
            debug!("Bound {}", type_name::<T>());
        }
    }

    /// The instance bound for `T`, if any
    pub fn get<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.bindings
            .get(&TypeId::of::<T>())
            .and_then(|binding| binding.value().downcast_ref::<Arc<T>>().cloned())
    }

    /// The instance bound for `T`, or [`ModuleError::Unbound`]
    pub fn require<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get::<T>()
            .ok_or(ModuleError::Unbound(type_name::<T>()))
    }

    pub fn contains<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.bindings.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("bindings", &self.bindings.len())
            .finish()
    }
}
