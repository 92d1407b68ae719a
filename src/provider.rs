use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Stable runtime identity for a provided context type.
///
/// Used for wiring validation and diagnostics instead of letting raw
/// downcasts leak into user code.
#[derive(Clone, Copy)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
}

impl TypeToken {
    pub fn of<T: 'static>() -> Self {
        TypeToken {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl std::hash::Hash for TypeToken {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

type Resolver = Arc<dyn Fn() -> Box<dyn Any + Send> + Send + Sync>;

#[derive(Clone)]
struct Entry {
    token: TypeToken,
    resolve: Resolver,
}

/// Request-scoped registry mapping a context type to a resolver.
///
/// Cheap to clone: transports typically keep one registry as a template
/// and clone it into every [Request](crate::Request). Resolvers run
/// once per extraction and produce owned values; shared state goes in
/// as `Arc<T>`.
#[derive(Clone, Default)]
pub struct Providers {
    map: HashMap<TypeId, Entry>,
}

impl Providers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide a value by cloning it for every extraction.
    pub fn provide<T>(self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.provide_with(move || value.clone())
    }

    /// Provide a value lazily through a resolver closure.
    pub fn provide_with<T, F>(self, resolve: F) -> Self
    where
        T: Send + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let Self { mut map } = self;
        let token = TypeToken::of::<T>();
        map.insert(
            token.id,
            Entry {
                token,
                resolve: Arc::new(move || Box::new(resolve())),
            },
        );
        Self { map }
    }

    pub fn get<T: Send + 'static>(&self) -> Option<T> {
        self.map.get(&TypeId::of::<T>()).map(|entry| {
            *(entry.resolve)()
                .downcast::<T>()
                .expect("resolver output should match its registered type")
        })
    }

    pub fn contains(&self, token: &TypeToken) -> bool {
        self.map.contains_key(&token.id)
    }
}

impl fmt::Debug for Providers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.map.values().map(|entry| entry.token))
            .finish()
    }
}
