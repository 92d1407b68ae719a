//! Fluent assembly of resource actions.
//!
//! A route builder collects the actions of one resource: at most one
//! getter, creator, updater and remover, plus any number of
//! uniquely-named custom routes. Builders are value-like: every call
//! consumes the builder and returns the next state, and `build()`
//! consumes it for good, so nothing can be added after finalization.
//!
//! ```rust
//! use apiary::routes::{CollectionRoutes, ItemRoutes};
//! use apiary::extract::{Id, Paging};
//! use apiary::PageItems;
//! use std::convert::Infallible;
//!
//! async fn list(Paging(paging): Paging) -> Result<PageItems<String>, Infallible> {
//!     Ok(PageItems::new(vec![]).with_total(0))
//! }
//!
//! async fn find(Id(id): Id<i64>) -> Result<String, Infallible> {
//!     Ok(format!("book {id}"))
//! }
//!
//! let actions = CollectionRoutes::new("books").getter(list).build();
//! let items = ItemRoutes::new("books").getter(find).build();
//! ```

mod collection;
mod item;
mod nested;

pub use collection::CollectionRoutes;
pub use item::ItemRoutes;
pub use nested::NestedRoutes;

use std::sync::Arc;

use crate::action::{Action, PermissionFn};
use crate::credentials::Credentials;
use crate::form::Form;
use crate::identifier::Identifier;
use crate::method::Method;

/// Descriptor of a named custom route: the name builds the URL suffix
/// and the operation name, the method tag selects the verb, and the
/// optional permission predicate guards resolution.
#[derive(Clone)]
pub struct CustomRoute {
    pub(crate) name: Arc<str>,
    pub(crate) method: Method,
    pub(crate) permission: Option<PermissionFn>,
    pub(crate) form: Option<Form>,
}

impl CustomRoute {
    pub fn new(name: impl Into<Arc<str>>, method: Method) -> Self {
        CustomRoute {
            name: name.into(),
            method,
            permission: None,
            form: None,
        }
    }

    /// Guard the route. A failing predicate makes the route behave
    /// exactly as if it were never registered, so guarded resources do
    /// not leak their existence.
    pub fn with_permission<P>(self, predicate: P) -> Self
    where
        P: Fn(&Credentials, Option<&Identifier>) -> bool + Send + Sync + 'static,
    {
        CustomRoute {
            permission: Some(Arc::new(predicate)),
            ..self
        }
    }

    /// Attach the form describing this route's request body.
    pub fn with_form(self, form: Form) -> Self {
        CustomRoute {
            form: Some(form),
            ..self
        }
    }
}

// Builders catch duplicate registrations immediately so the mistake is
// reported at the offending call site rather than at manager
// registration.
pub(crate) fn push_unique(actions: &mut Vec<Action>, action: Action) {
    if actions.iter().any(|a| a.key() == action.key()) {
        panic!(
            "cannot register action '{}', a previous registration exists",
            action.key()
        );
    }
    actions.push(action);
}
