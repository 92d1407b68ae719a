//! Action semantics: the immutable records produced by the route
//! builders and stored by the manager.

mod handler;
mod into_result;

pub use handler::Handler;
pub use into_result::{IntoIds, IntoItems, IntoModel, IntoUnit};

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::credentials::Credentials;
use crate::errors::ExecuteError;
use crate::form::{Form, FormSpec};
use crate::identifier::Identifier;
use crate::invocation::Invocation;
use crate::method::Method;
use crate::path::{ID_PARAM, PARENT_PARAM};
use crate::resource::Resource;

/// One value an action needs, in declared (positional) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// The request's pagination parameters.
    Pagination,
    /// The decoded request body.
    Body,
    /// The path identifier of the action's own resource.
    Identifier,
    /// The path identifier of the parent resource (nested actions).
    ParentIdentifier,
    /// A request-scoped context value of the tagged type.
    Provided(crate::provider::TypeToken),
}

/// The action name within its resource; determines the operation name
/// suffix exposed to hypermedia consumers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionName {
    Retrieve,
    Create,
    Update,
    Delete,
    BatchCreate,
    Custom(Arc<str>),
}

impl ActionName {
    pub fn suffix(&self) -> &str {
        match self {
            ActionName::Retrieve => "retrieve",
            ActionName::Create => "create",
            ActionName::Update => "update",
            ActionName::Delete => "delete",
            ActionName::BatchCreate => "batch-create",
            ActionName::Custom(name) => name,
        }
    }
}

/// Unique identity of an action: (method, resource, name).
///
/// Registering two actions with the same key is a build-time error.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionKey {
    method: Method,
    resource: Resource,
    name: ActionName,
}

impl ActionKey {
    pub(crate) fn new(method: Method, resource: Resource, name: ActionName) -> Self {
        ActionKey {
            method,
            resource,
            name,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn name(&self) -> &ActionName {
        &self.name
    }

    /// Operation name per the hypermedia naming convention, e.g.
    /// `books/retrieve` or `books/archive`.
    pub fn operation(&self) -> String {
        format!("{}/{}", self.resource.name(), self.name.suffix())
    }

    /// Route pattern this action is served under.
    pub(crate) fn route(&self) -> String {
        let base = match &self.resource {
            Resource::Paged(name) => {
                if self.name == ActionName::BatchCreate {
                    return format!("/batch/{name}");
                }
                format!("/{name}")
            }
            Resource::Item(name) => format!("/{name}/{{{ID_PARAM}}}"),
            Resource::Nested { child, parent } => {
                format!("/{}/{{{PARENT_PARAM}}}/{}", parent.name(), child.name())
            }
        };
        match &self.name {
            ActionName::Custom(route) => format!("{base}/{route}"),
            _ => base,
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.operation())
    }
}

/// Metadata annotations attached at registration time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    pub(crate) entry_point: bool,
}

impl Annotations {
    /// Whether the action is a root discovery point for hypermedia
    /// consumers (collection getters).
    pub fn is_entry_point(&self) -> bool {
        self.entry_point
    }
}

/// The envelope-ready value produced by an erased handler.
pub(crate) enum Payload {
    Model(Value),
    Items {
        items: Vec<Value>,
        total: Option<u64>,
    },
    Ids(Vec<Value>),
    Done,
}

pub(crate) type ActionFuture = BoxFuture<'static, Result<Payload, ExecuteError>>;
pub(crate) type ActionFn = Arc<dyn Fn(&Invocation) -> ActionFuture + Send + Sync>;
pub(crate) type PermissionFn = Arc<dyn Fn(&Credentials, Option<&Identifier>) -> bool + Send + Sync>;

/// Immutable record of one registered operation: method, name, owning
/// resource, ordered parameter descriptors, the erased executable
/// function, and the optional form, permission predicate and
/// annotations.
///
/// Created once by a route builder, registered once, then only read.
#[derive(Clone)]
pub struct Action {
    key: ActionKey,
    params: Vec<Param>,
    form: Option<Form>,
    permission: Option<PermissionFn>,
    annotations: Annotations,
    func: ActionFn,
}

impl Action {
    fn from_parts(key: ActionKey, params: Vec<Param>, func: ActionFn) -> Self {
        Action {
            key,
            params,
            form: None,
            permission: None,
            annotations: Annotations::default(),
            func,
        }
    }

    fn erase<H, T, O>(handler: H, convert: fn(O) -> Result<Payload, ExecuteError>) -> ActionFn
    where
        H: Handler<T, O>,
        O: Send + 'static,
    {
        Arc::new(move |invocation| {
            let fut = handler.call(invocation);
            Box::pin(async move { convert(fut.await?) })
        })
    }

    /// An action producing a single-model envelope.
    pub(crate) fn single<H, T, O>(key: ActionKey, handler: H) -> Self
    where
        H: Handler<T, O>,
        O: IntoModel + Send + 'static,
    {
        let func = Self::erase(handler, |output: O| {
            output.into_model().map(Payload::Model).map_err(ExecuteError::from)
        });
        Action::from_parts(key, H::params(), func)
    }

    /// An action producing a page envelope.
    pub(crate) fn page<H, T, O>(key: ActionKey, handler: H) -> Self
    where
        H: Handler<T, O>,
        O: IntoItems + Send + 'static,
    {
        let func = Self::erase(handler, |output: O| {
            output
                .into_items()
                .map(|(items, total)| Payload::Items { items, total })
                .map_err(ExecuteError::from)
        });
        Action::from_parts(key, H::params(), func)
    }

    /// An action producing a batch-result envelope.
    pub(crate) fn batch<H, T, O>(key: ActionKey, handler: H) -> Self
    where
        H: Handler<T, O>,
        O: IntoIds + Send + 'static,
    {
        let func = Self::erase(handler, |output: O| {
            output.into_ids().map(Payload::Ids).map_err(ExecuteError::from)
        });
        Action::from_parts(key, H::params(), func)
    }

    /// An action producing no content (removers).
    pub(crate) fn unit<H, T, O>(key: ActionKey, handler: H) -> Self
    where
        H: Handler<T, O>,
        O: IntoUnit + Send + 'static,
    {
        let func = Self::erase(handler, |output: O| {
            output.into_unit().map(|()| Payload::Done).map_err(ExecuteError::from)
        });
        Action::from_parts(key, H::params(), func)
    }

    pub(crate) fn with_form(self, form: Form) -> Self {
        Action {
            form: Some(form),
            ..self
        }
    }

    pub(crate) fn with_permission(self, permission: PermissionFn) -> Self {
        Action {
            permission: Some(permission),
            ..self
        }
    }

    pub(crate) fn mark_entry_point(self) -> Self {
        Action {
            annotations: Annotations { entry_point: true },
            ..self
        }
    }

    pub fn key(&self) -> &ActionKey {
        &self.key
    }

    /// Ordered parameter descriptors, derived from the handler's
    /// extractor list.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// The form describing this action's request body, if it is a
    /// write action.
    pub fn form(&self) -> Option<&FormSpec> {
        self.form.as_ref().map(Form::spec)
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub(crate) fn permission(&self) -> Option<&PermissionFn> {
        self.permission.as_ref()
    }

    /// Evaluate the permission predicate; actions without one are
    /// always permitted.
    pub(crate) fn permitted(&self, credentials: &Credentials, id: Option<&Identifier>) -> bool {
        self.permission
            .as_ref()
            .map(|predicate| predicate(credentials, id))
            .unwrap_or(true)
    }

    pub(crate) fn form_full(&self) -> Option<&Form> {
        self.form.as_ref()
    }

    pub(crate) fn invoke(&self, invocation: &Invocation) -> ActionFuture {
        (self.func)(invocation)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("key", &self.key)
            .field("params", &self.params)
            .field("form", &self.form)
            .field("annotations", &self.annotations)
            .finish()
    }
}
