use std::sync::Arc;

use super::{push_unique, CustomRoute};
use crate::action::{Action, ActionKey, ActionName, Handler, IntoModel, IntoUnit};
use crate::form::Form;
use crate::method::Method;
use crate::resource::Resource;

/// Declares the actions of a single-model resource addressed by a path
/// identifier.
pub struct ItemRoutes {
    name: Arc<str>,
    actions: Vec<Action>,
}

impl ItemRoutes {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        ItemRoutes {
            name: name.into(),
            actions: Vec::new(),
        }
    }

    fn resource(&self) -> Resource {
        Resource::item(self.name.clone())
    }

    /// Register the item getter (`GET /<name>/{id}`).
    pub fn getter<H, T, O>(mut self, handler: H) -> Self
    where
        H: Handler<T, O>,
        O: IntoModel + Send + 'static,
    {
        let key = ActionKey::new(Method::Get, self.resource(), ActionName::Retrieve);
        push_unique(&mut self.actions, Action::single(key, handler));
        self
    }

    /// Register the updater (`PUT /<name>/{id}`); the form decodes and
    /// documents the request body.
    pub fn updater<H, T, O>(mut self, form: Form, handler: H) -> Self
    where
        H: Handler<T, O>,
        O: IntoModel + Send + 'static,
    {
        let key = ActionKey::new(Method::Put, self.resource(), ActionName::Update);
        push_unique(&mut self.actions, Action::single(key, handler).with_form(form));
        self
    }

    /// Register the remover (`DELETE /<name>/{id}`).
    pub fn remover<H, T, O>(mut self, handler: H) -> Self
    where
        H: Handler<T, O>,
        O: IntoUnit + Send + 'static,
    {
        let key = ActionKey::new(Method::Delete, self.resource(), ActionName::Delete);
        push_unique(&mut self.actions, Action::unit(key, handler));
        self
    }

    /// Register a named custom route (`<method> /<name>/{id}/<route>`).
    pub fn route<H, T, O>(mut self, route: CustomRoute, handler: H) -> Self
    where
        H: Handler<T, O>,
        O: IntoModel + Send + 'static,
    {
        let CustomRoute {
            name,
            method,
            permission,
            form,
        } = route;
        let key = ActionKey::new(method, self.resource(), ActionName::Custom(name));
        let mut action = Action::single(key, handler);
        if let Some(form) = form {
            action = action.with_form(form);
        }
        if let Some(permission) = permission {
            action = action.with_permission(permission);
        }
        push_unique(&mut self.actions, action);
        self
    }

    /// Finalize into the immutable action list.
    pub fn build(self) -> Vec<Action> {
        self.actions
    }
}
