use std::sync::Arc;

use super::{push_unique, CustomRoute};
use crate::action::{Action, ActionKey, ActionName, Handler, IntoIds, IntoItems, IntoModel};
use crate::form::Form;
use crate::method::Method;
use crate::resource::Resource;

/// Declares the actions of a paged collection resource.
pub struct CollectionRoutes {
    name: Arc<str>,
    actions: Vec<Action>,
}

impl CollectionRoutes {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        CollectionRoutes {
            name: name.into(),
            actions: Vec::new(),
        }
    }

    fn resource(&self) -> Resource {
        Resource::paged(self.name.clone())
    }

    /// Register the collection getter (`GET /<name>`).
    ///
    /// Collection getters are the entry points hypermedia consumers
    /// discover resources through.
    pub fn getter<H, T, O>(mut self, handler: H) -> Self
    where
        H: Handler<T, O>,
        O: IntoItems + Send + 'static,
    {
        let key = ActionKey::new(Method::Get, self.resource(), ActionName::Retrieve);
        push_unique(&mut self.actions, Action::page(key, handler).mark_entry_point());
        self
    }

    /// Register the creator (`POST /<name>`); the form decodes and
    /// documents the request body.
    pub fn creator<H, T, O>(mut self, form: Form, handler: H) -> Self
    where
        H: Handler<T, O>,
        O: IntoModel + Send + 'static,
    {
        let key = ActionKey::new(Method::Post, self.resource(), ActionName::Create);
        push_unique(&mut self.actions, Action::single(key, handler).with_form(form));
        self
    }

    /// Register the batch creator (`POST /batch/<name>`); the form is
    /// applied to every element of the list body, and the handler
    /// returns the created identifier values.
    pub fn batch_creator<H, T, O>(mut self, form: Form, handler: H) -> Self
    where
        H: Handler<T, O>,
        O: IntoIds + Send + 'static,
    {
        let key = ActionKey::new(Method::Post, self.resource(), ActionName::BatchCreate);
        push_unique(&mut self.actions, Action::batch(key, handler).with_form(form));
        self
    }

    /// Register a named custom route (`<method> /<name>/<route>`).
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Paging;
    use crate::page::PageItems;
    use std::convert::Infallible;

    async fn list(Paging(_): Paging) -> Result<PageItems<i32>, Infallible> {
        Ok(PageItems::new(vec![1, 2, 3]))
    }

    #[test]
    fn getters_are_entry_points() {
        let actions = CollectionRoutes::new("books").getter(list).build();
        assert_eq!(actions.len(), 1);
        assert!(actions[0].annotations().is_entry_point());
        assert_eq!(actions[0].key().operation(), "books/retrieve");
    }

    #[test]
    #[should_panic]
    fn it_fails_on_a_second_getter() {
        CollectionRoutes::new("books").getter(list).getter(list);
    }
}
