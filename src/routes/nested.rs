use std::sync::Arc;

use super::push_unique;
use crate::action::{Action, ActionKey, ActionName, Handler, IntoItems, IntoModel};
use crate::form::Form;
use crate::method::Method;
use crate::resource::Resource;

/// Declares a paged child collection scoped under a parent item, e.g.
/// the books of one shelf.
///
/// Nested actions receive the parent identifier; invoking one with an
/// identifier minted for a different resource type fails with an
/// identifier type mismatch before the handler runs.
pub struct NestedRoutes {
    resource: Resource,
    actions: Vec<Action>,
}

impl NestedRoutes {
    pub fn new(parent: impl Into<Arc<str>>, child: impl Into<Arc<str>>) -> Self {
        NestedRoutes {
            resource: Resource::nested(parent, Resource::paged(child)),
            actions: Vec::new(),
        }
    }

    /// Register the nested collection getter
    /// (`GET /<parent>/{parentId}/<child>`).
    pub fn getter<H, T, O>(mut self, handler: H) -> Self
    where
        H: Handler<T, O>,
        O: IntoItems + Send + 'static,
    {
        let key = ActionKey::new(Method::Get, self.resource.clone(), ActionName::Retrieve);
        push_unique(&mut self.actions, Action::page(key, handler));
        self
    }

    /// Register the nested creator
    /// (`POST /<parent>/{parentId}/<child>`).
    pub fn creator<H, T, O>(mut self, form: Form, handler: H) -> Self
    where
        H: Handler<T, O>,
        O: IntoModel + Send + 'static,
    {
        let key = ActionKey::new(Method::Post, self.resource.clone(), ActionName::Create);
        push_unique(&mut self.actions, Action::single(key, handler).with_form(form));
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
    use crate::extract::{Paging, ParentId};
    use crate::page::PageItems;
    use std::convert::Infallible;

    async fn list(
        ParentId(_): ParentId<i64>,
        Paging(_): Paging,
    ) -> Result<PageItems<i32>, Infallible> {
        Ok(PageItems::new(vec![]))
    }

    #[test]
    fn nested_actions_carry_the_parent_descriptor() {
        let actions = NestedRoutes::new("shelf", "books").getter(list).build();
        let resource = actions[0].key().resource();

        assert_eq!(resource.parent(), Some(&Resource::item("shelf")));
        assert_eq!(actions[0].key().operation(), "books/retrieve");
    }
}
