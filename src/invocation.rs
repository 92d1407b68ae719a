use serde_json::Value;

use crate::credentials::Credentials;
use crate::identifier::Identifier;
use crate::page::Pagination;
use crate::provider::Providers;

/// Everything an action's extractors may draw from for a single
/// request: the provider registry, credentials, pagination, the
/// resolved identifiers and the decoded body.
///
/// Built by the manager during parameter binding; read-only to
/// handlers. Lifetime is one request.
pub struct Invocation {
    pub(crate) providers: Providers,
    pub(crate) credentials: Credentials,
    pub(crate) pagination: Pagination,
    pub(crate) identifier: Option<Identifier>,
    pub(crate) parent: Option<Identifier>,
    pub(crate) body: Option<Value>,
}

impl Invocation {
    pub fn providers(&self) -> &Providers {
        &self.providers
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// The resolved path identifier of the action's own resource.
    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    /// The resolved parent identifier for nested resources.
    pub fn parent(&self) -> Option<&Identifier> {
        self.parent.as_ref()
    }

    /// The decoded request body.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Invocation {
            providers: Providers::new(),
            credentials: Credentials::anonymous(),
            pagination: Pagination::default(),
            identifier: None,
            parent: None,
            body: None,
        }
    }
}
