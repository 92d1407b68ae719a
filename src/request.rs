use serde_json::Value;

use crate::credentials::Credentials;
use crate::identifier::Identifier;
use crate::method::Method;
use crate::page::Pagination;
use crate::provider::Providers;

/// The raw request abstraction consumed by the engine.
///
/// Constructed fresh by the hosting transport for every incoming
/// request: method and path from the wire, the body already parsed to
/// JSON, plus the request-scoped provider registry, credentials and
/// pagination the transport extracted.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) body: Option<Value>,
    pub(crate) providers: Providers,
    pub(crate) credentials: Credentials,
    pub(crate) pagination: Pagination,
    pub(crate) identifier: Option<Identifier>,
    pub(crate) parent: Option<Identifier>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Request {
            method,
            path: path.into(),
            body: None,
            providers: Providers::new(),
            credentials: Credentials::anonymous(),
            pagination: Pagination::default(),
            identifier: None,
            parent: None,
        }
    }

    pub fn with_body(self, body: Value) -> Self {
        Request {
            body: Some(body),
            ..self
        }
    }

    pub fn with_providers(self, providers: Providers) -> Self {
        Request { providers, ..self }
    }

    pub fn with_credentials(self, credentials: Credentials) -> Self {
        Request {
            credentials,
            ..self
        }
    }

    pub fn with_pagination(self, pagination: Pagination) -> Self {
        Request { pagination, ..self }
    }

    /// Supply a pre-resolved identifier instead of converting the path
    /// segment; validated against the action's resource type at
    /// binding time.
    pub fn with_identifier(self, identifier: Identifier) -> Self {
        Request {
            identifier: Some(identifier),
            ..self
        }
    }

    /// Supply a pre-resolved parent identifier for nested actions;
    /// validated against the declared parent resource type.
    pub fn with_parent_identifier(self, identifier: Identifier) -> Self {
        Request {
            parent: Some(identifier),
            ..self
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}
