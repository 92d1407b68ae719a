use std::sync::Arc;

use serde_json::Value;

use crate::form::FormSpec;
use crate::identifier::Identifier;
use crate::method::Method;
use crate::page::Pagination;

/// A follow-up operation a client may perform next, attached to
/// envelopes so the serialization layer can render hypermedia
/// affordances.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRef {
    pub(crate) name: String,
    pub(crate) method: Method,
    pub(crate) form: Option<FormSpec>,
}

impl OperationRef {
    /// Operation name, e.g. `books/update`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn form(&self) -> Option<&FormSpec> {
        self.form.as_ref()
    }
}

/// A single model plus the operations currently permitted on it.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleModel {
    pub(crate) resource: Arc<str>,
    pub(crate) value: Value,
    pub(crate) operations: Vec<OperationRef>,
}

impl SingleModel {
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn operations(&self) -> &[OperationRef] {
        &self.operations
    }
}

/// One page of a collection plus its pagination state.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub(crate) resource: Arc<str>,
    pub(crate) items: Vec<Value>,
    pub(crate) pagination: Pagination,
    pub(crate) total: Option<u64>,
    pub(crate) operations: Vec<OperationRef>,
}

impl Page {
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Total collection size, when the backend reported one.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn operations(&self) -> &[OperationRef] {
        &self.operations
    }
}

/// The identifiers created by a batch creator.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub(crate) resource: Arc<str>,
    pub(crate) identifiers: Vec<Identifier>,
}

impl BatchResult {
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn identifiers(&self) -> &[Identifier] {
        &self.identifiers
    }
}

/// Canonical wrapper for an invoked action's result, handed to the
/// serialization layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultEnvelope {
    SingleModel(SingleModel),
    Page(Page),
    Batch(BatchResult),
    /// Removers produce no content.
    NoContent,
}

impl ResultEnvelope {
    pub fn as_single(&self) -> Option<&SingleModel> {
        match self {
            ResultEnvelope::SingleModel(single) => Some(single),
            _ => None,
        }
    }

    pub fn as_page(&self) -> Option<&Page> {
        match self {
            ResultEnvelope::Page(page) => Some(page),
            _ => None,
        }
    }

    pub fn as_batch(&self) -> Option<&BatchResult> {
        match self {
            ResultEnvelope::Batch(batch) => Some(batch),
            _ => None,
        }
    }
}
