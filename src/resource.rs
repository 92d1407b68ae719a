use std::fmt;
use std::sync::Arc;

/// Descriptor of a resource exposed through the action registry.
///
/// A resource is either a single model addressed by a path identifier
/// (`Item`), a pageable collection of models (`Paged`), or a resource
/// scoped under a parent item (`Nested`). A nested resource always
/// carries its parent descriptor; two descriptors are the same resource
/// when their kind, name and parent chain match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resource {
    /// A single model identified by a path identifier.
    Item(Arc<str>),
    /// A collection of models served in pages.
    Paged(Arc<str>),
    /// A resource scoped under a parent item.
    Nested {
        child: Box<Resource>,
        parent: Box<Resource>,
    },
}

impl Resource {
    pub fn item(name: impl Into<Arc<str>>) -> Self {
        Resource::Item(name.into())
    }

    pub fn paged(name: impl Into<Arc<str>>) -> Self {
        Resource::Paged(name.into())
    }

    /// Scope `child` under the parent item with the given name.
    pub fn nested(parent: impl Into<Arc<str>>, child: Resource) -> Self {
        Resource::Nested {
            child: Box::new(child),
            parent: Box::new(Resource::Item(parent.into())),
        }
    }

    /// The resource name used in routes, operation names and envelopes.
    /// For nested resources this is the child's name.
    pub fn name(&self) -> &Arc<str> {
        match self {
            Resource::Item(name) | Resource::Paged(name) => name,
            Resource::Nested { child, .. } => child.name(),
        }
    }

    /// The parent descriptor, present only for nested resources.
    pub fn parent(&self) -> Option<&Resource> {
        match self {
            Resource::Nested { parent, .. } => Some(parent),
            _ => None,
        }
    }

    /// Name of the resource type this resource's own path identifier
    /// belongs to, if it carries one.
    pub(crate) fn identifier_resource(&self) -> Option<&Arc<str>> {
        match self {
            Resource::Item(name) => Some(name),
            Resource::Paged(_) => None,
            Resource::Nested { child, .. } => child.identifier_resource(),
        }
    }

    /// Name of the resource type the parent path identifier belongs to,
    /// present only for nested resources.
    pub(crate) fn parent_resource(&self) -> Option<&Arc<str>> {
        self.parent().map(|parent| parent.name())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Item(name) | Resource::Paged(name) => write!(f, "{name}"),
            Resource::Nested { child, parent } => write!(f, "{parent}/{child}"),
        }
    }
}
