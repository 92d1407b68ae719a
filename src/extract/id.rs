use std::ops::Deref;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::FromInvocation;
use crate::action::Param;
use crate::errors::{ExecuteError, WiringError};
use crate::invocation::Invocation;

/// Extracts the resolved path identifier of the action's own resource,
/// deserialized into the handler's key type.
#[derive(Debug)]
pub struct Id<T>(pub T);

impl<T: DeserializeOwned + Send> FromInvocation for Id<T> {
    type Error = ExecuteError;

    fn from_invocation(invocation: &Invocation) -> Result<Self, Self::Error> {
        let identifier = invocation
            .identifier()
            .ok_or(WiringError::NoPathIdentifier)?;
        let value = identifier.typed().map_err(|source| WiringError::IdentifierShape {
            resource: Arc::from(identifier.resource()),
            source,
        })?;
        Ok(Id(value))
    }

    fn param() -> Param {
        Param::Identifier
    }
}

impl<T> Deref for Id<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Extracts the resolved parent identifier of a nested resource.
#[derive(Debug)]
pub struct ParentId<T>(pub T);

impl<T: DeserializeOwned + Send> FromInvocation for ParentId<T> {
    type Error = ExecuteError;

    fn from_invocation(invocation: &Invocation) -> Result<Self, Self::Error> {
        let identifier = invocation.parent().ok_or(WiringError::NoPathIdentifier)?;
        let value = identifier.typed().map_err(|source| WiringError::IdentifierShape {
            resource: Arc::from(identifier.resource()),
            source,
        })?;
        Ok(ParentId(value))
    }

    fn param() -> Param {
        Param::ParentIdentifier
    }
}

impl<T> Deref for ParentId<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
