use std::ops::Deref;

use super::FromInvocation;
use crate::action::Param;
use crate::errors::{ExecuteError, WiringError};
use crate::invocation::Invocation;
use crate::provider::TypeToken;

/// Extracts a request-scoped context value of type `T` from the
/// provider registry.
///
/// A missing provider is a wiring bug, not a user error; it fails
/// loudly and is caught up front by
/// [validate](crate::manager::ActionManager::validate).
#[derive(Debug)]
pub struct Provided<T>(pub T);

impl<T: Send + 'static> FromInvocation for Provided<T> {
    type Error = ExecuteError;

    fn from_invocation(invocation: &Invocation) -> Result<Self, Self::Error> {
        invocation
            .providers()
            .get::<T>()
            .map(Provided)
            .ok_or_else(|| WiringError::MissingProvider(TypeToken::of::<T>()).into())
    }

    fn param() -> Param {
        Param::Provided(TypeToken::of::<T>())
    }
}

impl<T> Deref for Provided<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
