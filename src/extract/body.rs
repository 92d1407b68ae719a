use std::ops::Deref;

use serde::de::DeserializeOwned;

use super::FromInvocation;
use crate::action::Param;
use crate::errors::{ExecuteError, RequestError};
use crate::form::DecodeError;
use crate::invocation::Invocation;

/// Extracts the decoded request body, deserialized into the handler's
/// input type.
///
/// The body has already passed through the action's form decoder by the
/// time this runs; the schema was fixed at registration time.
#[derive(Debug)]
pub struct Body<T>(pub T);

impl<T: DeserializeOwned + Send> FromInvocation for Body<T> {
    type Error = ExecuteError;

    fn from_invocation(invocation: &Invocation) -> Result<Self, Self::Error> {
        let value = invocation.body().ok_or(RequestError::MissingBody)?;
        let value = serde_json::from_value(value.clone())
            .map_err(|e| RequestError::Decode(DecodeError::custom(e)))?;
        Ok(Body(value))
    }

    fn param() -> Param {
        Param::Body
    }
}

impl<T> Deref for Body<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
