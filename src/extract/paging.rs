use std::convert::Infallible;
use std::ops::Deref;

use super::FromInvocation;
use crate::action::Param;
use crate::invocation::Invocation;
use crate::page::Pagination;

/// Extracts the request's pagination parameters.
///
/// Always available; requests that carry none get the defaults.
#[derive(Debug, Clone, Copy)]
pub struct Paging(pub Pagination);

impl FromInvocation for Paging {
    type Error = Infallible;

    fn from_invocation(invocation: &Invocation) -> Result<Self, Self::Error> {
        Ok(Paging(invocation.pagination()))
    }

    fn param() -> Param {
        Param::Pagination
    }
}

impl Deref for Paging {
    type Target = Pagination;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_is_always_available() {
        let invocation = Invocation {
            pagination: Pagination::new(3, 10),
            ..Invocation::empty()
        };

        let Paging(pagination) = Paging::from_invocation(&invocation).unwrap();
        assert_eq!(pagination, Pagination::new(3, 10));
    }

    #[test]
    fn it_defaults_when_the_request_carries_none() {
        let Paging(pagination) = Paging::from_invocation(&Invocation::empty()).unwrap();
        assert_eq!(pagination, Pagination::default());
    }
}
