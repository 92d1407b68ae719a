//! Declarative access to request-scoped values from action handlers.
//!
//! Handlers never receive a raw request; instead they declare the
//! values they need through extractor arguments and the engine binds
//! each one before the handler runs:
//!
//! ```rust
//! use apiary::extract::{Id, Provided};
//!
//! # struct Library;
//! # impl Library {
//! #     fn find(&self, _: i64) -> Result<String, std::convert::Infallible> { Ok("".into()) }
//! # }
//! async fn book(Id(id): Id<i64>, library: Provided<std::sync::Arc<Library>>)
//!     -> Result<String, std::convert::Infallible>
//! {
//!     library.find(id)
//! }
//! ```
//!
//! Extraction happens in declared order and short-circuits on the
//! first failure; a failed extraction never reaches the handler.

mod body;
mod id;
mod paging;
mod provided;

pub use body::Body;
pub use id::{Id, ParentId};
pub use paging::Paging;
pub use provided::Provided;

use crate::action::Param;
use crate::errors::ExecuteError;
use crate::invocation::Invocation;

/// Types that can be extracted from an [Invocation].
pub trait FromInvocation: Sized + Send {
    type Error: Into<ExecuteError>;

    fn from_invocation(invocation: &Invocation) -> Result<Self, Self::Error>;

    /// The parameter descriptor this extractor contributes to the
    /// action's declared parameter list.
    fn param() -> Param;
}
