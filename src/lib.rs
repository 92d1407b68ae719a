#![cfg_attr(docsrs, feature(doc_cfg))]
//! apiary exposes domain models as hypermedia-driven HTTP actions.
//!
//! Resource authors register handler functions of varying arity
//! against collection, item and nested resources; at request time the
//! engine resolves (method, path) to exactly one action, binds every
//! parameter the handler declared, enforces the action's permission
//! predicate and invokes it, producing a canonical
//! [ResultEnvelope](envelope::ResultEnvelope) for the serialization
//! layer to render.
//!
//! This library's handler API is heavily inspired by
//! [Axum's](https://docs.rs/axum/latest/axum/).
//!
//! # Features
//!
//! - Declarative handlers. Actions access identifiers, bodies,
//!   pagination and request-scoped services through
//!   [extractors](extract); arity and typing are checked by the
//!   compiler.
//! - One registry. The [ActionManager](manager::ActionManager) owns
//!   every action, resolves requests against the resource hierarchy
//!   and exposes the action table to documentation layers.
//! - Typed identifiers. Path segments become tagged
//!   [Identifiers](Identifier) through per-resource converters;
//!   mismatched identifier types never reach a handler.
//! - Opaque guards. Actions whose permission predicate rejects the
//!   caller are indistinguishable from actions that do not exist.
//! - Observable execution. Each invocation runs under a
//!   [tracing](https://crates.io/crates/tracing) span that records the
//!   pipeline phase.
//!
//! # Registering and serving actions
//!
//! ```rust
//! use apiary::extract::{Body, Id, Paging};
//! use apiary::form::{Field, FieldKind, Form, FormSpec};
//! use apiary::manager::ActionManager;
//! use apiary::routes::{CollectionRoutes, ItemRoutes};
//! use apiary::{identifier, Method, PageItems, Request};
//! use serde::Deserialize;
//! use serde_json::json;
//! use std::convert::Infallible;
//!
//! #[derive(Deserialize)]
//! struct NewBook {
//!     title: String,
//! }
//!
//! async fn list(Paging(paging): Paging) -> Result<PageItems<String>, Infallible> {
//!     let _ = paging.offset();
//!     Ok(PageItems::new(vec!["Dune".into()]).with_total(1))
//! }
//!
//! async fn find(Id(id): Id<i64>) -> Result<String, Infallible> {
//!     Ok(format!("book {id}"))
//! }
//!
//! async fn create(Body(book): Body<NewBook>) -> Result<String, Infallible> {
//!     Ok(book.title)
//! }
//!
//! let form = Form::validating(
//!     FormSpec::new("book").field(Field::required("title", FieldKind::Text)),
//! );
//!
//! let manager = ActionManager::new()
//!     .routes(CollectionRoutes::new("books").getter(list).creator(form, create).build())
//!     .routes(ItemRoutes::new("books").getter(find).build())
//!     .converter("books", identifier::parse::<i64>());
//!
//! # tokio_test::block_on(async {
//! let envelope = manager
//!     .handle(Request::new(Method::Get, "/books/42"))
//!     .await
//!     .unwrap();
//! let single = envelope.as_single().unwrap();
//! assert_eq!(single.value(), &json!("book 42"));
//! # })
//! ```
//!
//! # Wiring
//!
//! Registration happens once at start-up; afterwards the manager is
//! frozen and serves concurrent requests without locking. Context
//! values handlers pull through
//! [Provided](extract::Provided) come from a request-scoped
//! [Providers] registry the transport clones per request, and
//! [validate](manager::ActionManager::validate) checks the whole
//! wiring up front so missing providers or identifier converters fail
//! at start-up instead of on the first request.

pub mod action;
pub mod envelope;
pub mod errors;
pub mod extract;
pub mod form;
pub mod identifier;
pub mod manager;
pub mod routes;

mod credentials;
mod invocation;
mod method;
mod page;
mod path;
mod provider;
mod request;
mod resource;

pub use credentials::Credentials;
pub use identifier::Identifier;
pub use invocation::Invocation;
pub use method::Method;
pub use page::{PageItems, Pagination};
pub use path::PathArgs;
pub use provider::{Providers, TypeToken};
pub use request::Request;
pub use resource::Resource;
