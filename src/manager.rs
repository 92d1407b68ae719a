//! The action registry and its resolve/execute entry points.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use matchit::Router;
use serde_json::Value;
use tracing::{debug, debug_span, error, field, Instrument};

use crate::action::{Action, ActionKey, ActionName, Param, Payload};
use crate::credentials::Credentials;
use crate::envelope::{BatchResult, OperationRef, Page, ResultEnvelope, SingleModel};
use crate::errors::{
    ExecuteError, InvalidWiring, NotFound, NotFoundReason, Phase, RequestError, WiringError,
};
use crate::form::DecodeError;
use crate::identifier::{Converters, Identifier, IdentifierConverter};
use crate::invocation::Invocation;
use crate::method::Method;
use crate::path::{PathArgs, ID_PARAM, PARENT_PARAM};
use crate::provider::Providers;
use crate::request::Request;
use crate::resource::Resource;

/// Outcome of resolution: the matched action plus its captured path
/// arguments.
pub struct Resolved<'a> {
    pub(crate) action: &'a Action,
    pub(crate) args: PathArgs,
}

impl std::fmt::Debug for Resolved<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolved")
            .field("action", self.action.key())
            .field("args", &self.args)
            .finish()
    }
}

impl Resolved<'_> {
    pub fn action(&self) -> &Action {
        self.action
    }

    pub fn key(&self) -> &ActionKey {
        self.action.key()
    }

    pub fn args(&self) -> &PathArgs {
        &self.args
    }
}

/// Registry and resolver for every registered action.
///
/// Registration happens during application start-up on a single
/// thread; afterwards the manager is frozen and serves concurrent
/// `resolve`/`execute` calls without locking. There is no shared
/// mutable state between requests.
#[derive(Default)]
pub struct ActionManager {
    table: BTreeMap<ActionKey, Arc<Action>>,
    router: Router<HashMap<Method, ActionKey>>,
    converters: Converters,
}

impl ActionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every action produced by a route builder.
    pub fn routes(self, actions: Vec<Action>) -> Self {
        actions.into_iter().fold(self, ActionManager::register)
    }

    /// Register one action.
    ///
    /// Registering two actions with the same (method, resource, name)
    /// key is a build-time error and panics before any request is
    /// served.
    pub fn register(self, action: Action) -> Self {
        let Self {
            mut table,
            mut router,
            converters,
        } = self;

        let key = action.key().clone();
        if table.contains_key(&key) {
            panic!("cannot register action '{key}', a previous registration exists");
        }

        let route = key.route();

        // Remove the route from the router if it exists or start a new
        // method map if it doesn't
        let mut methods = router.remove(route.as_str()).unwrap_or_default();
        if let Some(previous) = methods.insert(key.method(), key.clone()) {
            panic!("cannot register action '{key}' at route '{route}', it is already served by '{previous}'");
        }

        // (re)insert the method map, we should not have conflicts here
        router.insert(route, methods).expect("route should be valid");
        table.insert(key, Arc::new(action));

        Self {
            table,
            router,
            converters,
        }
    }

    /// Register the identifier converter for a resource type.
    pub fn converter(
        self,
        resource: impl Into<Arc<str>>,
        converter: impl IdentifierConverter,
    ) -> Self {
        let Self {
            table,
            router,
            mut converters,
        } = self;
        converters.insert(resource.into(), converter);
        Self {
            table,
            router,
            converters,
        }
    }

    /// Start-up wiring check: every declared context type must have a
    /// provider and every identifier-bearing action a converter.
    ///
    /// Call this with the provider template before serving; the report
    /// lists every missing piece, not just the first.
    pub fn validate(&self, providers: &Providers) -> Result<(), InvalidWiring> {
        fn push(problems: &mut Vec<WiringError>, seen: &mut HashSet<String>, problem: WiringError) {
            if seen.insert(problem.to_string()) {
                problems.push(problem);
            }
        }

        let mut problems = Vec::new();
        let mut seen = HashSet::new();
        for (key, action) in &self.table {
            if let Some(resource) = key.resource().identifier_resource() {
                if !self.converters.contains(resource) {
                    push(
                        &mut problems,
                        &mut seen,
                        WiringError::MissingIdentifierMapper(resource.clone()),
                    );
                }
            }
            if let Some(parent) = key.resource().parent_resource() {
                if !self.converters.contains(parent) {
                    push(
                        &mut problems,
                        &mut seen,
                        WiringError::MissingIdentifierMapper(parent.clone()),
                    );
                }
            }
            for param in action.params() {
                match param {
                    Param::Provided(token) if !providers.contains(token) => {
                        push(&mut problems, &mut seen, WiringError::MissingProvider(*token));
                    }
                    Param::Identifier if key.resource().identifier_resource().is_none() => {
                        push(&mut problems, &mut seen, WiringError::NoPathIdentifier);
                    }
                    Param::ParentIdentifier if key.resource().parent_resource().is_none() => {
                        push(&mut problems, &mut seen, WiringError::NoPathIdentifier);
                    }
                    _ => {}
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            error!(problems = problems.len(), "action wiring is invalid");
            Err(InvalidWiring(problems))
        }
    }

    /// Resolve (method, path) to a registered action.
    ///
    /// An unknown path, an unsupported method on an existing resource,
    /// and a guarded action whose permission predicate rejects the
    /// credentials all surface as the same opaque [NotFound].
    pub fn resolve(
        &self,
        method: Method,
        path: &str,
        credentials: &Credentials,
    ) -> Result<Resolved<'_>, NotFound> {
        let matched = self
            .router
            .at(path)
            .map_err(|_| NotFound::new(NotFoundReason::UnknownRoute))?;
        let args = PathArgs::from(matched.params);

        let key = matched.value.get(&method).ok_or_else(|| {
            debug!(path, %method, "resource exists but method is unsupported");
            NotFound::new(NotFoundReason::MethodNotAllowed)
        })?;
        let action = self
            .table
            .get(key)
            .map(|action| &**action)
            .expect("registered route should have a backing action");

        // Screen guarded actions here so a rejected predicate is
        // indistinguishable from the route not existing
        if let Some(predicate) = action.permission() {
            let identifier = self.peek_identifier(action, &args)?;
            if !predicate(credentials, identifier.as_ref()) {
                debug!(action = %key, "permission denied, reporting not found");
                return Err(NotFound::new(NotFoundReason::PermissionDenied));
            }
        }

        Ok(Resolved { action, args })
    }

    /// Execute a resolved action against a request, producing the
    /// result envelope.
    ///
    /// Runs the invocation pipeline: parameter binding, permission
    /// check, handler invocation, enveloping. Any step may fail
    /// terminally; nothing is retried.
    pub async fn execute(
        &self,
        resolved: &Resolved<'_>,
        request: Request,
    ) -> Result<ResultEnvelope, ExecuteError> {
        let action = resolved.action;
        let span = debug_span!("execute", operation = %action.key(), phase = field::Empty);

        let result: Result<ResultEnvelope, ExecuteError> = async {
            span.record("phase", Phase::Binding.as_str());
            let Request {
                body,
                providers,
                credentials,
                pagination,
                identifier,
                parent,
                ..
            } = request;
            let identifier = self.bind_identifier(action, &resolved.args, identifier)?;
            let parent = self.bind_parent(action, &resolved.args, parent)?;
            let body = self.bind_body(action, body)?;

            span.record("phase", Phase::Permission.as_str());
            if !action.permitted(&credentials, identifier.as_ref()) {
                debug!("permission denied, folding into not found");
                return Err(NotFound::new(NotFoundReason::PermissionDenied).into());
            }

            span.record("phase", Phase::Invoking.as_str());
            let invocation = Invocation {
                providers,
                credentials,
                pagination,
                identifier,
                parent,
                body,
            };
            let payload = action.invoke(&invocation).await?;

            span.record("phase", Phase::Enveloping.as_str());
            let envelope = self.envelope(action, payload, &invocation);
            span.record("phase", Phase::Done.as_str());
            Ok(envelope)
        }
        .instrument(span.clone())
        .await;

        if let Err(err) = &result {
            if err.is_wiring() {
                error!(action = %action.key(), error = %err, "configuration error during execution");
            } else {
                debug!(action = %action.key(), phase = %err.phase(), error = %err, "request failed");
            }
        }

        result
    }

    /// Resolve and execute in one call.
    pub async fn handle(&self, request: Request) -> Result<ResultEnvelope, ExecuteError> {
        let resolved = self.resolve(request.method, &request.path, &request.credentials)?;
        self.execute(&resolved, request).await
    }

    /// Every registered action, in key order; the descriptor surface
    /// for the documentation/serialization layer.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.table.values().map(|action| &**action)
    }

    /// Actions annotated as hypermedia entry points.
    pub fn entry_points(&self) -> impl Iterator<Item = &Action> {
        self.actions()
            .filter(|action| action.annotations().is_entry_point())
    }

    // Convert the path segment for predicate screening during
    // resolution. A missing converter is ignored here; execution
    // surfaces it as a loud wiring error.
    fn peek_identifier(
        &self,
        action: &Action,
        args: &PathArgs,
    ) -> Result<Option<Identifier>, NotFound> {
        let Some(resource) = action.key().resource().identifier_resource() else {
            return Ok(None);
        };
        let Some(segment) = args.get(ID_PARAM) else {
            return Ok(None);
        };
        let Some(converter) = self.converters.get(resource) else {
            return Ok(None);
        };
        match converter.convert(segment) {
            Some(value) => Ok(Some(Identifier::from_value(resource.clone(), value))),
            None => Err(NotFound::new(NotFoundReason::InvalidIdentifier)),
        }
    }

    fn bind_identifier(
        &self,
        action: &Action,
        args: &PathArgs,
        supplied: Option<Identifier>,
    ) -> Result<Option<Identifier>, ExecuteError> {
        let Some(resource) = action.key().resource().identifier_resource() else {
            return Ok(None);
        };
        self.bind(resource, args.get(ID_PARAM), supplied)
    }

    fn bind_parent(
        &self,
        action: &Action,
        args: &PathArgs,
        supplied: Option<Identifier>,
    ) -> Result<Option<Identifier>, ExecuteError> {
        let Some(resource) = action.key().resource().parent_resource() else {
            return Ok(None);
        };
        self.bind(resource, args.get(PARENT_PARAM), supplied)
    }

    fn bind(
        &self,
        resource: &Arc<str>,
        segment: Option<&str>,
        supplied: Option<Identifier>,
    ) -> Result<Option<Identifier>, ExecuteError> {
        // A supplied identifier instance must carry the expected
        // resource type tag
        if let Some(identifier) = supplied {
            if identifier.resource() != &**resource {
                return Err(RequestError::IdentifierTypeMismatch {
                    actual: Arc::from(identifier.resource()),
                    expected: resource.clone(),
                }
                .into());
            }
            return Ok(Some(identifier));
        }

        let Some(segment) = segment else {
            return Ok(None);
        };
        let converter = self
            .converters
            .get(resource)
            .ok_or_else(|| WiringError::MissingIdentifierMapper(resource.clone()))?;
        let value = converter
            .convert(segment)
            .ok_or_else(|| NotFound::new(NotFoundReason::InvalidIdentifier))?;
        Ok(Some(Identifier::from_value(resource.clone(), value)))
    }

    fn bind_body(&self, action: &Action, body: Option<Value>) -> Result<Option<Value>, ExecuteError> {
        let Some(form) = action.form_full() else {
            // actions without a form pass the raw body through
            return Ok(body);
        };
        let Some(body) = body else {
            return Err(RequestError::MissingBody.into());
        };

        // Batch creators take a list body; the form applies to every
        // element
        let decoded = if *action.key().name() == ActionName::BatchCreate {
            let elements = body
                .as_array()
                .ok_or(RequestError::Decode(DecodeError::NotAList))?;
            let decoded = elements
                .iter()
                .map(|element| form.decode(element))
                .collect::<Result<Vec<_>, _>>()
                .map_err(RequestError::Decode)?;
            Value::Array(decoded)
        } else {
            form.decode(&body).map_err(RequestError::Decode)?
        };

        Ok(Some(decoded))
    }

    fn envelope(&self, action: &Action, payload: Payload, invocation: &Invocation) -> ResultEnvelope {
        let resource = action.key().resource().name().clone();
        match payload {
            Payload::Model(value) => {
                let operations = self.operations(
                    |candidate| matches!(candidate.resource(), Resource::Item(name) if *name == resource),
                    action.key(),
                    invocation,
                );
                ResultEnvelope::SingleModel(SingleModel {
                    resource,
                    value,
                    operations,
                })
            }
            Payload::Items { items, total } => {
                // pages advertise the other actions of the same
                // collection scope, e.g. the creator
                let operations = self.operations(
                    |candidate| candidate.resource() == action.key().resource(),
                    action.key(),
                    invocation,
                );
                ResultEnvelope::Page(Page {
                    resource,
                    items,
                    pagination: invocation.pagination,
                    total,
                    operations,
                })
            }
            Payload::Ids(values) => ResultEnvelope::Batch(BatchResult {
                identifiers: values
                    .into_iter()
                    .map(|value| Identifier::from_value(resource.clone(), value))
                    .collect(),
                resource,
            }),
            Payload::Done => ResultEnvelope::NoContent,
        }
    }

    // Follow-up operations: sibling actions on the same resource whose
    // permission predicates currently pass, in operation-name order.
    fn operations(
        &self,
        sibling: impl Fn(&ActionKey) -> bool,
        current: &ActionKey,
        invocation: &Invocation,
    ) -> Vec<OperationRef> {
        let mut operations: Vec<OperationRef> = self
            .table
            .iter()
            .filter(|(key, _)| *key != current && sibling(key))
            .filter(|(_, action)| {
                action.permitted(&invocation.credentials, invocation.identifier.as_ref())
            })
            .map(|(key, action)| OperationRef {
                name: key.operation(),
                method: key.method(),
                form: action.form().cloned(),
            })
            .collect();
        operations.sort_by(|a, b| a.name.cmp(&b.name));
        operations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Body, Id, Paging};
    use crate::form::{Field, FieldKind, Form, FormSpec};
    use crate::identifier;
    use crate::page::PageItems;
    use crate::routes::{CollectionRoutes, CustomRoute, ItemRoutes};
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;
    use std::convert::Infallible;

    async fn list(Paging(paging): Paging) -> Result<PageItems<i64>, Infallible> {
        Ok(PageItems::new(vec![paging.offset() as i64]).with_total(100))
    }

    async fn find(Id(id): Id<i64>) -> Result<i64, Infallible> {
        Ok(id)
    }

    #[derive(Debug, Deserialize)]
    struct BookPatch {
        title: String,
    }

    async fn update(Id(id): Id<i64>, Body(patch): Body<BookPatch>) -> Result<String, Infallible> {
        Ok(format!("{}:{}", id, patch.title))
    }

    async fn remove(Id(_): Id<i64>) -> Result<(), Infallible> {
        Ok(())
    }

    fn title_form() -> Form {
        Form::validating(FormSpec::new("book").field(Field::required("title", FieldKind::Text)))
    }

    fn books() -> ActionManager {
        ActionManager::new()
            .routes(CollectionRoutes::new("books").getter(list).build())
            .routes(
                ItemRoutes::new("books")
                    .getter(find)
                    .updater(title_form(), update)
                    .remover(remove)
                    .build(),
            )
            .converter("books", identifier::parse::<i64>())
    }

    #[test]
    fn resolution_is_idempotent() {
        let manager = books();
        let credentials = Credentials::anonymous();

        let first = manager.resolve(Method::Get, "/books/42", &credentials).unwrap();
        let second = manager.resolve(Method::Get, "/books/42", &credentials).unwrap();
        assert_eq!(first.key(), second.key());
    }

    #[test]
    fn unknown_paths_and_unsupported_methods_are_distinguishable_internally() {
        let manager = books();
        let credentials = Credentials::anonymous();

        let err = manager
            .resolve(Method::Get, "/missing", &credentials)
            .unwrap_err();
        assert_eq!(err.reason(), NotFoundReason::UnknownRoute);

        let err = manager
            .resolve(Method::Post, "/books/42", &credentials)
            .unwrap_err();
        assert_eq!(err.reason(), NotFoundReason::MethodNotAllowed);
    }

    #[test]
    fn rejected_identifiers_do_not_resolve_guarded_routes() {
        let manager = ActionManager::new()
            .routes(
                ItemRoutes::new("books")
                    .route(
                        CustomRoute::new("archive", Method::Post)
                            .with_permission(|_, _| true),
                        find,
                    )
                    .build(),
            )
            .converter("books", identifier::parse::<i64>());

        let err = manager
            .resolve(Method::Post, "/books/not-a-number/archive", &Credentials::anonymous())
            .unwrap_err();
        assert_eq!(err.reason(), NotFoundReason::InvalidIdentifier);
    }

    #[test]
    #[should_panic]
    fn it_fails_on_duplicate_action_keys() {
        ActionManager::new()
            .routes(ItemRoutes::new("books").getter(find).build())
            .routes(ItemRoutes::new("books").getter(find).build());
    }

    #[test]
    fn validation_reports_every_missing_piece() {
        #[derive(Clone)]
        struct Library;

        async fn with_library(
            Id(id): Id<i64>,
            _library: crate::extract::Provided<Library>,
        ) -> Result<i64, Infallible> {
            Ok(id)
        }

        let manager =
            ActionManager::new().routes(ItemRoutes::new("books").getter(with_library).build());

        let report = manager.validate(&Providers::new()).unwrap_err();
        let problems: Vec<String> = report.problems().iter().map(|p| p.to_string()).collect();
        assert_eq!(report.problems().len(), 2);
        assert!(problems.iter().any(|p| p.contains("identifier converter")));
        assert!(problems.iter().any(|p| p.contains("Library")));

        let manager = manager.converter("books", identifier::parse::<i64>());
        assert!(manager
            .validate(&Providers::new().provide(Library))
            .is_ok());
    }

    #[tokio::test]
    async fn execution_folds_denied_permissions_into_not_found() {
        let manager = ActionManager::new()
            .routes(
                ItemRoutes::new("books")
                    .route(
                        CustomRoute::new("archive", Method::Post)
                            .with_permission(|_, _| false),
                        find,
                    )
                    .build(),
            )
            .converter("books", identifier::parse::<i64>());

        let err = manager
            .handle(Request::new(Method::Post, "/books/42/archive"))
            .await
            .unwrap_err();
        let ExecuteError::NotFound(not_found) = err else {
            panic!("expected a not found error");
        };
        assert_eq!(not_found.reason(), NotFoundReason::PermissionDenied);
    }

    #[tokio::test]
    async fn a_missing_converter_fails_loudly_at_execution() {
        let manager = ActionManager::new().routes(ItemRoutes::new("books").getter(find).build());

        let err = manager
            .handle(Request::new(Method::Get, "/books/42"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExecuteError::Wiring(WiringError::MissingIdentifierMapper(_))
        ));
    }

    #[tokio::test]
    async fn write_actions_require_a_body() {
        let manager = books();

        let err = manager
            .handle(Request::new(Method::Put, "/books/42"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExecuteError::BadRequest(RequestError::MissingBody)
        ));
    }

    #[tokio::test]
    async fn decoded_bodies_reach_the_handler() {
        let manager = books();

        let envelope = manager
            .handle(
                Request::new(Method::Put, "/books/42").with_body(json!({"title": "Dune"})),
            )
            .await
            .unwrap();
        let single = envelope.as_single().unwrap();
        assert_eq!(single.value(), &json!("42:Dune"));
    }

    #[tokio::test]
    async fn undecodable_bodies_are_bad_requests() {
        let manager = books();

        let err = manager
            .handle(Request::new(Method::Put, "/books/42").with_body(json!({"title": 7})))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExecuteError::BadRequest(RequestError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn removers_produce_no_content() {
        let manager = books();

        let envelope = manager
            .handle(Request::new(Method::Delete, "/books/42"))
            .await
            .unwrap();
        assert_eq!(envelope, ResultEnvelope::NoContent);
    }

    #[tokio::test]
    async fn single_models_attach_permitted_sibling_operations() {
        let manager = books();

        let envelope = manager
            .handle(Request::new(Method::Get, "/books/42"))
            .await
            .unwrap();
        let single = envelope.as_single().unwrap();

        let names: Vec<&str> = single.operations().iter().map(|op| op.name()).collect();
        assert_eq!(names, vec!["books/delete", "books/update"]);

        // the updater advertises its form
        let update = &single.operations()[1];
        assert_eq!(update.method(), Method::Put);
        assert_eq!(update.form().unwrap().title(), "book");
    }

    #[tokio::test]
    async fn pages_echo_the_request_pagination() {
        let manager = books();

        let envelope = manager
            .handle(
                Request::new(Method::Get, "/books")
                    .with_pagination(crate::page::Pagination::new(3, 10)),
            )
            .await
            .unwrap();
        let page = envelope.as_page().unwrap();

        assert_eq!(page.resource(), "books");
        assert_eq!(page.items(), &[json!(20)]);
        assert_eq!(page.total(), Some(100));
        assert_eq!(page.pagination().page(), 3);
    }
}
