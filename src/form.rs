use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

/// The kinds of values a form field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Boolean,
    Object,
    List,
}

impl FieldKind {
    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Object => value.is_object(),
            FieldKind::List => value.is_array(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Object => "object",
            FieldKind::List => "list",
        };
        f.write_str(name)
    }
}

/// One declared form field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: Arc<str>,
    kind: FieldKind,
    required: bool,
}

impl Field {
    pub fn required(name: impl Into<Arc<str>>, kind: FieldKind) -> Self {
        Field {
            name: name.into(),
            kind,
            required: true,
        }
    }

    pub fn optional(name: impl Into<Arc<str>>, kind: FieldKind) -> Self {
        Field {
            name: name.into(),
            kind,
            required: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Declarative description of a write action's request body.
///
/// Fixed at registration and reused for every request; also exposed to
/// the documentation layer through the action descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSpec {
    title: Arc<str>,
    fields: Vec<Field>,
}

impl FormSpec {
    pub fn new(title: impl Into<Arc<str>>) -> Self {
        FormSpec {
            title: title.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(self, field: Field) -> Self {
        let FormSpec { title, mut fields } = self;
        fields.push(field);
        FormSpec { title, fields }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

/// A request body failed to decode against its form.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("request body must be a JSON list")]
    NotAList,

    #[error("missing required field `{0}`")]
    MissingField(Arc<str>),

    #[error("field `{field}` is not a valid {expected}")]
    WrongKind { field: Arc<str>, expected: FieldKind },

    #[error("{0}")]
    Message(String),
}

impl DecodeError {
    pub fn custom(message: impl fmt::Display) -> Self {
        DecodeError::Message(message.to_string())
    }
}

/// Turns a raw request body into the typed value described by a form.
///
/// The stock implementation is [`Form::validating`]; hosts may inject
/// any decoder, e.g. one backed by a schema library.
pub trait BodyDecoder: Send + Sync + 'static {
    fn decode(&self, body: &Value) -> Result<Value, DecodeError>;
}

impl<F> BodyDecoder for F
where
    F: Fn(&Value) -> Result<Value, DecodeError> + Send + Sync + 'static,
{
    fn decode(&self, body: &Value) -> Result<Value, DecodeError> {
        (self)(body)
    }
}

/// A form bundles the declarative spec with the decoder that enforces
/// it.
#[derive(Clone)]
pub struct Form {
    spec: FormSpec,
    decoder: Arc<dyn BodyDecoder>,
}

impl Form {
    pub fn new(spec: FormSpec, decoder: impl BodyDecoder) -> Self {
        Form {
            spec,
            decoder: Arc::new(decoder),
        }
    }

    /// Stock decoder driven by the spec itself: required fields must be
    /// present, declared fields must match their kind, undeclared
    /// fields are dropped from the decoded value.
    pub fn validating(spec: FormSpec) -> Self {
        let check = spec.clone();
        Form::new(spec, move |body: &Value| decode_with_spec(&check, body))
    }

    pub fn spec(&self) -> &FormSpec {
        &self.spec
    }

    pub(crate) fn decode(&self, body: &Value) -> Result<Value, DecodeError> {
        self.decoder.decode(body)
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form").field("spec", &self.spec).finish()
    }
}

fn decode_with_spec(spec: &FormSpec, body: &Value) -> Result<Value, DecodeError> {
    let object = body.as_object().ok_or(DecodeError::NotAnObject)?;
    let mut decoded = Map::new();
    for field in spec.fields() {
        match object.get(field.name()) {
            None | Some(Value::Null) => {
                if field.is_required() {
                    return Err(DecodeError::MissingField(field.name().into()));
                }
            }
            Some(value) => {
                if !field.kind().matches(value) {
                    return Err(DecodeError::WrongKind {
                        field: field.name().into(),
                        expected: field.kind(),
                    });
                }
                decoded.insert(field.name().to_string(), value.clone());
            }
        }
    }
    Ok(Value::Object(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn book_form() -> Form {
        Form::validating(
            FormSpec::new("book")
                .field(Field::required("title", FieldKind::Text))
                .field(Field::optional("pages", FieldKind::Number)),
        )
    }

    #[test]
    fn it_accepts_a_matching_body() {
        let decoded = book_form()
            .decode(&json!({"title": "Dune", "pages": 412}))
            .unwrap();
        assert_eq!(decoded, json!({"title": "Dune", "pages": 412}));
    }

    #[test]
    fn it_drops_undeclared_fields() {
        let decoded = book_form()
            .decode(&json!({"title": "Dune", "publisher": "Chilton"}))
            .unwrap();
        assert_eq!(decoded, json!({"title": "Dune"}));
    }

    #[test]
    fn it_rejects_a_missing_required_field() {
        let err = book_form().decode(&json!({"pages": 412})).unwrap_err();
        assert_eq!(err, DecodeError::MissingField("title".into()));
    }

    #[test]
    fn it_rejects_a_wrong_field_kind() {
        let err = book_form().decode(&json!({"title": 42})).unwrap_err();
        assert_eq!(
            err,
            DecodeError::WrongKind {
                field: "title".into(),
                expected: FieldKind::Text,
            }
        );
    }

    #[test]
    fn it_rejects_non_object_bodies() {
        let err = book_form().decode(&json!(["Dune"])).unwrap_err();
        assert_eq!(err, DecodeError::NotAnObject);
    }

    #[test]
    fn null_counts_as_absent() {
        let err = book_form().decode(&json!({"title": null})).unwrap_err();
        assert_eq!(err, DecodeError::MissingField("title".into()));
    }

    #[test]
    fn closures_are_decoders() {
        let form = Form::new(FormSpec::new("raw"), |body: &Value| Ok(body.clone()));
        assert_eq!(form.decode(&json!({"a": 1})).unwrap(), json!({"a": 1}));
    }
}
