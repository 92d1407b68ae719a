use serde::Serialize;
use serde_json::Value;

use crate::errors::HandlerError;
use crate::page::PageItems;

/// Conversion of a handler's return value into a single-model payload.
///
/// Implemented for `Result<T, E>` where the model serializes to JSON;
/// handler errors are wrapped opaquely and never retried.
pub trait IntoModel {
    fn into_model(self) -> Result<Value, HandlerError>;
}

impl<T, E> IntoModel for Result<T, E>
where
    T: Serialize,
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_model(self) -> Result<Value, HandlerError> {
        let model = self.map_err(HandlerError::new)?;
        serde_json::to_value(model).map_err(HandlerError::new)
    }
}

/// Conversion of a collection getter's return value into page items.
pub trait IntoItems {
    fn into_items(self) -> Result<(Vec<Value>, Option<u64>), HandlerError>;
}

impl<T, E> IntoItems for Result<PageItems<T>, E>
where
    T: Serialize,
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_items(self) -> Result<(Vec<Value>, Option<u64>), HandlerError> {
        let page = self.map_err(HandlerError::new)?;
        let items = serialize_all(page.items)?;
        Ok((items, page.total))
    }
}

/// A plain `Vec` works too; the total count is then unknown.
impl<T, E> IntoItems for Result<Vec<T>, E>
where
    T: Serialize,
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_items(self) -> Result<(Vec<Value>, Option<u64>), HandlerError> {
        let items = serialize_all(self.map_err(HandlerError::new)?)?;
        Ok((items, None))
    }
}

/// Conversion of a batch creator's return value into the list of
/// created identifier values.
pub trait IntoIds {
    fn into_ids(self) -> Result<Vec<Value>, HandlerError>;
}

impl<T, E> IntoIds for Result<Vec<T>, E>
where
    T: Serialize,
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_ids(self) -> Result<Vec<Value>, HandlerError> {
        serialize_all(self.map_err(HandlerError::new)?)
    }
}

/// Conversion of a remover's return value; removers produce no
/// content.
pub trait IntoUnit {
    fn into_unit(self) -> Result<(), HandlerError>;
}

impl<E> IntoUnit for Result<(), E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_unit(self) -> Result<(), HandlerError> {
        self.map_err(HandlerError::new)
    }
}

fn serialize_all<T: Serialize>(items: Vec<T>) -> Result<Vec<Value>, HandlerError> {
    items
        .into_iter()
        .map(|item| serde_json::to_value(item).map_err(HandlerError::new))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;
    use std::convert::Infallible;
    use thiserror::Error;

    #[derive(Serialize)]
    struct Book {
        title: &'static str,
    }

    #[derive(Debug, Error)]
    #[error("storage unavailable")]
    struct StorageError;

    #[test]
    fn models_serialize_to_json() {
        let result: Result<Book, Infallible> = Ok(Book { title: "Dune" });
        assert_eq!(result.into_model().unwrap(), json!({"title": "Dune"}));
    }

    #[test]
    fn handler_errors_are_wrapped() {
        let result: Result<Book, StorageError> = Err(StorageError);
        let err = result.into_model().unwrap_err();
        assert_eq!(err.to_string(), "storage unavailable");
    }

    #[test]
    fn page_items_keep_their_total() {
        let result: Result<_, Infallible> =
            Ok(PageItems::new(vec![Book { title: "Dune" }]).with_total(12));
        let (items, total) = result.into_items().unwrap();
        assert_eq!(items, vec![json!({"title": "Dune"})]);
        assert_eq!(total, Some(12));
    }

    #[test]
    fn plain_vectors_have_no_total() {
        let result: Result<_, Infallible> = Ok(vec![Book { title: "Dune" }]);
        let (items, total) = result.into_items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(total, None);
    }

    #[test]
    fn batch_ids_serialize_in_order() {
        let result: Result<_, Infallible> = Ok(vec![1, 2, 3]);
        assert_eq!(result.into_ids().unwrap(), vec![json!(1), json!(2), json!(3)]);
    }
}
