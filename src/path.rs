use std::ops::Deref;
use std::sync::Arc;

// Route parameter names used when deriving route patterns from
// resource descriptors.
pub(crate) const ID_PARAM: &str = "id";
pub(crate) const PARENT_PARAM: &str = "parentId";

/// Arguments captured from the matched route pattern.
#[derive(Debug, Clone, Default)]
pub struct PathArgs(pub(crate) Vec<(Arc<str>, String)>);

impl PathArgs {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| &**key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl Deref for PathArgs {
    type Target = Vec<(Arc<str>, String)>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'k, 'v> From<matchit::Params<'k, 'v>> for PathArgs {
    fn from(params: matchit::Params) -> PathArgs {
        let params: Vec<(Arc<str>, String)> = params
            .iter()
            .map(|(k, v)| (Arc::from(k), String::from(v)))
            .collect();

        PathArgs(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_looks_up_arguments_by_name() {
        let args = PathArgs(vec![
            (Arc::from(ID_PARAM), String::from("42")),
            (Arc::from(PARENT_PARAM), String::from("7")),
        ]);
        assert_eq!(args.get("id"), Some("42"));
        assert_eq!(args.get("parentId"), Some("7"));
        assert_eq!(args.get("missing"), None);
    }

    #[test]
    fn it_captures_matched_route_parameters() {
        let mut router = matchit::Router::new();
        router.insert("/books/{id}", ()).unwrap();

        let matched = router.at("/books/42").unwrap();
        let args = PathArgs::from(matched.params);
        assert_eq!(args.get("id"), Some("42"));
    }
}
