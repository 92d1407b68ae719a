use std::any::Any;
use std::fmt;
use std::sync::Arc;

struct Anonymous;

/// Opaque request credentials, extracted by the transport layer.
///
/// The engine never inspects credentials itself; it only hands them to
/// permission predicates. Hosts that need typed access inside a
/// predicate use [`Credentials::get`].
#[derive(Clone)]
pub struct Credentials(Arc<dyn Any + Send + Sync>);

impl Credentials {
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Credentials(Arc::new(value))
    }

    pub fn anonymous() -> Self {
        Credentials(Arc::new(Anonymous))
    }

    pub fn is_anonymous(&self) -> bool {
        self.0.downcast_ref::<Anonymous>().is_some()
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Credentials::anonymous()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_anonymous() {
            f.write_str("Credentials(anonymous)")
        } else {
            f.write_str("Credentials(..)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct User(&'static str);

    #[test]
    fn it_defaults_to_anonymous() {
        let credentials = Credentials::default();
        assert!(credentials.is_anonymous());
        assert!(credentials.get::<User>().is_none());
    }

    #[test]
    fn it_gives_typed_access_to_the_wrapped_value() {
        let credentials = Credentials::new(User("anna"));
        assert!(!credentials.is_anonymous());
        assert_eq!(credentials.get::<User>(), Some(&User("anna")));
        assert!(credentials.get::<String>().is_none());
    }
}
