use std::future::Future;

use futures::future::{ready, BoxFuture};

use super::Param;
use crate::errors::ExecuteError;
use crate::extract::FromInvocation;
use crate::invocation::Invocation;

/// Trait for async functions that can be registered as action
/// handlers.
///
/// A handler is any async function whose arguments are all
/// [extractors](crate::extract), up to ten of them. Extraction runs in
/// declared order before the handler and short-circuits on the first
/// failure, so a handler body only ever sees fully-bound parameters.
///
/// This is never called directly by library users; the route builders
/// erase handlers into their actions.
pub trait Handler<T, O>: Clone + Send + Sync + 'static {
    /// Extract the declared parameters and run the handler.
    fn call(&self, invocation: &Invocation) -> BoxFuture<'static, Result<O, ExecuteError>>;

    /// Ordered parameter descriptors for the handler's extractor list.
    fn params() -> Vec<Param>;
}

macro_rules! impl_handler {
    (
        $first:ident, $($ty:ident),*
    ) => {
        #[allow(non_snake_case, unused)]
        impl<F, Fut, O, $($ty,)*> Handler<($($ty,)*), O> for F
        where
            F: Fn($($ty,)*) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = O> + Send + 'static,
            O: Send + 'static,
            $($ty: FromInvocation + 'static,)*
        {
            fn call(&self, invocation: &Invocation) -> BoxFuture<'static, Result<O, ExecuteError>> {
                $(
                    let $ty = match $ty::from_invocation(invocation) {
                        Ok(value) => value,
                        Err(failure) => return Box::pin(ready(Err(failure.into()))),
                    };
                )*

                let fut = (self)($($ty,)*);

                Box::pin(async move { Ok(fut.await) })
            }

            fn params() -> Vec<Param> {
                vec![$($ty::param(),)*]
            }
        }
    };
}

impl_handler!(T1,);
impl_handler!(T1, T2);
impl_handler!(T1, T2, T3);
impl_handler!(T1, T2, T3, T4);
impl_handler!(T1, T2, T3, T4, T5);
impl_handler!(T1, T2, T3, T4, T5, T6);
impl_handler!(T1, T2, T3, T4, T5, T6, T7);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11);
