//! Adapter from async command handlers to the synchronous dispatch seam.

use std::rc::Rc;

use command_form_contract::{DispatchOutcome, RunHandler, RunRequest, ValidationError};
use futures::future::LocalBoxFuture;

/// Wraps an async handler into a [`RunHandler`]. The returned handler reports
/// [`DispatchOutcome::Pending`] immediately and completes through the request's `done`
/// callback once the future resolves on the local executor.
pub fn run_handler_from_future<F>(handler: F) -> RunHandler
where
    F: Fn(Vec<String>) -> LocalBoxFuture<'static, Result<(), ValidationError>> + 'static,
{
    Rc::new(move |request: RunRequest| {
        let RunRequest { tokens, done } = request;
        let future = handler(tokens);
        leptos::spawn_local(async move {
            done(future.await);
        });
        DispatchOutcome::Pending
    })
}
