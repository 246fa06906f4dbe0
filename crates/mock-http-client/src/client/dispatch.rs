//! Per-request dispatch: match, settle, release the pending count.
//!
//! Matching happens synchronously when the request is made, so a rule
//! registered afterwards never applies to it. Settlement runs on a spawned
//! task; the caller's [`PendingRequest`] receives the outcome over a oneshot
//! channel. Dropping the `PendingRequest` does not cancel the dispatch.
//!
//! The yield that orders continuations before the count drops assumes the
//! settle task and the awaiting task share one scheduler queue. That holds
//! on a `current_thread` runtime only; on any other flavor the first
//! dispatch of each client logs a warning.

use super::ClientInner;
use crate::error::{ClientError, UnmockedRequestError};
use crate::request::RequestDescriptor;
use crate::resolver::resolve;
use crate::response::Response;
use crate::rule::MockRule;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::Ordering;
use std::task::{Context, Poll};
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::oneshot;
use tracing::{debug, warn, Instrument, Span};

type Outcome = Result<Response, ClientError>;

/// Where a dispatch goes after its descriptor is built.
enum Route {
    Matched(MockRule),
    Unmatched(UnmockedRequestError),
}

pub(super) fn dispatch(inner: &ClientInner, request: RequestDescriptor) -> PendingRequest {
    let Ok(runtime) = Handle::try_current() else {
        return PendingRequest::failed(ClientError::RuntimeUnavailable);
    };
    let flavor = runtime.runtime_flavor();
    if flavor != RuntimeFlavor::CurrentThread
        && !inner.flavor_warned.swap(true, Ordering::Relaxed)
    {
        warn!(
            ?flavor,
            "Mock client dispatching on a multi-threaded runtime; \
             wait_for_pending_requests only drains chained requests on a current_thread runtime"
        );
    }

    let guard = inner.tracker.begin();
    inner.journal.write().push(request.clone());

    let route = match inner.registry.find_match(&request) {
        Some((index, rule)) => {
            debug!(
                method = %request.method,
                url = %request.url,
                rule = index,
                "Matched mock rule"
            );
            Route::Matched(rule)
        }
        None => {
            let err = UnmockedRequestError::new(&request.url, request.method, inner.created_at);
            // One line per failed call, on the caller's span. The rejection's
            // message is logged verbatim; the creation site goes in a field
            // instead of on a second line.
            warn!(created_at = %err.created_at(), "{}", err.message());
            Route::Unmatched(err)
        }
    };

    let (tx, rx) = oneshot::channel();
    runtime.spawn(
        async move {
            let outcome = match route {
                Route::Matched(rule) => resolve(&rule, &request).await,
                Route::Unmatched(err) => Err(err.into()),
            };
            // The receiver may already be gone; the dispatch still settles.
            let _ = tx.send(outcome);

            // Let continuations woken by the send run before releasing the
            // count, so follow-up dispatches they start are counted first.
            tokio::task::yield_now().await;
            drop(guard);
        }
        .instrument(Span::current()),
    );

    PendingRequest::waiting(rx)
}

/// Future returned by every client call.
///
/// Resolves with the mocked [`Response`] or rejects with a [`ClientError`].
#[derive(Debug)]
pub struct PendingRequest {
    state: State,
}

#[derive(Debug)]
enum State {
    Failed(Option<ClientError>),
    Waiting(oneshot::Receiver<Outcome>),
}

impl PendingRequest {
    pub(crate) fn failed(err: ClientError) -> Self {
        Self {
            state: State::Failed(Some(err)),
        }
    }

    fn waiting(rx: oneshot::Receiver<Outcome>) -> Self {
        Self {
            state: State::Waiting(rx),
        }
    }
}

impl Future for PendingRequest {
    type Output = Outcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            State::Failed(err) => Poll::Ready(Err(err.take().unwrap_or(ClientError::Dropped))),
            State::Waiting(rx) => Pin::new(rx)
                .poll(cx)
                .map(|received| received.unwrap_or(Err(ClientError::Dropped))),
        }
    }
}
