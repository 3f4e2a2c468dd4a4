use std::{fmt::Display, sync::Arc, time::Duration};

use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::debug;

use crate::error::RoutingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Plan,
    LiveUpdate,
    Isochrone,
}

impl Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestKind::Plan => write!(f, "plan"),
            RequestKind::LiveUpdate => write!(f, "live_update"),
            RequestKind::Isochrone => write!(f, "isochrone"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome<T> {
    Completed(T),
    /// A newer request of the same kind replaced this one. Its result, if any, is stale.
    Superseded,
}

impl<T> RequestOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            RequestOutcome::Completed(value) => Some(value),
            RequestOutcome::Superseded => None,
        }
    }
}

pub type FetchFn<P, R> = Arc<dyn Fn(P) -> BoxFuture<'static, Result<R, RoutingError>> + Send + Sync>;

type Responder<R> = oneshot::Sender<Result<RequestOutcome<R>, RoutingError>>;

struct PendingRequest<P, R> {
    params: P,
    responder: Responder<R>,
}

struct Slot<P, R> {
    active: bool,
    pending: Option<PendingRequest<P, R>>,
}

/// At most one active and one pending request, the most recent submission wins.
///
/// A submission while a request is active takes the pending slot and resolves any
/// request it displaces as `Superseded`. When the active request finishes with a
/// pending request waiting, its result is stale: its caller gets `Superseded` and
/// the pending request is dispatched instead. Failures are not retried.
pub struct LatestWinsQueue<P, R> {
    kind: RequestKind,
    fetch: FetchFn<P, R>,
    timeout: Duration,
    slot: Arc<Mutex<Slot<P, R>>>,
}

impl<P, R> Clone for LatestWinsQueue<P, R> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            fetch: Arc::clone(&self.fetch),
            timeout: self.timeout,
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<P, R> LatestWinsQueue<P, R>
where
    P: Send + 'static,
    R: Send + 'static,
{
    pub fn new(kind: RequestKind, fetch: FetchFn<P, R>, timeout: Duration) -> Self {
        Self {
            kind,
            fetch,
            timeout,
            slot: Arc::new(Mutex::new(Slot {
                active: false,
                pending: None,
            })),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.slot.lock().active
    }

    pub fn has_pending(&self) -> bool {
        self.slot.lock().pending.is_some()
    }

    pub async fn submit(&self, params: P) -> Result<RequestOutcome<R>, RoutingError> {
        let (responder, receiver) = oneshot::channel();
        let request = PendingRequest { params, responder };

        let dispatch = {
            let mut slot = self.slot.lock();
            if slot.active {
                if let Some(replaced) = slot.pending.replace(request) {
                    debug!(kind = %self.kind, "Replacing pending request");
                    let _ = replaced.responder.send(Ok(RequestOutcome::Superseded));
                }
                None
            } else {
                slot.active = true;
                Some(request)
            }
        };

        if let Some(request) = dispatch {
            tokio::spawn(self.clone().drive(request));
        } else {
            debug!(kind = %self.kind, "Request queued behind active request");
        }

        // The driver always answers, a dropped responder only happens on runtime shutdown.
        receiver.await.unwrap_or(Ok(RequestOutcome::Superseded))
    }

    async fn drive(self, mut request: PendingRequest<P, R>) {
        loop {
            debug!(kind = %self.kind, "Dispatching request");

            let result = match tokio::time::timeout(self.timeout, (self.fetch)(request.params)).await
            {
                Ok(result) => result,
                Err(_) => Err(RoutingError::Timeout(self.timeout)),
            };

            let next = {
                let mut slot = self.slot.lock();
                let next = slot.pending.take();
                if next.is_none() {
                    slot.active = false;
                }
                next
            };

            match next {
                Some(next) => {
                    debug!(kind = %self.kind, "Discarding stale result");
                    let _ = request.responder.send(Ok(RequestOutcome::Superseded));
                    request = next;
                }
                None => {
                    if let Err(error) = &result {
                        debug!(kind = %self.kind, %error, "Request failed");
                    }
                    let _ = request.responder.send(result.map(RequestOutcome::Completed));
                    return;
                }
            }
        }
    }
}
