//! Scripted executor for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{HttpExecutor, Transport};

struct Reply {
    gate: Option<oneshot::Receiver<()>>,
    outcome: Result<HttpResponse, TransportError>,
}

/// Hands out queued replies in order and records every request it sees.
#[derive(Default)]
pub(crate) struct StubExecutor {
    replies: Mutex<VecDeque<Reply>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl StubExecutor {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn reply(&self, status: u16, body: &str) {
        self.push(None, Ok(HttpResponse::new(status, body)));
    }

    pub(crate) fn fail(&self, error: TransportError) {
        self.push(None, Err(error));
    }

    /// Queue a reply that is held back until the returned sender fires.
    pub(crate) fn reply_later(&self, status: u16, body: &str) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.push(Some(gate), Ok(HttpResponse::new(status, body)));
        release
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }

    fn push(&self, gate: Option<oneshot::Receiver<()>>, outcome: Result<HttpResponse, TransportError>) {
        self.replies.lock().unwrap().push_back(Reply { gate, outcome });
    }
}

#[async_trait]
impl HttpExecutor for StubExecutor {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let reply = {
            self.seen.lock().unwrap().push(request);
            self.replies.lock().unwrap().pop_front()
        };
        let Some(reply) = reply else {
            return Err(TransportError::Unreachable("no stubbed reply left".to_string()));
        };
        if let Some(gate) = reply.gate {
            let _ = gate.await;
        }
        reply.outcome
    }
}

pub(crate) fn stub_transport(stub: &Arc<StubExecutor>) -> Transport {
    Transport::new("http://localhost:8000/api", stub.clone())
}
