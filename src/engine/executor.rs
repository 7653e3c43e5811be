use std::sync::Arc;
use std::time::Duration;

use crate::error::{AttemptFailure, TransportError};

use super::ports::Transport;

/// Classification of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { status: u16 },
    TransientFailure(TransportError),
    TerminalFailure(AttemptFailure),
}

/// Performs one attempt against the transport under a fixed deadline.
pub struct RequestExecutor<T: ?Sized> {
    transport: Arc<T>,
    deadline: Duration,
    accepted: Arc<[u16]>,
}

impl<T: ?Sized> Clone for RequestExecutor<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            deadline: self.deadline,
            accepted: Arc::clone(&self.accepted),
        }
    }
}

impl<T: ?Sized> RequestExecutor<T> {
    pub fn new(transport: Arc<T>, deadline: Duration, accepted: &[u16]) -> Self {
        Self {
            transport,
            deadline,
            accepted: Arc::from(accepted),
        }
    }

    #[must_use]
    pub fn accepts(&self, status: u16) -> bool {
        self.accepted.contains(&status)
    }

    /// Sends `payload` once and classifies the result.
    ///
    /// The deadline is enforced here as well, so a transport that never
    /// returns still resolves to a transient failure.
    pub async fn execute<P>(&self, payload: &P) -> Outcome
    where
        P: Sync,
        T: Transport<P>,
    {
        let sent = tokio::time::timeout(self.deadline, self.transport.send(payload, self.deadline));
        match sent.await {
            Err(_elapsed) => Outcome::TransientFailure(TransportError::Timeout {
                deadline: self.deadline,
            }),
            Ok(Err(err)) => Outcome::TransientFailure(err),
            Ok(Ok(delivery)) if self.accepts(delivery.status) => Outcome::Success {
                status: delivery.status,
            },
            Ok(Ok(delivery)) => Outcome::TerminalFailure(AttemptFailure::NonSuccessStatus {
                status: delivery.status,
            }),
        }
    }
}
