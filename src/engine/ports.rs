use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::error::TransportError;

/// A response as seen by the engine: status line and time on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub status: u16,
    pub elapsed: Duration,
}

/// Produces one request body per task token.
pub trait PayloadGenerator: Send + Sync {
    type Payload: Send + Sync;

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Payload;
}

/// Sends one payload and reports the response status.
#[async_trait]
pub trait Transport<P: Sync>: Send + Sync {
    /// Sends `payload`, giving up once `deadline` has elapsed.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no response could be obtained.
    async fn send(&self, payload: &P, deadline: Duration) -> Result<Delivery, TransportError>;
}
