use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Url};
use tokio::time::Instant;

use crate::args::DEFAULT_USER_AGENT;
use crate::engine::{Delivery, Transport};
use crate::error::{HttpError, TransportError};

use super::payload::{Direction, SwipeRequest};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// POSTs swipe bodies as JSON to `{server_url}/swipe/{direction}/`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    left_url: Url,
    right_url: Url,
}

impl ReqwestTransport {
    /// Validates `server_url` and builds a pooled client.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is not an absolute http(s) URL or the
    /// client cannot be built.
    pub fn new(server_url: &str, deadline: Duration) -> Result<Self, HttpError> {
        let base = Url::parse(server_url).map_err(|err| HttpError::InvalidUrl {
            url: server_url.to_owned(),
            source: err,
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(HttpError::UnsupportedScheme {
                url: server_url.to_owned(),
            });
        }
        if base.host_str().is_none() {
            return Err(HttpError::MissingHost {
                url: server_url.to_owned(),
            });
        }

        let left_url = swipe_url(server_url, Direction::Left)?;
        let right_url = swipe_url(server_url, Direction::Right)?;

        let client = Client::builder()
            .timeout(deadline)
            .connect_timeout(CONNECT_TIMEOUT.min(deadline))
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|err| HttpError::BuildClientFailed { source: err })?;

        Ok(Self {
            client,
            left_url,
            right_url,
        })
    }

    #[must_use]
    pub const fn endpoint(&self, direction: Direction) -> &Url {
        match direction {
            Direction::Left => &self.left_url,
            Direction::Right => &self.right_url,
        }
    }
}

#[async_trait]
impl Transport<SwipeRequest> for ReqwestTransport {
    async fn send(
        &self,
        payload: &SwipeRequest,
        deadline: Duration,
    ) -> Result<Delivery, TransportError> {
        let start = Instant::now();
        let response = self
            .client
            .post(self.endpoint(payload.direction).clone())
            .timeout(deadline)
            .json(&payload.body)
            .send()
            .await
            .map_err(|err| classify(&err, deadline))?;
        let status = response.status().as_u16();
        drain_response_body(response)
            .await
            .map_err(|err| classify(&err, deadline))?;

        Ok(Delivery {
            status,
            elapsed: start.elapsed(),
        })
    }
}

fn swipe_url(server_url: &str, direction: Direction) -> Result<Url, HttpError> {
    let joined = format!(
        "{}/swipe/{}/",
        server_url.trim_end_matches('/'),
        direction.as_str()
    );
    Url::parse(&joined).map_err(|err| HttpError::InvalidUrl {
        url: joined,
        source: err,
    })
}

fn classify(err: &reqwest::Error, deadline: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout { deadline }
    } else if err.is_connect() {
        TransportError::Connect {
            message: err.to_string(),
        }
    } else {
        TransportError::Request {
            message: err.to_string(),
        }
    }
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
