use crate::errors::{AppError, AppResult};
use crate::sync::payload::SyncPayload;
use std::time::Duration;

/// Result of one delivery attempt.
///
/// `Delivered` only means the request went out and the endpoint answered
/// with a success status; the response body is never inspected, so the
/// core cannot tell "accepted" from "silently dropped".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    TransportFailed(String),
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered)
    }
}

/// Outbound port to the webhook.
pub trait Transport {
    fn send(&self, endpoint: &str, payload: &SyncPayload) -> Delivery;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, endpoint: &str, payload: &SyncPayload) -> Delivery {
        (**self).send(endpoint, payload)
    }
}

/// JSON over HTTP POST with a bounded request time.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Transport(format!("Cannot build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, endpoint: &str, payload: &SyncPayload) -> Delivery {
        let response = match self.client.post(endpoint).json(payload).send() {
            Ok(r) => r,
            Err(e) => return Delivery::TransportFailed(format!("HTTP request failed: {}", e)),
        };

        let status = response.status();
        if !status.is_success() {
            return Delivery::TransportFailed(format!("HTTP {}", status));
        }

        Delivery::Delivered
    }
}
