//! The two ways the payment page reaches the payment endpoint: over http, the
//! way a browser would, or by calling the in-process [PaymentProcessor].

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    api::payment::PaymentProcessor,
    models::payment::{PaymentErrorBody, PaymentFailure, PaymentRequest, PaymentSuccess},
};

/// Posts the request as json to an external payment endpoint
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPaymentGateway {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

/// Message of a non 2xx body, the generic failure text when the body has none
pub fn failure_from_error_body(body: &[u8]) -> PaymentFailure {
    serde_json::from_slice::<PaymentErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .map(PaymentFailure::new)
        .unwrap_or_default()
}

#[async_trait]
impl super::PaymentGateway for HttpPaymentGateway {
    async fn process_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentSuccess, PaymentFailure> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                logfire::error!(
                    "payment endpoint request failed: {error}",
                    error = e.to_string()
                );
                PaymentFailure::default()
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.bytes().await.unwrap_or_default();
            logfire::warn!(
                "payment endpoint answered {status}",
                status = status.to_string()
            );
            return Err(failure_from_error_body(&body));
        }

        response.json::<PaymentSuccess>().await.map_err(|e| {
            logfire::error!(
                "payment endpoint success body couldnt be parsed: {error}",
                error = e.to_string()
            );
            PaymentFailure::default()
        })
    }
}

/// Calls the endpoint logic directly, used when no external endpoint is configured
pub struct LocalPaymentGateway {
    processor: Arc<PaymentProcessor>,
}

impl LocalPaymentGateway {
    pub fn new(processor: Arc<PaymentProcessor>) -> Self {
        Self { processor }
    }
}

#[async_trait]
impl super::PaymentGateway for LocalPaymentGateway {
    async fn process_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentSuccess, PaymentFailure> {
        self.processor
            .process(request)
            .await
            .map(PaymentSuccess::from)
            .map_err(|e| PaymentFailure::new(e.to_string()))
    }
}
