use crate::config::GatewaySettings;
use crate::domain::payment::{PaymentRequest, ProcessingReceipt};
use crate::domain::ports::TransactionGateway;
use crate::domain::transaction::{TransactionHandle, TransactionOutcome};
use crate::error::{PollError, Result, SubmissionError};
use crate::interfaces::api::process::{
    DEFAULT_REJECTION_MESSAGE, PROCESS_PATH, ProcessPayload, ProcessResponse,
};
use crate::interfaces::api::status::{StatusResponse, status_path};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

/// Talks to the remote processor over HTTP/JSON.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(settings: &GatewaySettings) -> Result<Self> {
        let base = Url::parse(&settings.base_url)?;
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl TransactionGateway for HttpGateway {
    async fn process(
        &self,
        request: &PaymentRequest,
    ) -> std::result::Result<ProcessingReceipt, SubmissionError> {
        let payload = ProcessPayload::try_from(request)
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;
        info!(
            brand = payload.marca.code(),
            amount = %payload.monto,
            deferred = payload.interes_diferido,
            installments = ?payload.cuotas,
            "submitting transaction"
        );

        let response = self
            .client
            .post(self.url(PROCESS_PATH))
            .json(&payload)
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // the message is optional, an unreadable body still counts as a rejection
            let body = response.json::<ProcessResponse>().await.unwrap_or_default();
            warn!(%status, message = ?body.mensaje, "processor rejected the transaction");
            return Err(SubmissionError::Rejected(
                body.mensaje
                    .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string()),
            ));
        }

        let body = response
            .json::<ProcessResponse>()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;
        debug!(?body, "processor accepted the transaction");
        Ok(body.into())
    }

    async fn status(
        &self,
        handle: &TransactionHandle,
    ) -> std::result::Result<TransactionOutcome, PollError> {
        let response = self
            .client
            .get(self.url(&status_path(handle.id())))
            .send()
            .await
            .map_err(|e| PollError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PollError::Status(response.status().as_u16()));
        }

        let body = response
            .json::<StatusResponse>()
            .await
            .map_err(|e| PollError::Transport(e.to_string()))?;
        Ok(body.outcome())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: &str) -> GatewaySettings {
        GatewaySettings {
            base_url: base_url.to_string(),
            request_timeout_ms: 1000,
        }
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(HttpGateway::new(&settings("not a url")).is_err());
    }

    #[test]
    fn test_joins_paths_without_double_slash() {
        let gateway = HttpGateway::new(&settings("http://processor.local:8080/")).unwrap();
        assert_eq!(
            gateway.url(PROCESS_PATH),
            "http://processor.local:8080/v1/procesamiento-transaccion/procesar"
        );
    }
}
