use std::sync::Arc;

use futures_util::StreamExt;
use reqwest::{Client, Method, Response, header::CONTENT_TYPE};
use tokio::time::Instant;
use tracing::debug;

use crate::domain::{HttpMethod, RequestBody, RequestHeader, RunConfiguration};
use crate::error::{ConfigError, RequestError};
use crate::metrics::RequestOutcome;

use super::client::build_client;
use super::timing::PhaseProbe;

/// Request parts shared by every exchange of a run.
#[derive(Debug)]
struct RequestTemplate {
    method: Method,
    header: Option<RequestHeader>,
    body: Option<RequestBody>,
}

impl RequestTemplate {
    fn from_config(config: &RunConfiguration) -> Self {
        let method = match config.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
        };
        Self {
            method,
            header: config.header.clone(),
            body: config.body.clone(),
        }
    }
}

/// Executes single HTTP exchanges and breaks each one down by phase.
///
/// Each instrumentor owns its client and probe; it must not be shared
/// between concurrently running exchanges.
#[derive(Debug)]
pub struct RequestInstrumentor {
    client: Client,
    probe: Arc<PhaseProbe>,
    template: Arc<RequestTemplate>,
}

impl RequestInstrumentor {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(config: &RunConfiguration) -> Result<Self, ConfigError> {
        let probe = PhaseProbe::new();
        let client = build_client(config, &probe)?;
        Ok(Self {
            client,
            probe,
            template: Arc::new(RequestTemplate::from_config(config)),
        })
    }

    /// Another instrumentor for the same run, with its own client and probe.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn sibling(&self, config: &RunConfiguration) -> Result<Self, ConfigError> {
        let probe = PhaseProbe::new();
        let client = build_client(config, &probe)?;
        Ok(Self {
            client,
            probe,
            template: Arc::clone(&self.template),
        })
    }

    /// Runs one exchange against `url`. Never retries and never fails: errors
    /// are folded into an outcome with `succeeded = false`.
    pub async fn execute(&self, url: &str) -> RequestOutcome {
        self.probe.reset();
        let started = Instant::now();

        let response = match self.build_request(url).send().await {
            Ok(response) => response,
            Err(err) => {
                let error = RequestError::from_transport(err, self.probe.dns_failed());
                debug!("{} ({})", error, url);
                return RequestOutcome::failed(started.elapsed());
            }
        };
        let headers_received = started.elapsed();
        let status = response.status();

        let transfer_started = Instant::now();
        let drained = drain_body(response).await;
        let content_transfer = transfer_started.elapsed();
        let total = started.elapsed();

        let dns_lookup = self.probe.dns();
        let connect = self.probe.connect().max(dns_lookup);
        let outcome = RequestOutcome {
            dns_lookup,
            tcp_connect: connect.saturating_sub(dns_lookup),
            server_processing: headers_received.saturating_sub(connect),
            content_transfer,
            total,
            succeeded: false,
        };

        if let Err(err) = drained {
            debug!("{} ({})", RequestError::Body { source: err }, url);
            return outcome;
        }
        if !(status.is_success() || status.is_redirection()) {
            debug!(
                "{} ({})",
                RequestError::Status {
                    code: status.as_u16()
                },
                url
            );
            return outcome;
        }

        RequestOutcome {
            succeeded: true,
            ..outcome
        }
    }

    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let template = &self.template;
        let mut request = self.client.request(template.method.clone(), url);
        if let Some(header) = template.header.as_ref() {
            request = request.header(header.name.as_str(), header.value.as_str());
        }
        if let Some(body) = template.body.as_ref() {
            request = request
                .header(CONTENT_TYPE, body.content_type.as_str())
                .body(body.bytes.clone());
        }
        request
    }
}

async fn drain_body(response: Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut received: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        received = received.saturating_add(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
    }
    Ok(received)
}
