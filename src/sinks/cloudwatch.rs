use std::time::SystemTime;

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{SignableBody, SignableRequest, SigningSettings, sign};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;

use crate::error::{AppError, AppResult, SinkError};
use crate::metrics::ResultMetrics;

use super::config::CloudWatchSettings;
use super::format::metric_values;

const SERVICE: &str = "monitoring";
const API_VERSION: &str = "2010-08-01";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Static AWS credentials and region read from the environment.
#[derive(Clone)]
pub struct AwsCredentials {
    pub access_key: String,
    pub secret_key: String,
    pub session_token: Option<String>,
    pub region: String,
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key", &self.access_key)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl AwsCredentials {
    /// Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN`
    /// and `AWS_REGION` (falling back to `AWS_DEFAULT_REGION`).
    ///
    /// # Errors
    ///
    /// Returns an error naming the first required variable that is unset.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let missing =
            |key: &'static str| AppError::sink(SinkError::CloudWatchCredentials { missing: key });

        let access_key =
            present("AWS_ACCESS_KEY_ID").ok_or_else(|| missing("AWS_ACCESS_KEY_ID"))?;
        let secret_key =
            present("AWS_SECRET_ACCESS_KEY").ok_or_else(|| missing("AWS_SECRET_ACCESS_KEY"))?;
        let region = present("AWS_REGION")
            .or_else(|| present("AWS_DEFAULT_REGION"))
            .ok_or_else(|| missing("AWS_REGION"))?;
        let session_token = present("AWS_SESSION_TOKEN");
        Ok(Self {
            access_key,
            secret_key,
            session_token,
            region,
        })
    }
}

/// Regional CloudWatch query-API endpoint.
#[must_use]
pub fn endpoint_for(region: &str) -> String {
    format!("https://{}.{}.amazonaws.com/", SERVICE, region)
}

/// Form body of a `PutMetricData` call carrying one datum per exported value,
/// each tagged with a `URL` dimension.
#[must_use]
pub fn put_metric_data_form(
    namespace: &str,
    metrics: &ResultMetrics,
    timestamp: DateTime<Utc>,
) -> String {
    let timestamp = timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut form = url::form_urlencoded::Serializer::new(String::new());
    form.append_pair("Action", "PutMetricData")
        .append_pair("Version", API_VERSION)
        .append_pair("Namespace", namespace);

    for (index, (name, value)) in metric_values(metrics).into_iter().enumerate() {
        let prefix = format!("MetricData.member.{}", index.saturating_add(1));
        form.append_pair(&format!("{}.MetricName", prefix), name)
            .append_pair(&format!("{}.Value", prefix), &value.to_string())
            .append_pair(&format!("{}.Unit", prefix), unit_for(name))
            .append_pair(&format!("{}.Timestamp", prefix), &timestamp)
            .append_pair(&format!("{}.Dimensions.member.1.Name", prefix), "URL")
            .append_pair(
                &format!("{}.Dimensions.member.1.Value", prefix),
                &metrics.base_url,
            );
    }
    form.finish()
}

fn unit_for(name: &str) -> &'static str {
    if name.ends_with("_ms") {
        "Milliseconds"
    } else if name == "requests_per_second" {
        "Count/Second"
    } else {
        "Count"
    }
}

/// Publishes `metrics` to CloudWatch with credentials from the environment.
///
/// # Errors
///
/// Returns an error when credentials are missing, signing fails, or
/// CloudWatch rejects the call.
pub async fn push_cloudwatch(
    client: &Client,
    settings: &CloudWatchSettings,
    metrics: &ResultMetrics,
) -> AppResult<()> {
    let credentials = AwsCredentials::from_env()?;
    let endpoint = endpoint_for(&credentials.region);
    put_metric_data(client, &endpoint, &credentials, settings, metrics).await
}

/// Signs and sends one `PutMetricData` call to `endpoint`.
///
/// # Errors
///
/// Returns an error when signing fails or CloudWatch answers non-2xx.
pub async fn put_metric_data(
    client: &Client,
    endpoint: &str,
    credentials: &AwsCredentials,
    settings: &CloudWatchSettings,
    metrics: &ResultMetrics,
) -> AppResult<()> {
    let body = put_metric_data_form(&settings.namespace, metrics, Utc::now());
    let signed_headers = sign_request(endpoint, credentials, body.as_bytes())?;

    let response = client
        .post(endpoint)
        .headers(signed_headers)
        .body(body)
        .send()
        .await
        .map_err(|err| AppError::sink(SinkError::PushCloudWatch { source: err }))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::sink(SinkError::CloudWatchStatus {
            code: status.as_u16(),
            body,
        }));
    }
    tracing::info!(
        "Published {} metrics to CloudWatch namespace {}",
        metric_values(metrics).len(),
        settings.namespace
    );
    Ok(())
}

/// Headers (content type, SigV4 authorization and dates) for a POST of
/// `body` to `endpoint`.
fn sign_request(
    endpoint: &str,
    credentials: &AwsCredentials,
    body: &[u8],
) -> AppResult<http::HeaderMap> {
    let sign_error = |source: Box<dyn std::error::Error + Send + Sync>| {
        AppError::sink(SinkError::CloudWatchSign { source })
    };

    let identity: Identity = Credentials::new(
        credentials.access_key.as_str(),
        credentials.secret_key.as_str(),
        credentials.session_token.clone(),
        None,
        "cassowary",
    )
    .into();
    let signing_params = v4::SigningParams::builder()
        .identity(&identity)
        .region(credentials.region.as_str())
        .name(SERVICE)
        .time(SystemTime::now())
        .settings(SigningSettings::default())
        .build()
        .map_err(|err| sign_error(Box::new(err)))?
        .into();

    let headers = [("content-type", FORM_CONTENT_TYPE)];
    let signable = SignableRequest::new(
        "POST",
        endpoint,
        headers.iter().copied(),
        SignableBody::Bytes(body),
    )
    .map_err(|err| sign_error(Box::new(err)))?;

    let (instructions, _signature) = sign(signable, &signing_params)
        .map_err(|err| sign_error(Box::new(err)))?
        .into_parts();

    let mut http_req = http::Request::builder().method("POST").uri(endpoint);
    for (key, value) in headers {
        http_req = http_req.header(key, value);
    }
    let mut http_req = http_req
        .body(())
        .map_err(|err| sign_error(Box::new(err)))?;
    instructions.apply_to_request_http1x(&mut http_req);

    Ok(http_req.headers().clone())
}
