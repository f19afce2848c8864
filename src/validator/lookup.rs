// ABOUTME: Phone line-type lookup - the LineTypeLookup trait and its HTTP client.
// ABOUTME: Queries the phone validation API and extracts PhoneBasic.LineType.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use tracing::instrument;

use crate::config::ValidatorConfig;
use crate::error::ValidatorError;

/// Reported when the API answers without a line type.
pub const UNKNOWN_LINE_TYPE: &str = "Unknown";

/// Resolves a phone number to its line type (mobile, landline, VOIP, ...).
#[async_trait]
pub trait LineTypeLookup: Send + Sync {
    async fn line_type(&self, phone: &str) -> Result<String, ValidatorError>;
}

/// Basic phone search response. Only the line type is read.
///
/// `phone_basic` is `None` when the key is absent and `Some(None)` when the
/// API sent an explicit null.
#[derive(Debug, Default, Deserialize)]
pub struct PhoneSearchResponse {
    #[serde(rename = "PhoneBasic", default, deserialize_with = "present")]
    pub phone_basic: Option<Option<PhoneBasic>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct PhoneBasic {
    #[serde(rename = "PhoneNumber", default)]
    pub phone_number: Option<String>,
    #[serde(rename = "LineType", default)]
    pub line_type: Option<String>,
    #[serde(rename = "PhoneCompany", default)]
    pub phone_company: Option<String>,
}

impl PhoneSearchResponse {
    /// The reported line type, or `"Unknown"` when the API left it out.
    ///
    /// A null `PhoneBasic` object is a malformed answer, not an unknown one.
    pub fn line_type(&self) -> Result<&str, ValidatorError> {
        match &self.phone_basic {
            None => Ok(UNKNOWN_LINE_TYPE),
            Some(None) => Err(ValidatorError::Malformed("PhoneBasic is null".to_string())),
            Some(Some(basic)) => Ok(basic.line_type.as_deref().unwrap_or(UNKNOWN_LINE_TYPE)),
        }
    }
}

/// Client for the phone validation API.
#[derive(Debug, Clone)]
pub struct PhoneValidatorClient {
    api_key: String,
    api_url: String,
    http: reqwest::Client,
}

impl PhoneValidatorClient {
    pub fn new(config: &ValidatorConfig) -> Result<Self, ValidatorError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("realnex-rs/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            http,
        })
    }

    /// Build with a caller-supplied reqwest client.
    pub fn with_client(config: &ValidatorConfig, http: reqwest::Client) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            http,
        }
    }

    /// Run a basic phone search and return the full parsed response.
    pub async fn search(&self, phone: &str) -> Result<PhoneSearchResponse, ValidatorError> {
        let response = self
            .http
            .get(&self.api_url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("phone", phone),
                ("type", "basic"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ValidatorError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl LineTypeLookup for PhoneValidatorClient {
    #[instrument(level = "debug", skip(self))]
    async fn line_type(&self, phone: &str) -> Result<String, ValidatorError> {
        let response = self.search(phone).await?;
        Ok(response.line_type()?.to_string())
    }
}
