//! HTTPS transport backed by `reqwest::blocking`

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::transport::{RuleOutcome, RulesPage, RulesTransport};
use crate::types::{BlockEntry, RemoteRule};

const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Bearer-token authenticated transport against a Cloudflare-style API
pub struct HttpTransport {
    http: Client,
    token: String,
    zone: String,
    api_base: String,
}

impl HttpTransport {
    /// Build a transport for the given credential/zone pair
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(token: impl Into<String>, zone: impl Into<String>) -> Result<Self> {
        Self::with_api_base(token, zone, DEFAULT_API_BASE)
    }

    /// Build a transport pointed at a non-default API base URL
    pub fn with_api_base(
        token: impl Into<String>,
        zone: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("firewall-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            token: token.into(),
            zone: zone.into(),
            api_base: api_base.into(),
        })
    }

    fn zone_url(&self) -> String {
        format!("{}/zones/{}", self.api_base, self.zone)
    }

    fn rules_url(&self) -> String {
        format!("{}/firewall/access_rules/rules", self.zone_url())
    }

    fn check_status(response: Response) -> Result<Response> {
        if response.status() == StatusCode::OK {
            Ok(response)
        } else {
            Err(Error::Status {
                status: response.status().as_u16(),
            })
        }
    }
}

#[derive(Serialize)]
struct RuleConfiguration<'a> {
    target: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct CreateRuleBody<'a> {
    mode: &'a str,
    configuration: RuleConfiguration<'a>,
    notes: &'a str,
}

impl<'a> CreateRuleBody<'a> {
    fn block(ip: &'a str, notes: &'a str) -> Self {
        Self {
            mode: "block",
            configuration: RuleConfiguration {
                target: "ip",
                value: ip,
            },
            notes,
        }
    }
}

#[derive(Serialize)]
struct BatchCreateBody<'a> {
    rules: Vec<CreateRuleBody<'a>>,
}

#[derive(Deserialize)]
struct WireConfiguration {
    #[serde(default)]
    target: String,
    #[serde(default)]
    value: String,
}

#[derive(Deserialize)]
struct WireRule {
    id: String,
    #[serde(default)]
    mode: String,
    configuration: WireConfiguration,
    notes: Option<String>,
}

impl WireRule {
    fn into_remote(self) -> Option<RemoteRule> {
        // Only target=ip rules carry an address we can compare against
        if self.configuration.target != "ip" {
            return None;
        }
        Some(RemoteRule {
            id: self.id,
            ip: self.configuration.value,
            mode: self.mode,
            notes: self.notes,
        })
    }
}

#[derive(Deserialize)]
struct ResultInfo {
    total_pages: u32,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    result: Vec<WireRule>,
    result_info: Option<ResultInfo>,
}

#[derive(Deserialize, Default)]
struct ApiMessage {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct BatchItem {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

#[derive(Deserialize)]
struct BatchResponse {
    #[serde(default)]
    result: Vec<BatchItem>,
}

impl RulesTransport for HttpTransport {
    fn fetch_zone(&self) -> Result<()> {
        debug!(zone = %self.zone, "validating zone");
        let response = self
            .http
            .get(self.zone_url())
            .bearer_auth(&self.token)
            .send()?;
        Self::check_status(response).map(|_| ())
    }

    fn create_rule(&self, ip: &str, notes: &str) -> Result<()> {
        let response = self
            .http
            .post(self.rules_url())
            .bearer_auth(&self.token)
            .json(&CreateRuleBody::block(ip, notes))
            .send()?;
        Self::check_status(response).map(|_| ())
    }

    fn create_rules(&self, entries: &[BlockEntry]) -> Result<Vec<RuleOutcome>> {
        let body = BatchCreateBody {
            rules: entries
                .iter()
                .map(|entry| CreateRuleBody::block(&entry.ip, &entry.reason))
                .collect(),
        };

        let response = self
            .http
            .post(self.rules_url())
            .bearer_auth(&self.token)
            .json(&body)
            .send()?;
        let response = Self::check_status(response)?;

        let parsed: BatchResponse = response
            .json()
            .map_err(|e| Error::Malformed(format!("batch create response: {e}")))?;

        Ok(parsed
            .result
            .into_iter()
            .map(|item| {
                if item.success {
                    RuleOutcome::ok()
                } else {
                    let message = item
                        .errors
                        .first()
                        .map(|m| m.message.clone())
                        .unwrap_or_else(|| "unspecified remote error".to_string());
                    RuleOutcome::failed(message)
                }
            })
            .collect())
    }

    fn find_block_rules(&self, ip: &str) -> Result<Vec<RemoteRule>> {
        let response = self
            .http
            .get(self.rules_url())
            .bearer_auth(&self.token)
            .query(&[
                ("mode", "block"),
                ("configuration.target", "ip"),
                ("configuration.value", ip),
            ])
            .send()?;
        let response = Self::check_status(response)?;

        let parsed: ListResponse = response
            .json()
            .map_err(|e| Error::Malformed(format!("rule lookup response: {e}")))?;

        Ok(parsed
            .result
            .into_iter()
            .filter_map(WireRule::into_remote)
            .collect())
    }

    fn list_rules(&self, page: u32, per_page: u32) -> Result<RulesPage> {
        let response = self
            .http
            .get(self.rules_url())
            .bearer_auth(&self.token)
            .query(&[
                ("mode", "block".to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()?;
        let response = Self::check_status(response)?;

        let parsed: ListResponse = response
            .json()
            .map_err(|e| Error::Malformed(format!("rule listing response: {e}")))?;

        let total_pages = parsed.result_info.map(|info| info.total_pages).unwrap_or(1);

        Ok(RulesPage {
            rules: parsed
                .result
                .into_iter()
                .filter_map(WireRule::into_remote)
                .collect(),
            total_pages,
        })
    }

    fn delete_rule(&self, id: &str) -> Result<()> {
        let response = self
            .http
            .delete(format!("{}/{}", self.rules_url(), id))
            .bearer_auth(&self.token)
            .send()?;
        Self::check_status(response).map(|_| ())
    }
}
