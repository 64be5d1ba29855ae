//! HTTP client for one BMC

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::error::{RedfishError, Result};
use crate::types::{Collection, EthernetInterface, FirmwareInventory, TaskHandle};

/// Default per-request timeout when the caller does not set one
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);

/// Redfish service root path under the BMC host
const SERVICE_ROOT: &str = "/redfish/v1";

/// Connection configuration for one BMC
#[derive(Debug, Clone)]
pub struct RedfishConfig {
    /// Service base URL, e.g. `https://bmc.example.com/redfish/v1`
    pub base_url: String,
    /// Basic-auth username
    pub username: String,
    /// Basic-auth password
    pub password: String,
    /// Skip TLS verification (self-signed BMC certs)
    pub insecure: bool,
    /// Per-request timeout
    pub timeout: Duration,
}

impl RedfishConfig {
    /// Create a config from an explicit service base URL
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            insecure: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a config for a BMC host or address, using HTTPS and the
    /// standard service root
    pub fn for_host(
        host: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(format!("https://{host}{SERVICE_ROOT}"), username, password)
    }

    /// Allow insecure TLS (self-signed certs)
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for one BMC.
///
/// Holds only transport configuration; no session state survives between
/// calls. Cloning is cheap (the underlying connection pool is shared).
#[derive(Debug, Clone)]
pub struct RedfishClient {
    http: reqwest::Client,
    config: RedfishConfig,
}

impl RedfishClient {
    /// Build a client for the configured BMC
    pub fn new(config: RedfishConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout);
        if config.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build()?;
        Ok(Self { http, config })
    }

    /// The configured service base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Reduce a member's odata id to a path relative to the service base.
    ///
    /// BMCs report members either as absolute URLs or as service-rooted
    /// paths; both collapse to the same relative form.
    fn relative<'a>(&self, path: &'a str) -> &'a str {
        let path = path.strip_prefix(&self.config.base_url).unwrap_or(path);
        path.strip_prefix(SERVICE_ROOT).unwrap_or(path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, self.relative(path));
        debug!(%url, "redfish GET");
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RedfishError::Status {
                path: path.to_string(),
                status,
                body: body.trim().to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| RedfishError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// Resolve the first system resource path under `/Systems`.
    ///
    /// An empty collection is a protocol error: a BMC that manages no
    /// systems cannot tell us anything about boot interfaces.
    pub async fn first_system_path(&self) -> Result<String> {
        let systems: Collection = self.get_json("/Systems").await?;
        let first = systems.members.first().ok_or(RedfishError::NoSystems)?;
        Ok(self.relative(&first.odata_id).to_string())
    }

    /// List the ethernet interfaces of one system, fetching each member.
    ///
    /// All-or-nothing: any member fetch failure fails the whole call, so
    /// callers never act on a partial interface view.
    pub async fn list_ethernet_interfaces(
        &self,
        system_path: &str,
    ) -> Result<Vec<EthernetInterface>> {
        let collection: Collection = self
            .get_json(&format!("{}/EthernetInterfaces", self.relative(system_path)))
            .await?;

        let mut interfaces = Vec::with_capacity(collection.members.len());
        for member in &collection.members {
            let nic: EthernetInterface = self.get_json(&member.odata_id).await?;
            interfaces.push(nic);
        }
        Ok(interfaces)
    }

    /// Fetch one firmware-inventory resource, e.g.
    /// `/redfish/v1/UpdateService/FirmwareInventory/BMC`
    pub async fn firmware_inventory(&self, target: &str) -> Result<FirmwareInventory> {
        self.get_json(target).await
    }

    /// Submit a SimpleUpdate action.
    ///
    /// Success is any 2xx acceptance (typically 202); task completion is
    /// not polled. `protocol` and `targets` are omitted from the request
    /// when empty.
    pub async fn simple_update(
        &self,
        image_uri: &str,
        protocol: &str,
        targets: &[String],
    ) -> Result<TaskHandle> {
        let path = "/UpdateService/Actions/UpdateService.SimpleUpdate";
        let url = format!("{}{}", self.config.base_url, path);

        let mut body = json!({ "ImageURI": image_uri });
        if !protocol.is_empty() {
            body["TransferProtocol"] = json!(protocol);
        }
        if !targets.is_empty() {
            body["Targets"] = json!(targets);
        }

        debug!(%url, image_uri, "redfish SimpleUpdate");
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RedfishError::Status {
                path: path.to_string(),
                status,
                body: body.trim().to_string(),
            });
        }

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(TaskHandle { location })
    }
}
