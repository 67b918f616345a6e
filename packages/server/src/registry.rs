//! Eureka registration performed once at startup.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::RegistryConfig;

const DEFAULT_DATA_CENTER_CLASS: &str = "com.netflix.appinfo.InstanceInfo$DefaultDataCenterInfo";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("registry rejected registration with status {0}")]
    Rejected(u16),

    #[error("registration did not finish within {0:?}")]
    Timeout(Duration),
}

/// Body of `POST {registry}/apps/{app}`.
#[derive(Debug, Serialize)]
pub struct InstanceEnvelope {
    pub instance: InstanceInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceInfo {
    pub instance_id: String,
    pub host_name: String,
    pub app: String,
    pub ip_addr: String,
    pub status: &'static str,
    pub port: PortInfo,
    pub home_page_url: String,
    pub status_page_url: String,
    pub health_check_url: String,
    pub data_center_info: DataCenterInfo,
}

#[derive(Debug, Serialize)]
pub struct PortInfo {
    #[serde(rename = "$")]
    pub number: u16,
    #[serde(rename = "@enabled")]
    pub enabled: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DataCenterInfo {
    #[serde(rename = "@class")]
    pub class: &'static str,
    pub name: String,
}

/// Announces this instance to the service registry.
pub struct RegistryAnnouncer {
    client: reqwest::Client,
    config: RegistryConfig,
    port: u16,
}

impl RegistryAnnouncer {
    /// `port` is the port the listener actually bound, not necessarily the configured one.
    pub fn new(client: reqwest::Client, config: RegistryConfig, port: u16) -> Self {
        Self {
            client,
            config,
            port,
        }
    }

    fn registration_url(&self) -> String {
        format!(
            "{}/apps/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.app_name
        )
    }

    pub fn instance(&self) -> InstanceEnvelope {
        let cfg = &self.config;
        let base = format!("http://{}:{}", cfg.ip_addr, self.port);

        InstanceEnvelope {
            instance: InstanceInfo {
                instance_id: format!("{}:{}:{}", cfg.app_name, cfg.ip_addr, self.port),
                host_name: cfg.host_name.clone(),
                app: cfg.app_name.clone(),
                ip_addr: cfg.ip_addr.clone(),
                status: "UP",
                port: PortInfo {
                    number: self.port,
                    enabled: "true",
                },
                home_page_url: base.clone(),
                status_page_url: format!("{base}/docs"),
                health_check_url: format!("{base}/docs"),
                data_center_info: DataCenterInfo {
                    class: DEFAULT_DATA_CENTER_CLASS,
                    name: cfg.data_center.clone(),
                },
            },
        }
    }

    /// Send one registration request. No retries.
    pub async fn announce(&self) -> Result<(), RegistryError> {
        let response = self
            .client
            .post(self.registration_url())
            .json(&self.instance())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Rejected(status.as_u16()));
        }
        Ok(())
    }

    /// [`announce`](Self::announce), giving up after `limit`.
    pub async fn announce_within(&self, limit: Duration) -> Result<(), RegistryError> {
        match tokio::time::timeout(limit, self.announce()).await {
            Ok(result) => result,
            Err(_) => Err(RegistryError::Timeout(limit)),
        }
    }

    /// Run [`announce_within`](Self::announce_within) on a detached task using the
    /// configured timeout. The outcome is only logged.
    pub fn spawn(self) -> JoinHandle<()> {
        let limit = Duration::from_secs(self.config.timeout_secs);

        tokio::spawn(async move {
            match self.announce_within(limit).await {
                Ok(()) => info!(
                    app = %self.config.app_name,
                    registry = %self.config.base_url,
                    port = self.port,
                    "Registered with service registry"
                ),
                Err(e) => warn!(
                    app = %self.config.app_name,
                    registry = %self.config.base_url,
                    error = %e,
                    "Service registration failed"
                ),
            }
        })
    }
}
