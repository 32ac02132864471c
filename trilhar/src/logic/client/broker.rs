use crate::logic::client::url_utils::{build_api_url, entity_attrs_path, entity_path};
use crate::logic::config::BrokerConfig;
use crate::logic::error::BrokerError;
use crate::logic::types::{ENTITY_ID, FIWARE_SERVICE, FIWARE_SERVICE_PATH};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

/// NGSI-v2 attribute carrying a device command
#[derive(Debug, Serialize)]
struct CommandAttribute<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    value: &'a str,
}

/// HTTP access to the study-timer twin on the context broker
#[derive(Clone)]
pub struct BrokerClient {
    http: Client,
    entity_url: String,
    attrs_url: String,
    read_timeout: Duration,
    command_timeout: Duration,
}

impl BrokerClient {
    pub fn new(config: &BrokerConfig) -> Self {
        Self::for_entity(config, ENTITY_ID)
    }

    pub fn for_entity(config: &BrokerConfig, entity_id: &str) -> Self {
        let base = config.base_url.as_deref();
        Self {
            http: Client::new(),
            entity_url: build_api_url(base, &config.host, config.port, &entity_path(entity_id)),
            attrs_url: build_api_url(base, &config.host, config.port, &entity_attrs_path(entity_id)),
            read_timeout: config.read_timeout(),
            command_timeout: config.command_timeout(),
        }
    }

    pub fn entity_url(&self) -> &str {
        &self.entity_url
    }

    fn with_fiware_headers(builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("fiware-service", FIWARE_SERVICE)
            .header("fiware-servicepath", FIWARE_SERVICE_PATH)
    }

    /// Fetch every attribute of the twin as `name -> {type, value}`
    pub async fn fetch_entity(&self) -> Result<Map<String, Value>, BrokerError> {
        let request = self.http.get(&self.entity_url).timeout(self.read_timeout);
        let resp = ensure_success(Self::with_fiware_headers(request).send().await?).await?;

        let body: Value = resp.json().await?;
        match body {
            Value::Object(attributes) => Ok(attributes),
            other => Err(BrokerError::DataShape(format!(
                "expected an entity object, got {}",
                other
            ))),
        }
    }

    /// Partial update writing a single command attribute
    pub async fn send_command_attribute(&self, name: &str, value: &str) -> Result<(), BrokerError> {
        let mut payload = HashMap::new();
        payload.insert(name, CommandAttribute { kind: "command", value });

        let request = self
            .http
            .patch(&self.attrs_url)
            .timeout(self.command_timeout)
            .json(&payload);
        ensure_success(Self::with_fiware_headers(request).send().await?).await?;
        Ok(())
    }
}

async fn ensure_success(resp: Response) -> Result<Response, BrokerError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let error_text = resp
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(BrokerError::Transport(format!(
        "broker responded with status {}: {}",
        status, error_text
    )))
}
