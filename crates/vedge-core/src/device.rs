// ── HTTP binding of the gateway traits ──

use serde_json::Value;
use tracing::debug;
use vedge_api::{BrokerClient, Record, Schema, TransportConfig};

use crate::config::{DeviceConfig, LoginDetails};
use crate::session::{Connector, DeviceApi};

/// Connects to brokers over HTTPS with a fixed transport configuration.
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    transport: TransportConfig,
}

impl HttpConnector {
    pub fn new(transport: TransportConfig) -> Self {
        Self { transport }
    }

    pub fn from_config(config: &DeviceConfig) -> Self {
        Self::new(config.transport())
    }
}

impl Connector for HttpConnector {
    type Api = BrokerClient;

    async fn connect(&self, login: &LoginDetails) -> Result<BrokerClient, vedge_api::Error> {
        let base_url = self.transport.base_url(&login.address)?;
        debug!(%base_url, username = %login.username, "connecting");
        let client = BrokerClient::new(base_url, &self.transport)?;
        client.login(&login.username, &login.password).await?;
        Ok(client)
    }
}

impl DeviceApi for BrokerClient {
    async fn probe_cluster(&self) -> Result<(), vedge_api::Error> {
        self.cluster_info().await.map(|_| ())
    }

    async fn list_ports(&self, schema: Schema) -> Result<Vec<Record>, vedge_api::Error> {
        BrokerClient::list_ports(self, schema).await
    }

    async fn get_port(&self, schema: Schema, key: &str) -> Result<Record, vedge_api::Error> {
        BrokerClient::get_port(self, schema, key).await
    }

    async fn modify_port(
        &self,
        schema: Schema,
        key: &str,
        body: &Record,
    ) -> Result<(), vedge_api::Error> {
        BrokerClient::modify_port(self, schema, key, body).await
    }

    async fn list_filters(&self, schema: Schema) -> Result<Vec<Record>, vedge_api::Error> {
        BrokerClient::list_filters(self, schema).await
    }

    async fn get_filter(&self, schema: Schema, key: &str) -> Result<Record, vedge_api::Error> {
        BrokerClient::get_filter(self, schema, key).await
    }

    async fn create_filter(&self, schema: Schema, body: &Record) -> Result<Value, vedge_api::Error> {
        BrokerClient::create_filter(self, schema, body).await
    }

    async fn delete_filter(&self, schema: Schema, key: &str) -> Result<(), vedge_api::Error> {
        BrokerClient::delete_filter(self, schema, key).await
    }

    async fn logout(&self) -> Result<(), vedge_api::Error> {
        BrokerClient::logout(self).await
    }
}
