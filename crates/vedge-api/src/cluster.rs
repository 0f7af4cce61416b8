// Clustering capability probe

use tracing::debug;

use crate::client::BrokerClient;
use crate::error::Error;
use crate::schema::CLUSTER_PATH;

impl BrokerClient {
    /// Fetch the cluster description.
    ///
    /// `GET /api/cte_cluster`. Standalone chassis reject the request, so
    /// success alone tells the caller the device is clustered.
    pub async fn cluster_info(&self) -> Result<serde_json::Value, Error> {
        let url = self.api_url(CLUSTER_PATH)?;
        debug!("probing clustering capability");
        self.get(url).await
    }
}
