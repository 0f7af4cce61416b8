// Filter endpoints
//
// `/api/filters` on a standalone chassis, `/api/cte_filters` on a cluster.

use tracing::debug;

use crate::client::BrokerClient;
use crate::error::Error;
use crate::models::Record;
use crate::schema::Schema;

impl BrokerClient {
    /// List all filters (summary records).
    ///
    /// `GET /api/{filters}`
    pub async fn list_filters(&self, schema: Schema) -> Result<Vec<Record>, Error> {
        let url = self.api_url(schema.filters_path())?;
        debug!(%schema, "listing filters");
        self.get(url).await
    }

    /// Fetch the full record of one filter.
    ///
    /// `GET /api/{filters}/{key}`
    pub async fn get_filter(&self, schema: Schema, key: &str) -> Result<Record, Error> {
        let url = self.resource_url(schema.filters_path(), key)?;
        debug!(%schema, key, "fetching filter");
        self.get(url).await
    }

    /// Create a filter. Returns whatever the device answers (usually the
    /// new identifier), or `Null` for an empty body.
    ///
    /// `POST /api/{filters}`
    pub async fn create_filter(
        &self,
        schema: Schema,
        body: &Record,
    ) -> Result<serde_json::Value, Error> {
        let url = self.api_url(schema.filters_path())?;
        debug!(%schema, "creating filter");
        self.post(url, body).await
    }

    /// Delete one filter.
    ///
    /// `DELETE /api/{filters}/{key}`
    pub async fn delete_filter(&self, schema: Schema, key: &str) -> Result<(), Error> {
        let url = self.resource_url(schema.filters_path(), key)?;
        debug!(%schema, key, "deleting filter");
        self.delete(url).await
    }
}
