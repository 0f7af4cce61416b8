// Port endpoints
//
// `/api/ports` on a standalone chassis, `/api/cte_ports` on a cluster.
// Single-port lookups accept either the identifier or the port name.

use tracing::debug;

use crate::client::BrokerClient;
use crate::error::Error;
use crate::models::Record;
use crate::schema::Schema;

impl BrokerClient {
    /// List all ports (summary records: identifier and name).
    ///
    /// `GET /api/{ports}`
    pub async fn list_ports(&self, schema: Schema) -> Result<Vec<Record>, Error> {
        let url = self.api_url(schema.ports_path())?;
        debug!(%schema, "listing ports");
        self.get(url).await
    }

    /// Fetch the full record of one port.
    ///
    /// `GET /api/{ports}/{key}`
    pub async fn get_port(&self, schema: Schema, key: &str) -> Result<Record, Error> {
        let url = self.resource_url(schema.ports_path(), key)?;
        debug!(%schema, key, "fetching port");
        self.get(url).await
    }

    /// Apply a partial update to one port.
    ///
    /// `PUT /api/{ports}/{key}`
    pub async fn modify_port(&self, schema: Schema, key: &str, body: &Record) -> Result<(), Error> {
        let url = self.resource_url(schema.ports_path(), key)?;
        debug!(%schema, key, "modifying port");
        self.put(url, body).await
    }
}
