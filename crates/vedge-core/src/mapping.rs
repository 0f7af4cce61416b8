// ── Mapping engine ──
//
// Creates and removes mapping filters between ports. Ports are enabled
// before they take part in a mapping and disabled again once their last
// filter is gone, so a port is enabled exactly while it has memberships.
// Multi-step operations are not rolled back: a failure after some steps
// completed is reported as `PartialMapping` naming the last one.

use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::{CanonicalAddress, DeviceId, FilterRecord, PortRecord};
use crate::port_name;
use crate::session::{Connector, Session};

/// Mapping operations over a session.
pub struct MappingEngine<'a, C: Connector> {
    session: &'a Session<C>,
}

/// Steps completed so far in one operation.
#[derive(Debug, Default)]
struct Progress {
    completed: usize,
    last_step: Option<String>,
}

impl Progress {
    fn step(&mut self, description: String) {
        debug!(step = %description, "completed");
        self.completed += 1;
        self.last_step = Some(description);
    }

    fn into_error(self, err: CoreError) -> CoreError {
        match self.last_step {
            Some(last_step) => CoreError::PartialMapping {
                completed: self.completed,
                last_step,
                source: Box::new(err),
            },
            None => err,
        }
    }
}

impl<'a, C: Connector> MappingEngine<'a, C> {
    pub fn new(session: &'a Session<C>) -> Self {
        Self { session }
    }

    /// Map `source` to every destination, one `PASS_ALL` filter each.
    pub async fn map_unidirectional(
        &self,
        source: &CanonicalAddress,
        dests: &[CanonicalAddress],
    ) -> Result<(), CoreError> {
        info!(%source, dests = dests.len(), "mapping unidirectional");
        let _operation = self.session.exclusive().await;
        let mut progress = Progress::default();
        match self.unidirectional_steps(source, dests, &mut progress).await {
            Ok(()) => Ok(()),
            Err(e) => Err(progress.into_error(e)),
        }
    }

    async fn unidirectional_steps(
        &self,
        source: &CanonicalAddress,
        dests: &[CanonicalAddress],
        progress: &mut Progress,
    ) -> Result<(), CoreError> {
        let src_port = self.resolve(source).await?;
        let src_id = self.enable(&src_port).await?;
        progress.step(format!("enabled {source}"));

        for dest in dests {
            let dst_port = self.resolve(dest).await?;
            let dst_id = self.enable(&dst_port).await?;
            progress.step(format!("enabled {dest}"));

            self.session.create_pass_all_filter(&src_id, &dst_id).await?;
            progress.step(format!("created filter {source} -> {dest}"));
        }
        Ok(())
    }

    /// Map `a` and `b` to each other with two filters.
    pub async fn map_bidirectional(
        &self,
        a: &CanonicalAddress,
        b: &CanonicalAddress,
    ) -> Result<(), CoreError> {
        info!(%a, %b, "mapping bidirectional");
        let _operation = self.session.exclusive().await;
        let mut progress = Progress::default();
        match self.bidirectional_steps(a, b, &mut progress).await {
            Ok(()) => Ok(()),
            Err(e) => Err(progress.into_error(e)),
        }
    }

    async fn bidirectional_steps(
        &self,
        a: &CanonicalAddress,
        b: &CanonicalAddress,
        progress: &mut Progress,
    ) -> Result<(), CoreError> {
        let port_a = self.resolve(a).await?;
        let port_b = self.resolve(b).await?;

        let id_a = self.enable(&port_a).await?;
        progress.step(format!("enabled {a}"));
        let id_b = self.enable(&port_b).await?;
        progress.step(format!("enabled {b}"));

        self.session.create_pass_all_filter(&id_a, &id_b).await?;
        progress.step(format!("created filter {a} -> {b}"));
        self.session.create_pass_all_filter(&id_b, &id_a).await?;
        progress.step(format!("created filter {b} -> {a}"));
        Ok(())
    }

    /// Remove every filter the given ports take part in.
    pub async fn clear_all(&self, addresses: &[CanonicalAddress]) -> Result<(), CoreError> {
        info!(ports = addresses.len(), "clearing all mappings");
        let _operation = self.session.exclusive().await;
        let mut progress = Progress::default();
        match self.clear_all_steps(addresses, &mut progress).await {
            Ok(()) => Ok(()),
            Err(e) => Err(progress.into_error(e)),
        }
    }

    async fn clear_all_steps(
        &self,
        addresses: &[CanonicalAddress],
        progress: &mut Progress,
    ) -> Result<(), CoreError> {
        for address in addresses {
            let port = self.resolve(address).await?;
            if port.is_unmapped() {
                debug!(%address, "no filters, skipping");
                continue;
            }
            for filter_id in port.filters() {
                self.delete_filter_by_id(&filter_id).await?;
                progress.step(format!("deleted filter {filter_id} on {address}"));
            }
        }
        Ok(())
    }

    /// Remove the filters from `source` to any of `dests`.
    ///
    /// Only the source port's outgoing filters are inspected. A filter is
    /// removed when `source` is among its sources and at least one of
    /// `dests` is among its destinations.
    pub async fn clear_to(
        &self,
        source: &CanonicalAddress,
        dests: &[CanonicalAddress],
    ) -> Result<(), CoreError> {
        info!(%source, dests = dests.len(), "clearing mappings");
        let _operation = self.session.exclusive().await;
        let mut progress = Progress::default();
        match self.clear_to_steps(source, dests, &mut progress).await {
            Ok(()) => Ok(()),
            Err(e) => Err(progress.into_error(e)),
        }
    }

    async fn clear_to_steps(
        &self,
        source: &CanonicalAddress,
        dests: &[CanonicalAddress],
        progress: &mut Progress,
    ) -> Result<(), CoreError> {
        let src_port = self.resolve(source).await?;
        let src_id = require_id(&src_port)?;

        let mut dest_ids = Vec::with_capacity(dests.len());
        for dest in dests {
            let port = self.resolve(dest).await?;
            dest_ids.push(require_id(&port)?);
        }

        for filter_id in &src_port.dest_filters {
            let filter = self.get_filter(filter_id).await?;
            let from_source = filter.source_ports.contains(&src_id);
            let to_dest = filter.dest_ports.iter().any(|d| dest_ids.contains(d));
            if from_source && to_dest {
                self.delete_filter(filter_id, &filter).await?;
                progress.step(format!("deleted filter {filter_id} from {source}"));
            }
        }
        Ok(())
    }

    // ── Shared steps ─────────────────────────────────────────────────

    /// Look up the port behind a caller address.
    async fn resolve(&self, address: &CanonicalAddress) -> Result<PortRecord, CoreError> {
        let schema = self.session.schema().await?;
        let name = port_name::from_canonical_address(schema, address);
        self.session
            .get_port(&name)
            .await
            .map_err(|e| e.not_found_as("port", &format!("{address} ({name})")))
    }

    async fn enable(&self, port: &PortRecord) -> Result<DeviceId, CoreError> {
        let id = require_id(port)?;
        self.session.set_port_enabled(&id, true).await?;
        Ok(id)
    }

    async fn get_filter(&self, id: &DeviceId) -> Result<FilterRecord, CoreError> {
        self.session
            .get_filter(id)
            .await
            .map_err(|e| e.not_found_as("filter", &id.as_key()))
    }

    async fn delete_filter_by_id(&self, id: &DeviceId) -> Result<(), CoreError> {
        let filter = self.get_filter(id).await?;
        self.delete_filter(id, &filter).await
    }

    /// Delete a filter, then disable each of its endpoints that has no
    /// memberships left.
    async fn delete_filter(&self, id: &DeviceId, filter: &FilterRecord) -> Result<(), CoreError> {
        let endpoints = filter.endpoints();
        self.session
            .delete_filter(id)
            .await
            .map_err(|e| e.not_found_as("filter", &id.as_key()))?;
        debug!(filter = %id, endpoints = endpoints.len(), "filter deleted");

        for port_id in endpoints {
            let port = self
                .session
                .get_port(&port_id.as_key())
                .await
                .map_err(|e| e.not_found_as("port", &port_id.as_key()))?;
            if port.is_unmapped() {
                debug!(port = %port_id, "no memberships left, disabling");
                self.session.set_port_enabled(&port_id, false).await?;
            }
        }
        Ok(())
    }
}

fn require_id(port: &PortRecord) -> Result<DeviceId, CoreError> {
    port.id.clone().ok_or_else(|| CoreError::InvalidState {
        message: "Port identifier cannot be None".into(),
    })
}
