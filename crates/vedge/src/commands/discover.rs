//! Topology discovery handler.

use std::fmt::Write;

use tabled::Tabled;
use vedge_core::{Chassis, PortLocation, PortNode};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Remote ID")]
    remote_id: String,
    #[tabled(rename = "Mapped From")]
    mapped_from: String,
}

impl PortRow {
    fn new(port: &PortNode, color: bool) -> Self {
        let dash = || output::muted("-", color);
        Self {
            address: port.address.clone(),
            name: port.device_name.clone(),
            remote_id: port
                .remote_id
                .as_ref()
                .map_or_else(dash, ToString::to_string),
            mapped_from: port
                .mapped_from
                .map_or_else(dash, |src: PortLocation| src.to_string()),
        }
    }
}

fn detail(chassis: &Chassis, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) -- {} blade(s), {} port(s), {} mapping(s)",
        chassis.address,
        chassis.model_name,
        chassis.blades.len(),
        chassis.port_count(),
        chassis.mappings().len()
    );
    let rows: Vec<PortRow> = chassis
        .ports()
        .map(|(_, port)| PortRow::new(port, color))
        .collect();
    out.push_str(&output::render_table(&rows));
    out
}

/// One `<address>\t<name>\t<mapped-from>` line per port.
fn plain(chassis: &Chassis) -> String {
    chassis
        .ports()
        .map(|(_, port)| {
            let from = port
                .mapped_from
                .map_or_else(|| "-".to_owned(), |src| src.to_string());
            format!("{}\t{}\t{from}", port.address, port.device_name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::build_device_config(global)?;
    let device = cfg.login.address.clone();

    let chassis = util::with_driver(cfg, move |driver| async move {
        driver.discover_topology(&device).await
    })
    .await?;

    let color = output::should_color(&global.color_mode());
    let format = global.output_format();
    let out = output::render_single(&format, &chassis, |c| detail(c, color), plain)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
