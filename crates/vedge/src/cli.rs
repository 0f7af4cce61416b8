//! Clap derive structures for the `vedge` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// vedge -- port mapping and topology discovery for Vision Edge packet brokers
#[derive(Debug, Parser)]
#[command(
    name = "vedge",
    version,
    about = "Map ports and discover topology on Vision Edge packet brokers",
    long_about = "Drive a Vision Edge network packet broker from the command line.\n\n\
        Ports are addressed as <device>/<blade>/<port> (e.g. 192.168.42.240/1/21)\n\
        or, relative to --device, as <blade>/<port>. Mappings are realized as\n\
        PASS_ALL filters; standalone and clustered devices are detected\n\
        automatically.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device profile to use
    #[arg(long, short = 'p', env = "VEDGE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device address or base URL (overrides profile)
    #[arg(long, short = 'd', env = "VEDGE_DEVICE", global = true)]
    pub device: Option<String>,

    /// Username (overrides profile)
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// REST API port when the device address has no scheme
    #[arg(long, env = "VEDGE_PORT", global = true)]
    pub port: Option<u16>,

    /// Output format [default: table]
    #[arg(long, short = 'o', env = "VEDGE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "VEDGE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: 30]
    #[arg(long, env = "VEDGE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    /// Selected output format, `table` when neither flag nor config set one.
    pub fn output_format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }

    /// Selected color mode, `auto` when neither flag nor config set one.
    pub fn color_mode(&self) -> ColorMode {
        self.color.clone().unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Discover the chassis, blades, ports and current mappings
    #[command(alias = "disc")]
    Discover,

    /// Create port mappings
    Map(MapArgs),

    /// Remove port mappings
    Clear(ClearArgs),

    /// Read or write port attributes (not supported by this device)
    Attr(AttrArgs),

    /// Set speed and duplex on a connection (not supported by this device)
    Speed(SpeedArgs),

    /// Print the resource state id
    StateId,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Map ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MapArgs {
    #[command(subcommand)]
    pub command: MapCommand,
}

#[derive(Debug, Subcommand)]
pub enum MapCommand {
    /// Map two ports to each other
    Bidi {
        /// First port address
        a: String,
        /// Second port address
        b: String,
    },

    /// Map a source port to one or more destinations
    Uni {
        /// Source port address
        source: String,
        /// Destination port addresses
        #[arg(required = true)]
        dests: Vec<String>,
    },

    /// Tap a source port to one or more destinations
    Tap {
        /// Source port address
        source: String,
        /// Destination port addresses
        #[arg(required = true)]
        dests: Vec<String>,
    },
}

// ── Clear ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClearArgs {
    #[command(subcommand)]
    pub command: ClearCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClearCommand {
    /// Remove every mapping touching the given ports
    All {
        /// Port addresses
        #[arg(required = true)]
        addresses: Vec<String>,
    },

    /// Remove mappings from a source port to the given destinations
    To {
        /// Source port address
        source: String,
        /// Destination port addresses
        #[arg(required = true)]
        dests: Vec<String>,
    },
}

// ── Attr / Speed ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AttrArgs {
    #[command(subcommand)]
    pub command: AttrCommand,
}

#[derive(Debug, Subcommand)]
pub enum AttrCommand {
    /// Read an attribute
    Get {
        /// Port address
        address: String,
        /// Attribute name
        name: String,
    },

    /// Write an attribute
    Set {
        /// Port address
        address: String,
        /// Attribute name
        name: String,
        /// New value
        value: String,
    },
}

#[derive(Debug, Args)]
pub struct SpeedArgs {
    /// Source port address
    pub source: String,
    /// Destination port address
    pub dest: String,
    /// Line speed (e.g. 10G)
    pub speed: String,
    /// Duplex mode (e.g. full)
    pub duplex: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Display current resolved configuration
    Show,

    /// Store a password in the system keyring
    SetPassword {
        /// Profile to store the password for (defaults to the active one)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
