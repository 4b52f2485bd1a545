//! Clap derive structures for the `bookit` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. This
//! file is also compiled by `build.rs` for man pages, so it may only
//! depend on `clap` and `clap_complete`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// bookit -- book rooms and equipment from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "bookit",
    version,
    about = "Book rooms and equipment from the command line",
    long_about = "Client for the bookit resource-booking service.\n\n\
        Browse resources, create and cancel reservations, and run\n\
        administrative tasks (roles, analytics, first-run setup).",
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
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "BOOKIT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 's', env = "BOOKIT_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "BOOKIT_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "BOOKIT_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "BOOKIT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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
    /// Sign in and remember the session
    Login(LoginArgs),

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Create a new account
    Register(RegisterArgs),

    /// Restore the session and show the dashboard summary
    #[command(alias = "dash")]
    Dashboard(DashboardArgs),

    /// Browse and manage bookable resources
    #[command(alias = "res")]
    Resources(ResourcesArgs),

    /// Create, list, and cancel reservations
    #[command(alias = "rsv")]
    Reservations(ReservationsArgs),

    /// Manage roles and role assignments (admin)
    Roles(RolesArgs),

    /// Usage analytics and CSV export (admin)
    Analytics(AnalyticsArgs),

    /// First-run setup of the server
    Setup(SetupArgs),

    /// Server health
    Status,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (defaults to the profile's username, then a prompt)
    #[arg(long, short = 'u')]
    pub username: Option<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Account name
    pub username: String,

    /// Contact email
    #[arg(long, short = 'e')]
    pub email: String,
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Items per page for the resource list
    #[arg(long)]
    pub per_page: Option<usize>,
}

// ── Resources ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ResourcesArgs {
    #[command(subcommand)]
    pub command: ResourcesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourcesCommand {
    /// List resources, filtered and paginated locally
    #[command(alias = "ls")]
    List(ResourceListArgs),

    /// Search on the server
    Search {
        /// Name or tag fragment
        query: String,

        /// Only resources that are bookable right now
        #[arg(long)]
        available_only: bool,
    },

    /// Show whether a resource is free right now
    #[command(alias = "avail")]
    Availability {
        /// Resource ID
        id: i64,
    },

    /// Create a resource (admin)
    Create {
        /// Display name
        name: String,

        /// Tags, repeatable or comma-separated
        #[arg(long, short = 't', value_delimiter = ',')]
        tags: Vec<String>,

        /// Create it as not bookable
        #[arg(long)]
        unavailable: bool,
    },
}

#[derive(Debug, Args)]
pub struct ResourceListArgs {
    /// Case-insensitive match on name or tag
    #[arg(long)]
    pub search: Option<String>,

    /// Availability filter
    #[arg(long, short = 'f', default_value = "all")]
    pub filter: AvailabilityFilter,

    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Items per page (overrides profile)
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Ignore pagination and print every match
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AvailabilityFilter {
    All,
    Available,
    Unavailable,
}

// ── Reservations ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReservationsArgs {
    #[command(subcommand)]
    pub command: ReservationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReservationsCommand {
    /// List your reservations
    #[command(alias = "ls")]
    List {
        /// Include cancelled reservations
        #[arg(long)]
        include_cancelled: bool,

        /// Only reservations that have not started yet
        #[arg(long, conflicts_with = "include_cancelled")]
        upcoming: bool,
    },

    /// Book a resource
    Create {
        /// Resource ID
        resource_id: i64,

        /// Start time (RFC 3339, e.g. 2030-05-01T09:00:00Z)
        #[arg(long)]
        start: String,

        /// End time (RFC 3339)
        #[arg(long, conflicts_with = "duration", required_unless_present = "duration")]
        end: Option<String>,

        /// Length instead of an end time (e.g. "1h 30m")
        #[arg(long)]
        duration: Option<String>,
    },

    /// Cancel a reservation
    Cancel {
        /// Reservation ID
        id: i64,
    },

    /// Show the audit trail of a reservation
    History {
        /// Reservation ID
        id: i64,
    },
}

// ── Roles ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RolesArgs {
    #[command(subcommand)]
    pub command: RolesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RolesCommand {
    /// List roles
    #[command(alias = "ls")]
    List,

    /// Create a role
    Create {
        /// Role name
        name: String,

        /// Human-readable description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Permissions, repeatable or comma-separated
        #[arg(long, value_delimiter = ',')]
        permission: Vec<String>,
    },

    /// Grant a role to a user
    Assign {
        /// User ID
        user_id: i64,
        /// Role name
        role: String,
    },

    /// Revoke a role from a user
    Remove {
        /// User ID
        user_id: i64,
        /// Role name
        role: String,
    },
}

// ── Analytics ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AnalyticsArgs {
    #[command(subcommand)]
    pub command: AnalyticsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AnalyticsCommand {
    /// Headline numbers
    Dashboard,

    /// Booked hours per resource
    Utilization(WindowArgs),

    /// Most booked resources
    Popular {
        #[command(flatten)]
        window: WindowArgs,

        /// Number of resources to return
        #[arg(long, short = 'l')]
        limit: Option<u32>,
    },

    /// Busiest hours and weekdays
    PeakTimes(WindowArgs),

    /// Per-user booking behaviour
    UserPatterns(WindowArgs),

    /// Download a report as CSV
    Export {
        /// Report to export
        report: ReportKind,

        #[command(flatten)]
        window: WindowArgs,

        /// Write to this file instead of stdout
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Look-back window in days
    #[arg(long, short = 'd')]
    pub days: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Utilization,
    PopularResources,
    PeakTimes,
    UserPatterns,
}

// ── Setup ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SetupArgs {
    #[command(subcommand)]
    pub command: SetupCommand,
}

#[derive(Debug, Subcommand)]
pub enum SetupCommand {
    /// Whether first-run setup is still pending
    Status,

    /// Create the first administrator account
    Init {
        /// Administrator username
        #[arg(long, short = 'u')]
        username: String,

        /// Administrator email
        #[arg(long, short = 'e')]
        email: String,

        /// One-time setup token
        #[arg(long, env = "BOOKIT_SETUP_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Unlock the setup endpoints with a one-time token
    Unlock {
        /// One-time setup token
        #[arg(long, env = "BOOKIT_SETUP_TOKEN", hide_env_values = true)]
        token: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive profile wizard
    Init,

    /// Print the effective configuration
    Show,

    /// Print the config file location
    Path,

    /// Add or replace a profile non-interactively
    SetProfile {
        /// Profile name
        name: String,

        /// Server URL
        #[arg(long)]
        server: String,

        /// Default username
        #[arg(long, short = 'u')]
        username: Option<String>,
    },

    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },

    /// Store the profile's password in the system keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
