//! Clap derive structures for the `newscast` CLI.
//!
//! Kept free of workspace crates so `build.rs` can include it for man
//! page generation.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// newscast -- browse, favorite and broadcast aggregated news
#[derive(Debug, Parser)]
#[command(
    name = "newscast",
    version,
    about = "Browse, favorite and broadcast news from the command line",
    long_about = "A terminal dashboard for a news aggregation service.\n\n\
        Reads the paginated news feed, manages favorites and dispatches\n\
        favorites to external channels (email, WhatsApp, LinkedIn, blog,\n\
        newsletter).",
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
    /// Service profile to use
    #[arg(long, short = 'p', env = "NEWSCAST_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL, e.g. http://localhost:8000/api/v1 (overrides profile)
    #[arg(long, short = 'u', env = "NEWSCAST_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NEWSCAST_OUTPUT",
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

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "NEWSCAST_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
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

#[derive(Debug, Clone, Copy, ValueEnum)]
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
    /// Browse the news feed
    #[command(alias = "n")]
    News(NewsArgs),

    /// Manage favorited news items
    #[command(alias = "fav", alias = "f")]
    Favorites(FavoritesArgs),

    /// Send favorites to external channels
    #[command(alias = "bc", alias = "b")]
    Broadcast(BroadcastArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NEWS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NewsArgs {
    #[command(subcommand)]
    pub command: NewsCommand,
}

#[derive(Debug, Subcommand)]
pub enum NewsCommand {
    /// List one page of news, newest first
    #[command(alias = "ls")]
    List {
        /// Page number, 1-based
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Items per page (defaults to the profile page size)
        #[arg(long, short = 'l', value_parser = clap::value_parser!(u32).range(1..))]
        limit: Option<u32>,
    },

    /// Ask the service to re-ingest its sources
    Refresh,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FAVORITES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FavoritesArgs {
    #[command(subcommand)]
    pub command: FavoritesCommand,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// List favorites
    #[command(alias = "ls")]
    List,

    /// Favorite a news item
    Add {
        /// News item ID
        news_id: i64,
    },

    /// Remove a favorite
    #[command(alias = "rm")]
    Remove {
        /// Favorite ID (not the news item ID)
        favorite_id: i64,
    },

    /// Favorite a news item, or unfavorite it if already favorited
    Toggle {
        /// News item ID
        news_id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BROADCAST
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BroadcastArgs {
    #[command(subcommand)]
    pub command: BroadcastCommand,
}

#[derive(Debug, Subcommand)]
pub enum BroadcastCommand {
    /// Send a favorite to a channel
    Send {
        /// Favorite ID
        favorite_id: i64,

        /// Target channel
        #[arg(long, short = 'P')]
        platform: PlatformArg,

        /// Custom message (the service composes one when omitted)
        #[arg(long, short = 'm')]
        message: Option<String>,
    },

    /// Show broadcast history
    Logs,

    /// List supported channels
    Platforms,
}

/// Broadcast channel as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    Email,
    Whatsapp,
    Linkedin,
    Blog,
    Newsletter,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a profile with guided setup
    Init,

    /// Display the current configuration
    Show,

    /// Print the config file location
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    SetDefault {
        /// Profile name
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
