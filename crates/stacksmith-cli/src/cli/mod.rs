//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

use stacksmith_core::{
    application::RecoveryPolicy,
    domain::{Auth, Backend, Database, Frontend},
};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stacksmith",
    bin_name = "stacksmith",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Full-stack project generator",
    long_about = "Stacksmith assembles a frontend, backend, database and auth \
                  stack into a new project, checking that the pieces fit \
                  together before anything is written to disk.",
    after_help = "EXAMPLES:\n\
        \x20 stacksmith new shop\n\
        \x20 stacksmith new shop --frontend react --backend express --database mongodb --auth jwt\n\
        \x20 stacksmith check --backend flask --database mongodb\n\
        \x20 stacksmith list --matrix\n\
        \x20 stacksmith completions bash > /usr/share/bash-completion/completions/stacksmith",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new full-stack project.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "Missing choices are asked interactively. Ctrl-C during generation \
            removes the partial project once the running command exits (unix only; \
            on Windows delete the directory yourself).\n\n\
            EXAMPLES:\n\
            \x20 stacksmith new shop\n\
            \x20 stacksmith new shop -F vue -B django -D postgresql -A jwt \\\n\
            \x20     --db-url postgres://localhost/shop --jwt-secret s3cret --yes\n\
            \x20 stacksmith new shop -F react -B express -D mongodb -A jwt --dry-run"
    )]
    New(NewArgs),

    /// Check whether a stack is compatible without generating anything.
    #[command(
        about = "Check stack compatibility",
        after_help = "EXAMPLES:\n\
            \x20 stacksmith check --backend flask --database mongodb\n\
            \x20 stacksmith check -B express -D firestore -A jwt --format json"
    )]
    Check(CheckArgs),

    /// List the stack catalog.
    #[command(
        visible_alias = "ls",
        about = "List supported stack options",
        after_help = "EXAMPLES:\n\
            \x20 stacksmith list\n\
            \x20 stacksmith list --matrix\n\
            \x20 stacksmith list --format json"
    )]
    List(ListArgs),

    /// Initialise a Stacksmith configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 stacksmith init           # default location\n\
            \x20 stacksmith init --local   # ./stacksmith.toml"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stacksmith completions bash > ~/.local/share/bash-completion/completions/stacksmith\n\
            \x20 stacksmith completions zsh  > ~/.zfunc/_stacksmith\n\
            \x20 stacksmith completions fish > ~/.config/fish/completions/stacksmith.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Stacksmith configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stacksmith config get generation.on_command_failure\n\
            \x20 stacksmith config list\n\
            \x20 stacksmith config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `stacksmith new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project directory name, created in the current directory.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: Option<String>,

    #[command(flatten)]
    pub stack: StackArgs,

    /// Database connection string.
    #[arg(long = "db-url", value_name = "URL", env = "STACKSMITH_DB_URL")]
    pub db_url: Option<String>,

    /// Firebase project id.
    #[arg(long = "firebase-project", value_name = "ID")]
    pub firebase_project: Option<String>,

    /// Secret used to sign JWTs.
    #[arg(long = "jwt-secret", value_name = "SECRET", env = "STACKSMITH_JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// What to do when an external command fails.
    #[arg(long = "on-failure", value_name = "POLICY", value_enum)]
    pub on_failure: Option<PolicyArg>,

    /// Never prompt; every missing value is an error.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Never prompt; fail on missing values"
    )]
    pub yes: bool,

    /// Replace an existing directory (destructive).
    #[arg(long = "force", help = "Overwrite existing directory")]
    pub force: bool,

    /// Preview the generation plan without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

/// The four stack dimensions, shared by `new` and `check`.
#[derive(Debug, Clone, Args)]
pub struct StackArgs {
    #[arg(short = 'F', long = "frontend", value_enum, help = "Frontend framework")]
    pub frontend: Option<FrontendArg>,

    #[arg(short = 'B', long = "backend", value_enum, help = "Backend framework")]
    pub backend: Option<BackendArg>,

    #[arg(short = 'D', long = "database", value_enum, help = "Database")]
    pub database: Option<DatabaseArg>,

    #[arg(short = 'A', long = "auth", value_enum, help = "Authentication")]
    pub auth: Option<AuthArg>,
}

// ── check ─────────────────────────────────────────────────────────────────────

/// Arguments for `stacksmith check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    #[arg(short = 'B', long = "backend", value_enum, help = "Backend framework")]
    pub backend: BackendArg,

    #[arg(short = 'D', long = "database", value_enum, help = "Database")]
    pub database: DatabaseArg,

    /// Leave out to check only the backend/database pair.
    #[arg(short = 'A', long = "auth", value_enum, help = "Authentication")]
    pub auth: Option<AuthArg>,

    #[arg(long = "format", value_enum, help = "Output format")]
    pub format: Option<ReportFormat>,
}

/// Output format for `check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable lines.
    Human,
    /// JSON object.
    Json,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `stacksmith list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Show which databases and auth methods each backend supports.
    #[arg(long = "matrix", help = "Show the compatibility matrix")]
    pub matrix: bool,

    /// Output format.
    #[arg(long = "format", value_enum, help = "Output format")]
    pub format: Option<ListFormat>,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// JSON document.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `stacksmith init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `stacksmith.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `stacksmith completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `stacksmith config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.backend`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the configuration files that are read, in order.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Frontend choices as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FrontendArg {
    React,
    #[value(name = "nextjs", alias = "next")]
    NextJs,
    Vue,
    Angular,
    Svelte,
}

impl From<FrontendArg> for Frontend {
    fn from(arg: FrontendArg) -> Self {
        match arg {
            FrontendArg::React => Frontend::React,
            FrontendArg::NextJs => Frontend::NextJs,
            FrontendArg::Vue => Frontend::Vue,
            FrontendArg::Angular => Frontend::Angular,
            FrontendArg::Svelte => Frontend::Svelte,
        }
    }
}

/// Backend choices as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    #[value(name = "express", alias = "node-express")]
    Express,
    #[value(name = "fastify", alias = "node-fastify")]
    Fastify,
    Flask,
    Django,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Express => Backend::NodeExpress,
            BackendArg::Fastify => Backend::NodeFastify,
            BackendArg::Flask => Backend::Flask,
            BackendArg::Django => Backend::Django,
        }
    }
}

/// Database choices as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatabaseArg {
    #[value(name = "mongodb", alias = "mongo")]
    MongoDb,
    #[value(name = "postgresql", alias = "postgres")]
    PostgreSql,
    #[value(name = "mysql")]
    MySql,
    Firestore,
}

impl From<DatabaseArg> for Database {
    fn from(arg: DatabaseArg) -> Self {
        match arg {
            DatabaseArg::MongoDb => Database::MongoDb,
            DatabaseArg::PostgreSql => Database::PostgreSql,
            DatabaseArg::MySql => Database::MySql,
            DatabaseArg::Firestore => Database::Firestore,
        }
    }
}

/// Auth choices as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthArg {
    Jwt,
    #[value(name = "firebase", alias = "firebase-auth")]
    Firebase,
}

impl From<AuthArg> for Auth {
    fn from(arg: AuthArg) -> Self {
        match arg {
            AuthArg::Jwt => Auth::Jwt,
            AuthArg::Firebase => Auth::FirebaseAuth,
        }
    }
}

/// Command failure policy as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    Prompt,
    Continue,
    Abort,
}

impl From<PolicyArg> for RecoveryPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Prompt => RecoveryPolicy::Prompt,
            PolicyArg::Continue => RecoveryPolicy::Continue,
            PolicyArg::Abort => RecoveryPolicy::Abort,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
