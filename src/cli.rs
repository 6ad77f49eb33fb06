use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "npctl")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Reconcile nullplatform scopes, dimension values and providers", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub api: ApiArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection and file options; each overrides `config.toml`
#[derive(Args, Debug, Default)]
pub struct ApiArgs {
    /// Control-plane API base URL
    #[arg(long, env = "NP_API_URL", global = true)]
    pub api_url: Option<String>,

    /// API key sent as a bearer token
    #[arg(long, env = "NP_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// State file path
    #[arg(long = "state", env = "NPCTL_STATE", global = true)]
    pub state_file: Option<String>,

    /// Manifest path
    #[arg(long, env = "NPCTL_MANIFEST", global = true)]
    pub manifest: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Refresh state and show what apply would change
    Plan(TargetArgs),

    /// Apply the manifest to the control plane
    Apply(ApplyArgs),

    /// Delete every resource recorded in state
    Destroy(DestroyArgs),

    /// Show recorded state
    Show(TargetArgs),

    /// Look up provider specifications
    #[command(subcommand)]
    Spec(SpecCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Default)]
pub struct TargetArgs {
    /// Limit to a kind (`scope`) or one resource (`scope.checkout`)
    #[arg(long)]
    pub target: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ApplyArgs {
    /// Limit to a kind (`scope`) or one resource (`scope.checkout`)
    #[arg(long)]
    pub target: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Show the plan without applying it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Default)]
pub struct DestroyArgs {
    /// Limit to a kind (`scope`) or one resource (`scope.checkout`)
    #[arg(long)]
    pub target: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum SpecCommand {
    /// Resolve a specification slug to its id
    Slug { slug: String },

    /// Resolve a specification id to its slug
    Id { id: String },
}
