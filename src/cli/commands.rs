use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "homily", about = concat!("homily v", env!("CARGO_PKG_VERSION"), " - sermon outlines from the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the config file (default: ./homily.toml)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the user's sermons
    Sermons,
    /// Show a sermon's outline, grouped by bucket
    Outline(OutlineArgs),
    /// Move a thought to a bucket and save
    Move(MoveArgs),
}

#[derive(Args)]
pub struct OutlineArgs {
    /// Sermon id
    pub sermon_id: String,
}

#[derive(Args)]
pub struct MoveArgs {
    /// Sermon id
    pub sermon_id: String,
    /// Thought id
    pub thought_id: String,
    /// Destination: introduction, main, conclusion or ambiguous
    pub bucket: String,
}
