use crate::prelude::*;
use clap::Parser;

mod collect;
mod error;
mod prelude;
mod serve;
mod summarize;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Summarize a project tree with an LLM, or serve it over HTTP while you work on it"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "DEVLENS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Walk a project tree and write a JSON snapshot of its files
    Collect(crate::collect::CollectOptions),

    /// Ask a hosted language model to summarize a project tree or snapshot
    Summarize(crate::summarize::SummarizeOptions),

    /// Serve a directory over HTTP for local development
    Serve(crate::serve::ServeOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be set.
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Collect(options) => crate::collect::run(options, app.global).await,
        SubCommands::Summarize(options) => crate::summarize::run(options, app.global).await,
        SubCommands::Serve(options) => crate::serve::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
