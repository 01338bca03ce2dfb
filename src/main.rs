use clap::Parser;
use key_registry::cli::{self, keys, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let manager = cli::bootstrap(cli.config.as_ref()).await?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::List => keys::list(&manager, &mut out).await,
        Command::Check {
            secret,
            model,
            json,
        } => keys::check(&manager, &secret, &model, json, &mut out).await,
        Command::Issue { name, description } => {
            keys::issue(&manager, &name, description, &mut out).await
        }
        Command::Current { name } => keys::current(&manager, &name, &mut out).await,
    }
}
