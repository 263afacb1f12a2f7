use clap::Parser;

mod commands;
mod execute;

use commands::{Commands, GlobalArgs};

#[derive(Parser)]
#[command(name = "taskwright")]
#[command(about = "Build, serve and test a web application", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    taskwright_utils::tracing::init(cli.global.verbose).map_err(|e| eyre::eyre!(e))?;

    // Default behavior when no command is specified
    let command = cli.command.unwrap_or(Commands::Default);

    match command.execute(&cli.global).await {
        Ok(()) => Ok(()),
        Err(e) => match e.exit_code() {
            // Mirror the failing tool's status instead of a generic failure
            Some(code) if code != 0 => {
                tracing::error!("{e}");
                std::process::exit(code);
            }
            _ => Err(e.into()),
        },
    }
}
