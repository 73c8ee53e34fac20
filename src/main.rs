use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use playlist_digest::{cli, config, error, management::Property};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Runs the job when omitted
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Record the playlist, announce yesterday's additions and schedule the next run
    Run,

    /// Keep firing the scheduled daily run
    Watch,

    /// Authorize with Spotify API
    Auth,

    /// Manage stored credentials and targets
    Props(PropsOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct PropsOptions {
    #[command(subcommand)]
    pub command: PropsSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PropsSubcommand {
    /// Store a property
    Set { key: Property, value: String },

    /// Remove a property
    Unset { key: Property },

    /// Show all properties, secrets masked
    List,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => cli::run().await,
        Command::Watch => cli::watch().await,
        Command::Auth => cli::auth().await,
        Command::Props(opt) => match opt.command {
            PropsSubcommand::Set { key, value } => cli::set_property(key, value).await,
            PropsSubcommand::Unset { key } => cli::unset_property(key).await,
            PropsSubcommand::List => cli::list_properties().await,
        },
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
