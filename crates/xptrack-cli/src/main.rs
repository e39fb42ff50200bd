use clap::{CommandFactory, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "xptrack-cli", version, about = "XPTrack CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily goal management
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Series generation
    Series {
        #[command(subcommand)]
        action: commands::series::SeriesAction,
    },
    /// Income projection
    Income {
        #[command(subcommand)]
        action: commands::income::IncomeAction,
    },
    /// Chart rendering
    Chart {
        #[command(subcommand)]
        action: commands::chart::ChartAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions { shell: clap_complete::Shell },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Series { action } => commands::series::run(action),
        Commands::Income { action } => commands::income::run(action),
        Commands::Chart { action } => commands::chart::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "xptrack-cli",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
