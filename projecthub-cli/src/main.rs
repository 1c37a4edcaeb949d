use anyhow::Result;
use clap::{Parser, Subcommand};
use projecthub_core::{ProjectStats, project_stats};

mod config;
mod logging;
mod reminders_cmd;
mod source;
mod state;
mod task_store;

use reminders_cmd::RemindersCommand;
use source::TaskSourceArgs;

#[derive(Parser, Debug)]
#[command(
    name = "projecthub",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PROJECTHUB_BUILD_SHA"), ")"),
    about = "ProjectHub reminders and project insights"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prioritized, grouped reminders and deadline checks
    Reminders {
        #[command(subcommand)]
        command: RemindersCommand,
    },

    /// Status breakdown and per-member completion for a project
    Stats {
        #[command(flatten)]
        source: TaskSourceArgs,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Manage ~/.projecthub/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    logging::init(&cfg.log.level);

    match cli.command {
        Command::Reminders { command } => reminders_cmd::run(command, &cfg).await?,

        Command::Stats { source, json } => {
            let tasks = source.load(&cfg).await?;
            let stats = project_stats(&tasks);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

fn print_stats(stats: &ProjectStats) {
    let b = &stats.breakdown;
    println!("# Project stats\n");
    println!(
        "Tasks: {} total | {} completed | {} in progress | {} pending | {} blocked",
        stats.total, b.completed, b.in_progress, b.pending, b.blocked
    );
    println!("Completion rate: {:.2}%\n", stats.completion_rate);

    if stats.members.is_empty() {
        return;
    }

    println!("## Members\n");
    for m in &stats.members {
        println!(
            "- {}: {}/{} completed ({:.0}%)",
            m.assignee,
            m.completed,
            m.total,
            m.completion_ratio() * 100.0
        );
    }

    if let (Some(top), Some(low)) = (&stats.top_performer, &stats.needs_attention) {
        println!("\nPerforming well: {top}");
        if top != low {
            println!("Needs attention: {low}");
        }
    }
}
