use clap::{Parser, Subcommand};
use studyplanner_core::CoreError;
use tracing_subscriber::EnvFilter;

mod commands;
mod intent;

#[derive(Parser)]
#[command(name = "studyplanner-cli", version, about = "Study Planner CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Subject management
    Subject {
        #[command(subcommand)]
        action: commands::subject::SubjectAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Exam management
    Exam {
        #[command(subcommand)]
        action: commands::exam::ExamAction,
    },
    /// Today's study schedule
    Schedule,
    /// Points, level, and streaks
    Stats,
    /// Delete all subjects, tasks, and exams and reset stats
    Clear {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Free-text commands ("add Math 5 hours", "schedule", "done <id>")
    Chat {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
}

fn main() {
    // stdout carries JSON; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("STUDYPLANNER_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Subject { action } => commands::subject::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Exam { action } => commands::exam::run(action),
        Commands::Schedule => commands::schedule::run(),
        Commands::Stats => commands::stats::run(),
        Commands::Clear { yes } => commands::clear::run(yes),
        Commands::Config { action } => commands::config::run(action),
        Commands::Chat { text } => commands::chat::run(&text.join(" ")),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        let code = e.downcast_ref::<CoreError>().map_or(1, CoreError::exit_code);
        std::process::exit(code);
    }
}
