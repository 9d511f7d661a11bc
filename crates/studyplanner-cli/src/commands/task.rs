//! Task management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use studyplanner_core::{TaskFilter, TaskStatus};

use super::open_planner;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task under a subject
    Add {
        /// Subject ID or name
        subject: String,
        /// What to do
        description: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// List tasks
    List {
        /// Filter by subject ID or name
        #[arg(long)]
        subject: Option<String>,
        /// Filter by status (pending, done, skipped)
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Mark a task done
    Done {
        /// Task ID
        id: String,
    },
    /// Mark a task skipped
    Skip {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut planner = open_planner()?;

    match action {
        TaskAction::Add {
            subject,
            description,
            due,
        } => {
            let task = planner.add_task(&subject, &description, due)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { subject, status } => {
            let tasks = planner.find_tasks(&TaskFilter { subject, status })?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Done { id } => {
            let outcome = planner.complete_task(&id)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        TaskAction::Skip { id } => {
            let outcome = planner.skip_task(&id)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }
    Ok(())
}
