//! Subject management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use studyplanner_core::Priority;

use super::open_planner;

#[derive(Subcommand)]
pub enum SubjectAction {
    /// Add a subject
    Add {
        /// Subject name
        name: String,
        /// Weekly study hours
        #[arg(allow_negative_numbers = true)]
        hours: f64,
        /// coding, college, or a numeric weight
        #[arg(long, default_value = "college")]
        priority: Priority,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<NaiveDate>,
    },
    /// List subjects
    List,
    /// Change weekly hours or priority
    Update {
        /// Subject ID or name
        subject: String,
        /// New weekly hours
        #[arg(long, allow_negative_numbers = true)]
        hours: Option<f64>,
        /// New priority
        #[arg(long)]
        priority: Option<Priority>,
    },
}

pub fn run(action: SubjectAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut planner = open_planner()?;

    match action {
        SubjectAction::Add {
            name,
            hours,
            priority,
            deadline,
        } => {
            let subject = planner.add_subject(&name, hours, priority, deadline)?;
            println!("{}", serde_json::to_string_pretty(&subject)?);
        }
        SubjectAction::List => {
            println!("{}", serde_json::to_string_pretty(planner.list_subjects())?);
        }
        SubjectAction::Update {
            subject,
            hours,
            priority,
        } => {
            let subject = planner.update_subject(&subject, hours, priority)?;
            println!("{}", serde_json::to_string_pretty(&subject)?);
        }
    }
    Ok(())
}
