use chrono::NaiveDate;
use clap::Subcommand;

use super::open_planner;

#[derive(Subcommand)]
pub enum ExamAction {
    /// Add an exam
    Add {
        /// Exam name
        name: String,
        /// Subject ID or name
        subject: String,
        /// Exam date (YYYY-MM-DD)
        date: NaiveDate,
    },
    /// List exams, soonest first
    List,
}

pub fn run(action: ExamAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut planner = open_planner()?;

    match action {
        ExamAction::Add {
            name,
            subject,
            date,
        } => {
            let exam = planner.add_exam(&name, &subject, date)?;
            println!("{}", serde_json::to_string_pretty(&exam)?);
        }
        ExamAction::List => {
            println!("{}", serde_json::to_string_pretty(&planner.list_exams())?);
        }
    }
    Ok(())
}
