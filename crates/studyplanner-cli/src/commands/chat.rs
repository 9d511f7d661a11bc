//! Free-text front-end over the planner.

use serde::Serialize;
use tracing::debug;
use studyplanner_core::{Clock, Planner, Priority, StateStore};

use super::open_planner;
use crate::intent::{parse_intent, Intent};

const GREETING: &str = "Hi! I can add subjects (\"add Math 5 hours\"), list them (\"list\"), \
plan your day (\"schedule\"), show your progress (\"stats\"), mark tasks (\"done <task-id>\", \
\"skip <task-id>\"), or start over (\"clear\").";

const UNKNOWN: &str = "Sorry, I didn't get that. Try \"add Math 5 hours\", \"list\", \
\"schedule\", \"stats\", or \"help\".";

#[derive(Debug, Serialize)]
pub struct ChatReply {
    #[serde(flatten)]
    pub intent: Intent,
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

pub fn run(text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut planner = open_planner()?;
    let reply = respond(&mut planner, text)?;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

/// Classify `text` and carry it out against `planner`.
pub fn respond<S: StateStore, C: Clock>(
    planner: &mut Planner<S, C>,
    text: &str,
) -> Result<ChatReply, Box<dyn std::error::Error>> {
    let intent = parse_intent(text);
    debug!(?intent, "chat intent");
    let (reply, result) = match &intent {
        Intent::AddSubject { name, hours } => {
            let subject = planner.add_subject(name, *hours, Priority::default(), None)?;
            (
                format!("Added {} ({} h/week).", subject.name, subject.hours_per_week),
                Some(serde_json::to_value(&subject)?),
            )
        }
        Intent::ListSubjects => {
            let subjects = planner.list_subjects();
            let reply = if subjects.is_empty() {
                "No subjects yet.".to_string()
            } else {
                let names: Vec<&str> = subjects.iter().map(|s| s.name.as_str()).collect();
                format!("Your subjects: {}.", names.join(", "))
            };
            (reply, Some(serde_json::to_value(subjects)?))
        }
        Intent::Schedule => {
            let schedule = planner.get_schedule();
            let reply = if schedule.allocations.is_empty() {
                "Add a subject first, then ask for a schedule.".to_string()
            } else {
                format!(
                    "Today's plan: {} minutes across {} subjects.",
                    schedule.total_minutes(),
                    schedule.allocations.len()
                )
            };
            (reply, Some(serde_json::to_value(&schedule)?))
        }
        Intent::Stats => {
            let stats = planner.get_stats();
            (
                format!(
                    "{} points, level {}, {}-day streak.",
                    stats.points, stats.level, stats.current_streak
                ),
                Some(serde_json::to_value(&stats)?),
            )
        }
        Intent::CompleteTask { task_id } => {
            let outcome = planner.complete_task(task_id)?;
            (
                format!("Nice work! +{} points.", outcome.points_awarded),
                Some(serde_json::to_value(&outcome)?),
            )
        }
        Intent::SkipTask { task_id } => {
            let outcome = planner.skip_task(task_id)?;
            (
                format!("Skipped. -{} points.", outcome.points_deducted),
                Some(serde_json::to_value(&outcome)?),
            )
        }
        Intent::Clear => {
            let summary = planner.clear_all()?;
            (
                "Cleared everything. Starting fresh.".to_string(),
                Some(serde_json::to_value(&summary)?),
            )
        }
        Intent::Greeting => (GREETING.to_string(), None),
        Intent::Unknown => (UNKNOWN.to_string(), None),
    };
    Ok(ChatReply {
        intent,
        reply,
        result,
    })
}
