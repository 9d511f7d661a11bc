//! Keyword matching for free-text chat input.
//!
//! [`parse_intent`] is pure: it only classifies the text. The chat command
//! decides what each [`Intent`] does against the planner.

use serde::Serialize;

/// Weekly hours used when `add <name>` gives none.
pub const DEFAULT_HOURS: f64 = 2.0;

/// What a chat message asks for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    AddSubject { name: String, hours: f64 },
    ListSubjects,
    Schedule,
    Stats,
    CompleteTask { task_id: String },
    SkipTask { task_id: String },
    Clear,
    Greeting,
    Unknown,
}

const LIST_PHRASES: &[&str] = &["list", "show", "my subjects", "what are"];
const SCHEDULE_PHRASES: &[&str] = &["schedule", "daily", "plan for today", "today's plan"];
const STATS_WORDS: &[&str] = &["stats", "points", "level", "streak"];
const CLEAR_WORDS: &[&str] = &["clear", "reset"];
const GREETING_WORDS: &[&str] = &["hi", "hello", "hey", "help"];
// Filler dropped from subject names
const NAME_NOISE: &[&str] = &["subject", "topic", "hours", "hour", "hrs", "h"];

pub fn parse_intent(input: &str) -> Intent {
    let text = input.trim();
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '-' && c != '\'')
        .filter(|w| !w.is_empty())
        .collect();
    let has_word = |set: &[&str]| words.iter().any(|w| set.contains(w));

    if let Some(intent) = parse_add(text) {
        return intent;
    }
    if let Some(task_id) = argument_after(text, "done").or_else(|| argument_after(text, "complete")) {
        return Intent::CompleteTask { task_id };
    }
    if let Some(task_id) = argument_after(text, "skip") {
        return Intent::SkipTask { task_id };
    }
    if LIST_PHRASES.iter().any(|p| lower.contains(p)) {
        return Intent::ListSubjects;
    }
    if SCHEDULE_PHRASES.iter().any(|p| lower.contains(p)) {
        return Intent::Schedule;
    }
    if has_word(STATS_WORDS) {
        return Intent::Stats;
    }
    if has_word(CLEAR_WORDS) {
        return Intent::Clear;
    }
    if has_word(GREETING_WORDS) {
        return Intent::Greeting;
    }
    Intent::Unknown
}

/// `add <name> [hours]`, also accepted mid-sentence ("please add Math 3").
fn parse_add(text: &str) -> Option<Intent> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let start = tokens.iter().position(|t| t.eq_ignore_ascii_case("add"))?;

    let mut name_parts = Vec::new();
    let mut hours = None;
    for token in &tokens[start + 1..] {
        if let Ok(value) = token.parse::<f64>() {
            hours = Some(value);
            break;
        }
        if NAME_NOISE.contains(&token.to_lowercase().as_str()) {
            continue;
        }
        name_parts.push(*token);
    }
    if name_parts.is_empty() {
        return None;
    }

    let hours = match hours {
        Some(h) if h != 0.0 => h,
        _ => DEFAULT_HOURS,
    };
    Some(Intent::AddSubject {
        name: name_parts.join(" "),
        hours,
    })
}

/// The token following a leading `keyword`, kept in its original case.
fn argument_after(text: &str, keyword: &str) -> Option<String> {
    let mut tokens = text.split_whitespace();
    let first = tokens.next()?;
    if !first.eq_ignore_ascii_case(keyword) {
        return None;
    }
    tokens
        .find(|t| !t.eq_ignore_ascii_case("task"))
        .map(str::to_string)
}
