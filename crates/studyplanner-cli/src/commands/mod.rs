pub mod chat;
pub mod clear;
pub mod config;
pub mod exam;
pub mod schedule;
pub mod stats;
pub mod subject;
pub mod task;

use studyplanner_core::{Config, CoreError, JsonFileStore, Planner};

/// Open the planner over the default data directory.
pub fn open_planner() -> Result<Planner<JsonFileStore>, CoreError> {
    let config = Config::load()?;
    Planner::open(JsonFileStore::open_default()?, &config)
}
