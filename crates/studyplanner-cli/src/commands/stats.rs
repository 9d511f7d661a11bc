use super::open_planner;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let planner = open_planner()?;
    println!("{}", serde_json::to_string_pretty(&planner.get_stats())?);
    Ok(())
}
