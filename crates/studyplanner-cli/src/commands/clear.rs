use super::open_planner;

pub fn run(yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !yes {
        return Err("refusing to clear without --yes".into());
    }
    let mut planner = open_planner()?;
    let summary = planner.clear_all()?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
