use clap::Subcommand;
use xptrack_core::{Database, GoalStore, GOAL_PRESETS};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Current daily goal
    Get,
    /// Set a custom daily goal (whole number, 1-1000 XP/day)
    Set {
        /// New goal value
        value: String,
    },
    /// Select a goal preset
    Preset {
        /// Preset id (basic, casual, regular, serious, insane)
        id: String,
    },
    /// List available presets
    Presets,
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = GoalStore::new(Database::open()?);

    match action {
        GoalAction::Get => {
            let goal = store.get()?;
            print_goal(goal.value())?;
        }
        GoalAction::Set { value } => {
            // Free-form input goes through the same validation as presets.
            let goal = store.set_from_input(&value)?;
            print_goal(goal.value())?;
        }
        GoalAction::Preset { id } => {
            let goal = store.select_preset(&id)?;
            print_goal(goal.value())?;
        }
        GoalAction::Presets => {
            println!("{}", serde_json::to_string_pretty(&GOAL_PRESETS)?);
        }
    }
    Ok(())
}

fn print_goal(value: u32) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({ "xp_per_day": value }))?
    );
    Ok(())
}
