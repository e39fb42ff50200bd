use clap::Subcommand;
use xptrack_core::{Config, DailyGoal, Database, GoalStore, IncomeProjector};

#[derive(Subcommand)]
pub enum IncomeAction {
    /// Project income metrics for the current (or an explicit) goal
    Show {
        /// Project this goal value instead of the stored one
        #[arg(long)]
        goal: Option<i64>,
    },
}

pub fn run(action: IncomeAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        IncomeAction::Show { goal } => {
            let goal = match goal {
                // A what-if value is validated but not persisted.
                Some(value) => DailyGoal::new(value)?,
                None => GoalStore::new(Database::open()?).get()?,
            };
            let projection = IncomeProjector::new(config.economy, config.course).project(goal);
            println!("{}", serde_json::to_string_pretty(&projection)?);
        }
    }
    Ok(())
}
