use clap::Subcommand;
use xptrack_core::{Config, Database, GoalStore, SeriesGenerator, TimeWindow};

#[derive(Subcommand)]
pub enum SeriesAction {
    /// Generate the historical + projected series for the current goal
    Show {
        /// Window length: 7, 30 or 90 days
        #[arg(long, default_value = "30")]
        window: TimeWindow,
    },
}

pub fn run(action: SeriesAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let store = GoalStore::new(Database::open()?);

    match action {
        SeriesAction::Show { window } => {
            let goal = store.get()?;
            let series = SeriesGenerator::new(config.course).generate(goal, window.days())?;
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
    }
    Ok(())
}
