use clap::Subcommand;
use xptrack_core::{
    AsciiSurface, Config, Database, GoalStore, ProjectionController, RecordingSurface, TimeWindow,
};

#[derive(Subcommand)]
pub enum ChartAction {
    /// Render the projection chart in the terminal
    Render {
        /// Window length: 7, 30 or 90 days
        #[arg(long, default_value = "30")]
        window: TimeWindow,
        /// Terminal columns
        #[arg(long, default_value_t = 112)]
        cols: usize,
        /// Terminal rows
        #[arg(long, default_value_t = 28)]
        rows: usize,
    },
    /// Dump the drawing commands as JSON for a host frontend to replay
    Commands {
        /// Window length: 7, 30 or 90 days
        #[arg(long, default_value = "30")]
        window: TimeWindow,
    },
}

pub fn run(action: ChartAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let store = GoalStore::new(Database::open()?);

    match action {
        ChartAction::Render { window, cols, rows } => {
            let config = terminal_profile(&config);
            let surface = AsciiSurface::new(cols, rows);
            let mut controller = ProjectionController::new(store, &config, window, surface);
            let summary = controller.refresh()?;
            print!("{}", controller.surface());
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        ChartAction::Commands { window } => {
            let surface =
                RecordingSurface::new(config.chart.width as f64, config.chart.height as f64);
            let mut controller = ProjectionController::new(store, &config, window, surface);
            controller.refresh()?;
            println!(
                "{}",
                serde_json::to_string_pretty(controller.surface().commands())?
            );
        }
    }
    Ok(())
}

// One surface unit is one terminal cell, so the pixel paddings and text
// sizes are scaled down to cell counts.
fn terminal_profile(base: &Config) -> Config {
    let mut config = base.clone();
    config.chart.padding = 10.0;
    config.chart.top_padding = 2.0;
    config.chart.label_text_size = 1.0;
    config
}
