//! Timebox Viewer - interactive timebox queries over a time-series chart.
//!
//! Loads a long-format CSV (or a generated demo dataset), draws one line
//! per entity and lets the user filter them by drawing timeboxes.

use anyhow::Context;
use clap::Parser;
use iced::application;

use timebox_common::{Dataset, init_tracing, load_csv};
use timebox_engine::{ChartSession, SessionSnapshot};
use timebox_viewer::args::ViewerArgs;
use timebox_viewer::demo::DemoGenerator;
use timebox_viewer::{Launch, TimeboxViewer, ViewerConfig};

/// Width of the legend panel next to the chart.
const LEGEND_WIDTH: f32 = 240.0;

fn main() -> anyhow::Result<()> {
    let args = ViewerArgs::parse();

    let mut config = ViewerConfig::load(args.config.as_deref())?;
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config.logging)?;

    tracing::info!("Starting Timebox Viewer");

    let dataset = load_dataset(&args, &config)?;
    let mut session = ChartSession::new(dataset, config.engine.clone());

    if let Some(path) = &args.timeboxes {
        let snapshot = SessionSnapshot::load(path)
            .with_context(|| format!("Failed to restore timeboxes from {}", path.display()))?;
        session.restore(&snapshot);
    }

    let launch = Launch {
        session,
        export_path: args.export.clone().unwrap_or(config.export_path),
    };
    let chart = &config.engine.chart;

    // Run the Iced application
    application(
        move || TimeboxViewer::boot(launch.clone()),
        TimeboxViewer::update,
        TimeboxViewer::view,
    )
    .title(TimeboxViewer::title)
    .theme(TimeboxViewer::theme)
    .window_size((chart.width + LEGEND_WIDTH, chart.height))
    .run()
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

fn load_dataset(args: &ViewerArgs, config: &ViewerConfig) -> anyhow::Result<Dataset> {
    match &args.data {
        Some(path) => load_csv(path, &config.data)
            .with_context(|| format!("Failed to load dataset from {}", path.display())),
        None => {
            if !args.demo {
                tracing::info!("No --data given, using the demo dataset");
            }
            Ok(DemoGenerator::new().generate()?)
        }
    }
}
