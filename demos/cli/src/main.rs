use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use log::info;
use vision_core::{CardConfig, RawCardConfig};
use vision_hass::summarize_states_str;

#[derive(Parser, Debug)]
#[command(
    name = "vision-cli",
    about = "Render the vision events card from a Home Assistant states JSON dump."
)]
struct Args {
    /// Path to the states JSON (the `hass.states` map or a whole `hass` object).
    #[arg(short, long)]
    input: PathBuf,

    /// Calendar entity holding the events.
    #[arg(short, long)]
    entity: Option<String>,

    /// Maximum number of events to show.
    #[arg(short = 'n', long)]
    events: Option<usize>,

    /// Keyword table and UI language (en, pl).
    #[arg(short, long)]
    language: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Could not read file {:?}", args.input))?;

    let config = CardConfig::try_from(RawCardConfig {
        calendar_entity: args.entity,
        number_of_events: args.events.map(|n| n as f64),
        refresh_interval: None,
        language: args.language,
    })?;
    info!("Rendering {} with {:?}", args.input.display(), config);

    let view = summarize_states_str(&data, &config, &Local::now())?;

    if let Some(placeholder) = &view.placeholder {
        println!("{placeholder}");
    }
    for group in &view.groups {
        println!("{}", group.label);
        for entry in &group.entries {
            println!("  [{}] {}  {}", entry.icon, entry.title, entry.secondary);
            if let Some(key_frame) = &entry.key_frame {
                println!("      {key_frame}");
            }
        }
    }

    Ok(())
}
