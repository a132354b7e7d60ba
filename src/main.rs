use anyhow::Context;
use clap::Parser;
use sonoview::replay::ReplayScript;
use sonoview::{init_logging, AnnotationEvent, AnnotationFile, BusEvent, Config, EventBus};
use sonoview::{EventBusConfig, EventFilter};
use std::path::PathBuf;

/// Replay a scripted annotation session and print its layer listing as JSON.
#[derive(Parser, Debug)]
#[command(
    name = "sonoview",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"),
    about = "Headless SonoView annotation session replay"
)]
struct Args {
    /// Replay script (JSON)
    script: PathBuf,

    /// Engine configuration file (.json or .toml); defaults to the user config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the resulting annotations to this file
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging()?;

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load_or_default()?,
    };

    let bus: EventBus<AnnotationEvent> = EventBus::with_config(EventBusConfig {
        enable_history: true,
        ..Default::default()
    });
    bus.subscribe(EventFilter::All, |event| {
        tracing::info!("[{}] {}", event.category(), event.description());
    });

    let script = ReplayScript::load_from_file(&args.script)?;
    let controller = script.run(&config, &bus)?;
    tracing::info!(
        "Replayed {} steps, {} events, {} shapes",
        script.steps.len(),
        bus.history(None).len(),
        controller.shapes().len()
    );

    let entries = controller.layer_entries();
    println!(
        "{}",
        serde_json::to_string_pretty(&entries).context("Failed to serialize layer entries")?
    );

    if let Some(path) = &args.save {
        let name = args
            .script
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "session".to_string());
        AnnotationFile::from_controller(name, &controller).save_to_file(path)?;
    }

    Ok(())
}
