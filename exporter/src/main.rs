use acquire::args::CandidateArgs;
use acquire::repeaterbook::RepeaterBookClient;
use clap::Parser;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::{RunRequest, Runner};

mod acquire;
mod render;
mod workflow;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Maintain the repeater registry and export radio channel lists and map pins"
)]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Registry JSON file, overriding the workflow config
    #[arg(long)]
    registry: Option<PathBuf>,
    /// Distance in degrees under which repeaters share a map pin
    #[arg(long)]
    threshold: Option<f64>,
    /// Rebuild the outputs from the registry without adding a repeater
    #[arg(long, default_value_t = false)]
    regen: bool,
    #[command(flatten)]
    candidate: CandidateArgs,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = match &args.workflow {
        Some(path) => WorkflowConfig::load(path)?,
        None => WorkflowConfig::default(),
    }
    .with_overrides(args.registry.clone(), args.threshold);
    workflow_config.validate()?;

    let source = RepeaterBookClient::new(&workflow_config.repeaterbook_url)?;
    let runner = Runner::new(workflow_config, Box::new(source));

    let request = RunRequest {
        regen: args.regen,
        lookup_id: args.candidate.id.clone(),
        overrides: args.candidate.to_record(),
    };
    let result = runner.execute(&request)?;

    for table in [&result.chirp, &result.d878] {
        if table.metrics.skipped > 0 {
            println!(
                "{} : {} repeaters skipped for missing or unusable fields.",
                table.target, table.metrics.skipped
            );
        }
    }
    if let Some(added) = &result.appended {
        println!("Added {} to the registry.", added.display_name());
    }
    println!(
        "Map : {} pins for {} repeaters in {} groups.",
        result.pins.len(),
        result.registry_size,
        result.group_count
    );
    println!("Wrote {} files.", result.written.len());

    Ok(())
}
