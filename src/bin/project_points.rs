use perspective_projector::config::project::{self, InputConfig};
use perspective_projector::io::{load_points, load_record_table, write_json_file};
use perspective_projector::{LogProgress, Projector};
use std::env;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = project::load_config(Path::new(&config_path))?;

    let h = config.homography()?;
    let options = config.projector_options()?;
    let image_size = options.image_size;
    let projector = Projector::new(&h, options);
    let progress = LogProgress::new("project_points", config.progress_step_percent);

    match &config.input {
        InputConfig::Points { path } => {
            let points = load_points(path)?;
            let batch = projector.batch_with_progress(&points, &progress);
            let out: Vec<Option<[f64; 2]>> = batch
                .points()
                .into_iter()
                .map(|p| p.map(|t| t.to_array()))
                .collect();
            write_json_file(&config.output, &out)?;
            println!(
                "Projected {} points into {}x{} target ({} degenerate) -> {}",
                batch.len(),
                image_size.width,
                image_size.height,
                batch.failures().len(),
                config.output.display()
            );
        }
        InputConfig::Table { path, .. } => {
            let fields = config
                .input
                .table_fields()
                .ok_or("Table input without field names")?;
            let table = load_record_table(path)?;
            let projected = projector
                .table_with_progress(&table, &fields, &progress)
                .map_err(|e| format!("Failed to project {}: {e}", path.display()))?;
            write_json_file(&config.output, &projected.table)?;
            println!(
                "Projected {} rows into {}x{} target ({} degenerate) -> {}",
                projected.table.len(),
                image_size.width,
                image_size.height,
                projected.failures.len(),
                config.output.display()
            );
        }
    }

    Ok(())
}

fn usage() -> String {
    "Usage: project_points <config.json>".to_string()
}
