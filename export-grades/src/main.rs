use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use app_utils::{init_from_env, init_tracing, InitFromEnv};
use classroom_api::export::grade_rows;
use classroom_api::question::QuestionName;
use classroom_api::store::load_classroom;
use clap::Parser;
use tracing::info;

/// Writes one CSV of grade rows per question from the saved snapshot.
#[derive(Debug, Parser)]
struct Args {
    /// Only export this question (default: every question in the catalog).
    #[arg(long)]
    question: Option<String>,
    /// Directory the CSV files are written into.
    #[arg(long, default_value = "grades")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let InitFromEnv {
        catalog,
        classroom_json,
        ..
    } = init_from_env()?;
    let classroom = load_classroom(&classroom_json, &catalog)?;

    let selected: Vec<QuestionName> = match args.question {
        Some(name) => vec![QuestionName::new(name)],
        None => catalog.names().cloned().collect(),
    };

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("could not create `{}`", args.out_dir.display()))?;

    for name in &selected {
        catalog
            .get(name)
            .with_context(|| format!("question `{name}` is not in the catalog"))?;

        let rows = grade_rows(&classroom, name)?;
        let path = args.out_dir.join(format!("{name}.csv"));
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("could not create `{}`", path.display()))?;
        for row in &rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        info!(question = %name, rows = rows.len(), csv = %path.display(), "wrote grade export");
    }

    Ok(())
}
