use std::path::PathBuf;

use anyhow::{Context, Result};
use app_utils::{InitFromEnv, init_from_env, init_tracing};
use classroom_api::classroom::ClassroomBuilder;
use classroom_api::roster::Roster;
use classroom_api::store::save_classroom;
use clap::Parser;
use tracing::info;

use crate::report::missing_submissions;

mod report;

/// Ingests a submissions directory tree into a classroom JSON snapshot.
#[derive(Debug, Parser)]
struct Args {
    /// Submissions root; overrides SUBMISSIONS_DIR.
    #[arg(long)]
    directory: Option<PathBuf>,
    /// Skip the archive-expansion pass.
    #[arg(long)]
    skip_unzip: bool,
    /// Roster CSV used to fix up identity fields; overrides ROSTER_PATH.
    #[arg(long)]
    roster: Option<PathBuf>,
    /// Print the missing-submission report as CSV rows.
    #[arg(long)]
    csv: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let InitFromEnv {
        catalog,
        submissions_dir,
        classroom_json,
        roster_path,
    } = init_from_env()?;
    let directory = args.directory.unwrap_or(submissions_dir);
    let roster_path = args.roster.or(roster_path);

    let builder = ClassroomBuilder::new(&directory, &catalog);

    if !args.skip_unzip {
        let outcomes = builder.unzip()?;
        let failures = outcomes.iter().filter(|outcome| !outcome.succeeded()).count();
        info!(archives = outcomes.len(), failures, "archive expansion finished");
    }

    let mut classroom = builder.build().context("could not build classroom")?;

    if let Some(roster_path) = roster_path {
        let roster = Roster::from_path(&roster_path)?;
        roster
            .apply(&mut classroom)
            .context("could not reconcile classroom against roster")?;
    }

    save_classroom(&classroom, &classroom_json)?;
    info!(
        students = classroom.students().len(),
        snapshot = %classroom_json.display(),
        "classroom saved"
    );

    let missing = missing_submissions(&classroom);
    if !missing.is_empty() {
        if args.csv {
            for report in &missing {
                println!("{}", report.csv_string());
            }
        } else {
            println!("Missing submissions:");
            for report in &missing {
                println!("{report}");
            }
        }
    }

    Ok(())
}
