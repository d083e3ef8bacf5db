use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use classroom_api::catalog::QuestionCatalog;
use dotenvy::dotenv;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, registry, EnvFilter};

pub struct InitFromEnv {
    pub catalog: QuestionCatalog,
    pub submissions_dir: PathBuf,
    pub classroom_json: PathBuf,
    pub roster_path: Option<PathBuf>,
}

/// Reads the shared configuration (`.env` aware) and loads the question
/// catalog once. Catalog errors are fatal here, before any build runs.
pub fn init_from_env() -> Result<InitFromEnv> {
    dotenv().ok();

    let submissions_dir = path_from_env("SUBMISSIONS_DIR", "submissions");
    let classroom_json = path_from_env("CLASSROOM_JSON", "classroom.json");
    let catalog_path = path_from_env("CATALOG_PATH", "settings.toml");
    let roster_path = env::var("ROSTER_PATH").ok().map(PathBuf::from);

    let catalog = QuestionCatalog::from_path(&catalog_path)
        .with_context(|| format!("could not load question catalog `{}`", catalog_path.display()))?;

    Ok(InitFromEnv {
        catalog,
        submissions_dir,
        classroom_json,
        roster_path,
    })
}

fn path_from_env(var: &str, default: &str) -> PathBuf {
    env::var(var).unwrap_or_else(|_| default.to_owned()).into()
}

pub fn init_tracing() {
    registry()
        .with(fmt::layer().event_format(format().pretty()))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env()
                .unwrap(),
        )
        .init();
}
