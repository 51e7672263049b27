//! # Leapline Engine
//!
//! Headless host for the launch controller.
//!
//! Runs a scene at a fixed tick rate and prints a JSON report to stdout:
//!
//! ```text
//! leapline [scene.toml]
//! ```
//!
//! Logs go to stderr. `RUST_LOG` adjusts the filter and
//! `LEAPLINE_LOG_FORMAT=json` switches to JSON lines.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod world;

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::SceneConfig;

/// Main entry point.
fn main() -> Result<()> {
    init_tracing()?;

    info!("Leapline starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let scene = SceneConfig::load_or_default(path.as_deref())?;
    let report = app::run(&scene)?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    info!(launches = report.launches.len(), "Leapline shutdown complete");
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("leapline=info".parse()?);
    let json = std::env::var("LEAPLINE_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let layer = if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };

    tracing_subscriber::registry().with(layer).with(filter).init();
    Ok(())
}
