/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use cleaning_robots::{SimulationConfig, SimulationEngine};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Run the cleaning robots once and print how it went.
#[derive(Debug, Parser)]
#[command(name = "run-cleaning-simulation")]
struct CliArgs {
    /// JSON file with any of m, n, nRobots, pDirty, tMax and seed. Keys left out keep their
    /// default values (a 5x5 room, 15 robots, 60% dirty, 50 steps).
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SimulationConfig::default(),
    };
    info!(?config, "starting");

    let mut engine = SimulationEngine::from_config(config)?;
    let report = engine.run();

    println!("Total time spent: {}", report.elapsed_steps);
    println!("Percentage of clean cells: {:.2}", report.cleaned_percentage);
    println!("Total moves by agents: {}", report.total_moves);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<SimulationConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = serde_json::from_str(&contents)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::CommandFactory;
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_cli_args() {
        CliArgs::command().debug_assert();

        let args = CliArgs::try_parse_from(["run-cleaning-simulation"]).expect("parse failed");
        assert_eq!(args.config, None);

        let args = CliArgs::try_parse_from(["run-cleaning-simulation", "room.json"])
            .expect("parse failed");
        assert_eq!(args.config, Some(PathBuf::from("room.json")));

        assert!(CliArgs::try_parse_from(["run-cleaning-simulation", "a.json", "b.json"]).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().expect("create temp file");
        write!(file, r#"{{"m": 4, "n": 6, "nRobots": 2, "seed": 9}}"#).expect("write config");

        let config = load_config(file.path()).expect("load failed");
        assert_eq!(config, SimulationConfig::new(4, 6, 2, 0.6, 50).with_seed(9));
    }

    #[test]
    fn test_load_config_bad_json_is_error() {
        let mut file = NamedTempFile::new().expect("create temp file");
        write!(file, "{{not json").expect("write config");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_missing_file_is_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        assert!(load_config(&dir.path().join("missing.json")).is_err());
    }
}
