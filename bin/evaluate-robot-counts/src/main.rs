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

#![warn(missing_docs)]

//! Sweep the number of robots and average the results over many seeds.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use cleaning_robots::{Float, Int, SimulationConfig, SimulationEngine, SimulationReport};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Sweep robot counts from 1 up to a maximum and print averaged reports.
#[derive(Debug, Parser)]
#[command(name = "evaluate-robot-counts")]
struct CliArgs {
    /// JSON config for the room; `nRobots` is replaced by the sweep and `seed` is the first seed.
    config: Option<PathBuf>,

    /// Largest robot count to try.
    #[arg(
        long,
        value_name = "COUNT",
        default_value_t = 20,
        value_parser = clap::value_parser!(i32).range(1..)
    )]
    max_robots: Int,

    /// Runs per robot count, each with its own seed.
    #[arg(
        long,
        value_name = "COUNT",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    seeds: u64,
}

/// Averages for one robot count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct Summary {
    n_robots: Int,
    runs: usize,
    mean_elapsed_steps: Float,
    mean_cleaned_percentage: Float,
    mean_total_moves: Float,
    fully_cleaned_runs: usize,
}

fn mean(reports: &[SimulationReport], value: impl Fn(&SimulationReport) -> Float) -> Float {
    if reports.is_empty() {
        return 0.0;
    }
    reports.iter().map(value).sum::<Float>() / reports.len() as Float
}

fn summarize(n_robots: Int, reports: &[SimulationReport]) -> Summary {
    Summary {
        n_robots,
        runs: reports.len(),
        mean_elapsed_steps: mean(reports, |r| r.elapsed_steps as Float),
        mean_cleaned_percentage: mean(reports, |r| r.cleaned_percentage),
        mean_total_moves: mean(reports, |r| r.total_moves as Float),
        fully_cleaned_runs: reports
            .iter()
            .filter(|r| r.cleaned_percentage >= 100.0)
            .count(),
    }
}

// Each (robot count, seed) pair is an independent run with its own engine and generator.
fn evaluate(base: SimulationConfig, max_robots: Int, seeds: u64) -> anyhow::Result<Vec<Summary>> {
    (1..=max_robots)
        .map(|n_robots| -> anyhow::Result<Summary> {
            let reports = (0..seeds)
                .into_par_iter()
                .map(|seed| -> anyhow::Result<SimulationReport> {
                    let config = SimulationConfig {
                        n_robots,
                        seed: base.seed.wrapping_add(seed),
                        ..base
                    };
                    Ok(SimulationEngine::from_config(config)?.run())
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            Ok(summarize(n_robots, &reports))
        })
        .collect()
}

fn load_config(path: &Path) -> anyhow::Result<SimulationConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = serde_json::from_str(&contents)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let base = match &args.config {
        Some(path) => load_config(path)?,
        None => SimulationConfig::default(),
    };
    info!(?base, max_robots = args.max_robots, seeds = args.seeds, "evaluating");

    let summaries = evaluate(base, args.max_robots, args.seeds)?;
    println!("robots  mean_steps  mean_cleaned%  mean_moves  fully_cleaned");
    for s in &summaries {
        println!(
            "{:>6}  {:>10.2}  {:>13.2}  {:>10.2}  {:>6}/{}",
            s.n_robots,
            s.mean_elapsed_steps,
            s.mean_cleaned_percentage,
            s.mean_total_moves,
            s.fully_cleaned_runs,
            s.runs
        );
    }
    println!("{}", serde_json::to_string(&summaries)?);
    Ok(())
}
