// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # fftplan
//!
//! Command-line interface for the fft-plan-rt buffer assignment planner.
//!
//! ## Usage
//! ```bash
//! # Assign buffers and layouts to a plan manifest
//! fftplan assign --plan ./plans/fft_2d_64x128.json
//!
//! # Inspect a plan manifest without assigning
//! fftplan inspect --plan ./plans/fft_2d_64x128.json
//!
//! # Sweep temp-buffer budgets and compare fusion outcomes
//! fftplan sweep --plan ./plans/fft_2d_64x128.json --budgets temp,temp+temp_cmplx
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fftplan",
    about = "Buffer and layout assignment planner for decomposed FFT plans",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign buffers and layouts to every node of a plan.
    Assign {
        /// Path to the plan manifest (JSON).
        #[arg(short, long)]
        plan: std::path::PathBuf,

        /// Emit the assigned plan as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Inspect a plan manifest: nodes, fusion candidates, budgets.
    Inspect {
        /// Path to the plan manifest (JSON).
        #[arg(short, long)]
        plan: std::path::PathBuf,
    },

    /// Re-run assignment under different temp-buffer budgets.
    Sweep {
        /// Path to the plan manifest (JSON).
        #[arg(short, long)]
        plan: std::path::PathBuf,

        /// Comma-separated budgets, each a `+`-joined list of temp slots
        /// (e.g., "temp,temp+temp_cmplx,temp+temp_cmplx+temp_blue").
        #[arg(short, long, default_value = "temp,temp+temp_cmplx")]
        budgets: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Assign { plan, json } => commands::assign::execute(plan, json),
        Commands::Inspect { plan } => commands::inspect::execute(plan),
        Commands::Sweep { plan, budgets } => commands::sweep::execute(plan, budgets),
    }
}
