// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `fftplan inspect` command: display plan structure without running
//! the assignment search.

use std::path::PathBuf;

pub fn execute(plan_path: PathBuf) -> anyhow::Result<()> {
    let plan = plan_ir::PlanLoader::load(&plan_path).map_err(|e| {
        anyhow::anyhow!("failed to load plan from '{}': {e}", plan_path.display())
    })?;

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              fftplan · Plan Inspector               ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    println!("  Plan: {}", plan.name);
    println!("  Precision: {}", plan.precision);
    println!("  Input:  {}", plan.input);
    println!("  Output: {}", plan.output);
    println!("  Temp budget: {}", plan.temp_buffers);
    println!("  Available buffers: {}", plan.available_buffers());
    println!(
        "  Available layouts: {}",
        plan.available_layouts()
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    );
    println!();

    println!(
        "  {:<4} {:<24} {:<18} {:<14} {:<12} {:>6}",
        "Idx", "Name", "Kind", "Length", "Placement", "Unit",
    );
    println!("  {}", "-".repeat(82));

    for node in plan.iter_nodes() {
        let placement = match node.placement {
            plan_ir::Placement::InPlace => "in_place",
            plan_ir::Placement::OutOfPlace => "out_of_place",
            plan_ir::Placement::Either => "either",
        };
        println!(
            "  {:<4} {:<24} {:<18} {:<14} {:<12} {:>6}",
            node.index,
            super::assign::truncate(&node.name, 24),
            node.kind.as_str(),
            format!("{:?}", node.length),
            placement,
            if node.unit_stride_out { "yes" } else { "" },
        );
    }
    println!();

    if plan.shims.is_empty() {
        println!("  No fusion candidates.");
    } else {
        println!("  Fusion candidates:");
        for shim in &plan.shims {
            println!("   {shim}");
        }
    }
    println!();

    Ok(())
}
