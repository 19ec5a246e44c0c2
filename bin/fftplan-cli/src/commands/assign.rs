// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `fftplan assign` command: run the assignment search and print the
//! winning buffer/layout decision per node.

use std::path::PathBuf;

pub fn execute(plan_path: PathBuf, json: bool) -> anyhow::Result<()> {
    let plan = plan_ir::PlanLoader::load(&plan_path).map_err(|e| {
        anyhow::anyhow!("failed to load plan from '{}': {e}", plan_path.display())
    })?;

    let name = plan.name.clone();
    let assigned = buffer_assign::assign_buffers(plan)
        .map_err(|e| anyhow::anyhow!("assignment failed for '{name}': {e}"))?;

    if json {
        let out = serde_json::json!({
            "name": assigned.name,
            "nodes": assigned.nodes,
            "fused": assigned.fused_spans(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             fftplan · Buffer Assignment             ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  {}", assigned.summary());
    println!();

    println!(
        "  {:<4} {:<24} {:<18} {:<34} {:>6}",
        "Idx", "Name", "Kind", "Assignment", "Fused",
    );
    println!("  {}", "-".repeat(90));

    for node in assigned.iter_nodes() {
        let placement = node
            .assignment()
            .map(|p| format!("{p}"))
            .unwrap_or_else(|| "unassigned".to_string());
        let fused = if assigned
            .fused_spans()
            .iter()
            .any(|s| s.first <= node.index && node.index <= s.last)
        {
            "yes"
        } else {
            ""
        };
        println!(
            "  {:<4} {:<24} {:<18} {:<34} {:>6}",
            node.index,
            truncate(&node.name, 24),
            node.kind.as_str(),
            placement,
            fused,
        );
    }
    println!();

    println!(
        "  Fused: {} of {} nodes ({} ranges)",
        assigned.num_fused_nodes(),
        assigned.num_nodes(),
        assigned.fused_spans().len(),
    );
    println!("  Buffers touched: {}", assigned.used_buffers());
    println!();

    Ok(())
}

/// Truncates a string to `max_len` characters with ellipsis if needed.
///
/// Counts characters rather than bytes; node names come from user
/// manifests and may not be ASCII.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
