// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `fftplan sweep` command: re-run the assignment under different
//! temp-buffer budgets and compare the outcomes.
//!
//! Useful for answering "is the extra temporary worth it?": a bigger
//! budget can unlock more fusions at the cost of more device memory.

use std::path::PathBuf;

pub fn execute(plan_path: PathBuf, budgets: String) -> anyhow::Result<()> {
    let manifest = plan_ir::PlanManifest::from_file(&plan_path).map_err(|e| {
        anyhow::anyhow!("failed to load plan from '{}': {e}", plan_path.display())
    })?;

    let budget_list = parse_budgets(&budgets)?;

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              fftplan · Budget Sweep                 ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  Plan: {}", manifest.name);
    println!();
    println!(
        "  {:<36} {:>8} {:>10} {:>10}",
        "Temp budget", "Fused", "Buffers", "Result",
    );
    println!("  {}", "-".repeat(68));

    for budget in &budget_list {
        let mut m = manifest.clone();
        m.temp_buffers = budget.clone();

        let label = if budget.is_empty() {
            "(none)".to_string()
        } else {
            budget.join("+")
        };

        let plan = match plan_ir::PlanLoader::from_manifest(&m) {
            Ok(p) => p,
            Err(e) => {
                println!("  {:<36} {:>8} {:>10} {:>10}", label, "-", "-", "invalid");
                tracing::warn!("budget '{label}' rejected: {e}");
                continue;
            }
        };

        match buffer_assign::assign_buffers(plan) {
            Ok(assigned) => println!(
                "  {:<36} {:>8} {:>10} {:>10}",
                label,
                assigned.num_fused_nodes(),
                assigned.used_buffers().len(),
                "ok",
            ),
            Err(e) => {
                println!("  {:<36} {:>8} {:>10} {:>10}", label, "-", "-", "no plan");
                tracing::debug!("budget '{label}': {e}");
            }
        }
    }
    println!();

    Ok(())
}

/// Parses "temp,temp+temp_cmplx" into per-budget slot-name lists.
///
/// Slot names are validated here so a typo fails the whole sweep
/// instead of silently shrinking one budget.
fn parse_budgets(arg: &str) -> anyhow::Result<Vec<Vec<String>>> {
    let mut budgets = Vec::new();
    for entry in arg.split(',') {
        let entry = entry.trim();
        let mut slots = Vec::new();
        if !entry.is_empty() && entry != "none" {
            for name in entry.split('+') {
                let name = name.trim();
                let slot = plan_ir::BufferSlot::from_str_loose(name)
                    .ok_or_else(|| anyhow::anyhow!("unknown buffer slot '{name}'"))?;
                if !slot.is_temp() {
                    anyhow::bail!("'{name}' is not a temp buffer slot");
                }
                slots.push(slot.as_str().to_string());
            }
        }
        budgets.push(slots);
    }
    Ok(budgets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_budgets() {
        let budgets = parse_budgets("temp,temp+temp_cmplx,none").unwrap();
        assert_eq!(budgets.len(), 3);
        assert_eq!(budgets[0], vec!["temp"]);
        assert_eq!(budgets[1], vec!["temp", "temp_cmplx"]);
        assert!(budgets[2].is_empty());
    }

    #[test]
    fn test_parse_budgets_rejects_unknown_slot() {
        assert!(parse_budgets("temp,bogus").is_err());
    }

    #[test]
    fn test_parse_budgets_rejects_user_slot() {
        assert!(parse_budgets("user_in").is_err());
    }
}
