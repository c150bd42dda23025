//! Tools listing command

use anyhow::Result;
use budgie_core::{create_budget_registry, Ledger};
use colored::Colorize;
use tracing::info;

/// Show available tools and their parameters
pub async fn tools_command() -> Result<()> {
    info!("Listing available tools");

    // Listing needs no real ledger
    let registry = create_budget_registry(Ledger::in_memory()?);

    println!("🛠️  Available Tools\n");

    for tool in registry.get_all() {
        println!("📦 {}", tool.name().bold());
        let description = tool.description();
        println!("   {}", description.lines().next().unwrap_or(description));

        for parameter in tool.parameters() {
            let marker = if parameter.required { "" } else { "?" };
            println!(
                "     • {}{} ({}): {}",
                parameter.name,
                marker,
                parameter.param_type.as_str(),
                parameter.description
            );
        }
        println!();
    }

    println!("{} tools registered", registry.len());
    Ok(())
}
