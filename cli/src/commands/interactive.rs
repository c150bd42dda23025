//! Interactive chat command

use super::{build_agent, thinking_spinner};
use crate::config::CliConfigLoader;
use anyhow::Result;
use budgie_core::llm::MessageRole;
use budgie_core::AgentExecutor;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

const HISTORY_PREVIEW_CHARS: usize = 120;

/// Chat with one agent until EOF or `/exit`
pub async fn interactive_command(
    config_loader: CliConfigLoader,
    trajectory_file: Option<PathBuf>,
) -> Result<()> {
    let config = config_loader.load().await?;
    let mut agent = build_agent(config, trajectory_file.as_deref())?;

    println!("{}", "🐦 budgie - your budget assistant".bold());
    println!("{}\n", "Type /help for commands, /exit to quit.".dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{} ", "you ›".green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match line.trim() {
            "" => continue,
            "/exit" | "/quit" => break,
            "/help" => print_help(),
            "/reset" => {
                agent.reset();
                println!("{}", "Conversation cleared.".dimmed());
            }
            "/history" => print_history(&agent),
            input => {
                let spinner = thinking_spinner();
                let reply = agent.run(input).await;
                spinner.finish_and_clear();

                match reply {
                    Ok(reply) => println!("{} {}\n", "budgie ›".cyan().bold(), reply),
                    Err(e) => eprintln!("{} Error processing message: {}\n", "✗".red(), e),
                }
            }
        }
    }

    println!("{}", "Bye!".dimmed());
    Ok(())
}

fn print_help() {
    println!("  /reset    start a new conversation");
    println!("  /history  show the transcript");
    println!("  /exit     quit");
}

fn print_history(agent: &AgentExecutor) {
    for message in agent.history() {
        if message.role == MessageRole::System {
            continue;
        }

        let label = match (&message.role, &message.name) {
            (MessageRole::Tool, Some(name)) => format!("tool:{}", name),
            (role, _) => role.as_str().to_string(),
        };
        let mut text: String = message
            .content
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(HISTORY_PREVIEW_CHARS)
            .collect::<String>()
            .replace('\n', " ");
        if !message.tool_calls.is_empty() {
            let names: Vec<&str> = message.tool_calls.iter().map(|c| c.name.as_str()).collect();
            text.push_str(&format!(" [calls: {}]", names.join(", ")));
        }

        println!("  {} {}", format!("{:>10}", label).dimmed(), text);
    }
}
