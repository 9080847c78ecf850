use anyhow::Result;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::fmt::Display;

use super::view_models::{CommandResultViewModel, StatusLevel};

/// Prints command results to stdout, as JSON or as text.
pub struct ConsoleRenderer {
    json_mode: bool,
    colored: bool,
}

impl ConsoleRenderer {
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            colored: std::io::stdout().is_terminal(),
        }
    }

    pub fn render<T>(&self, result: CommandResultViewModel<T>) -> Result<()>
    where
        T: Serialize + Display,
    {
        if self.json_mode {
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }

        if let Some(badge) = &result.badge {
            if self.colored {
                let label = match badge.level {
                    StatusLevel::Success => badge.label.green().bold().to_string(),
                    StatusLevel::Info => badge.label.bold().to_string(),
                    StatusLevel::Warning => badge.label.yellow().bold().to_string(),
                    StatusLevel::Error => badge.label.red().bold().to_string(),
                };
                println!("{} {}", badge.icon(), label);
            } else {
                println!("{} {}", badge.icon(), badge.label);
            }
            println!();
        }

        print!("{}", result.content);

        if !result.suggestions.is_empty() {
            if self.colored {
                println!("\n{}", "Tips:".yellow().bold());
            } else {
                println!("\nTips:");
            }
            for tip in &result.suggestions {
                print!("  • {}", tip.description);
                if let Some(cmd) = &tip.command {
                    if self.colored {
                        print!(": {}", cmd.cyan());
                    } else {
                        print!(": {}", cmd);
                    }
                }
                println!();
            }
        }

        Ok(())
    }
}
