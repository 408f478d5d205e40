//! Request log inspection and export.

use std::path::PathBuf;

use clap::Subcommand;

use medicart_client::{LogFilter, LogLevel};

use crate::context::Context;

#[derive(Subcommand)]
pub enum LogAction {
    /// Show recorded entries
    Show {
        /// Only entries at this level (DEBUG, INFO, WARN, ERROR)
        #[arg(short, long)]
        level: Option<String>,

        /// Only entries whose message contains this substring
        #[arg(short, long)]
        contains: Option<String>,
    },
    /// Export entries as newline-delimited text
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Drop all recorded entries
    Clear,
}

pub fn run(action: LogAction, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let log = ctx.client().request_log();

    match action {
        LogAction::Show { level, contains } => {
            let filter = LogFilter {
                level: level.as_deref().map(parse_level).transpose()?,
                message_contains: contains,
                since: None,
            };
            for entry in log.filter(&filter) {
                let data = entry
                    .data
                    .map_or_else(String::new, |d| format!(" | {d}"));
                println!(
                    "[{}] [{}] {}{data}",
                    entry.timestamp.to_rfc3339(),
                    entry.level.as_str(),
                    entry.message,
                );
            }
        }
        LogAction::Export { output } => {
            let text = log.export();
            match output {
                Some(path) => {
                    std::fs::write(&path, &text)?;
                    println!("Exported {} entries to {}", log.len(), path.display());
                }
                None => println!("{text}"),
            }
        }
        LogAction::Clear => {
            log.clear();
            println!("Logs cleared");
        }
    }
    Ok(())
}

fn parse_level(s: &str) -> Result<LogLevel, Box<dyn std::error::Error>> {
    match s.to_ascii_uppercase().as_str() {
        "DEBUG" => Ok(LogLevel::Debug),
        "INFO" => Ok(LogLevel::Info),
        "WARN" => Ok(LogLevel::Warn),
        "ERROR" => Ok(LogLevel::Error),
        other => Err(format!("unknown log level: {other}").into()),
    }
}
