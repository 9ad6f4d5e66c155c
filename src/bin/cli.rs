// CLI binary — panicking on unrecoverable errors is standard for CLI tools.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;

use chame_bridge::demo::MemoryBackend;
use chame_bridge::paths;
use chame_bridge::registry::catalog;
use chame_bridge::registry::execute::{dispatch_call, CommandResult};
use chame_bridge::reverse::UiLink;
use chame_bridge::state::AppState;

// ── CLI argument parsing ─────────────────────────────────────────

#[derive(Parser)]
#[command(name = "chame-cli", about = "Chame admin bridge headless CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output raw JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered commands
    List,
    /// Print the full command catalog (names, required params, schemas)
    Schema,
    /// Dispatch a command by name with a JSON argument object
    Call {
        /// Command name, e.g. `get_all_users`
        name: String,
        /// JSON object with the command arguments
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

// ── State initialization ─────────────────────────────────────────

fn initialize_state() -> Arc<AppState> {
    let app_config_dir = paths::app_config_dir();
    // The receiver is dropped immediately: reverse-channel events are
    // meaningless without a UI loop, and sends stay best-effort.
    let (ui, _ui_events) = UiLink::channel();
    Arc::new(AppState::new(
        Box::new(MemoryBackend::new()),
        ui,
        app_config_dir,
    ))
}

// ── Output formatting ────────────────────────────────────────────

fn print_result(result: &CommandResult, raw_json: bool) {
    if raw_json {
        println!(
            "{}",
            serde_json::to_string_pretty(result).unwrap_or_default()
        );
        if !result.is_ok() {
            process::exit(1);
        }
        return;
    }

    match result {
        CommandResult::Ok { message, payload } => {
            println!("{message}");
            if let Some(payload) = payload {
                // Payloads are JSON-serialized strings; pretty-print the data.
                match serde_json::from_str::<Value>(payload) {
                    Ok(data) => {
                        println!("{}", serde_json::to_string_pretty(&data).unwrap_or_default());
                    }
                    Err(_) => println!("{payload}"),
                }
            }
        }
        CommandResult::Error { error } => {
            eprintln!("Error: {error}");
            process::exit(1);
        }
    }
}

// ── Main ─────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&catalog::to_json_schema()).unwrap_or_default()
                );
                return;
            }
            for entry in catalog::command_registry() {
                let marker = if entry.mutating { "*" } else { " " };
                println!(
                    "{:<28}{marker} [{}] {}",
                    entry.name,
                    entry.category.slug(),
                    entry.description
                );
            }
            println!("\n(* = mutating)");
        }
        Commands::Schema => {
            println!(
                "{}",
                serde_json::to_string_pretty(&catalog::to_json_schema()).unwrap_or_default()
            );
        }
        Commands::Call { name, args } => {
            let args: Value = match serde_json::from_str(&args) {
                Ok(v @ Value::Object(_)) => v,
                Ok(_) => {
                    eprintln!("Error: --args must be a JSON object");
                    process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: invalid JSON in --args: {e}");
                    process::exit(1);
                }
            };
            let state = initialize_state();
            let result = dispatch_call(&state, &name, &args);
            print_result(&result, cli.json);
        }
    }
}
