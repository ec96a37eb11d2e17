//! Party CLI
//!
//! Reference harness for the party module: loads a host state (scene
//! tokens + settings) from JSON, runs one operation against it and
//! prints the response envelope, the chat output and the mutated
//! scene. Useful for trying out spread layouts and slot configs
//! without a game client.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use party_core::host::HostAdapter;
use party_core::{
    find_party_json, group_party_json, health_check_json, toggle_party_json, MemoryHost,
    PartyModule, SCHEMA_VERSION,
};

#[derive(Parser)]
#[command(name = "party_cli")]
#[command(about = "Drive the party module against an in-memory host", long_about = None)]
struct Cli {
    /// Host state JSON (tokens, settings, selection)
    #[arg(long)]
    host: Option<PathBuf>,

    /// Write the mutated host state back to this file
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crunch or explode a party slot
    Toggle {
        /// Party slot number (1-5)
        #[arg(long)]
        party: u8,
    },

    /// Group tokens into a party slot
    Group {
        #[arg(long)]
        party: u8,

        /// Party token name
        #[arg(long)]
        name: String,

        /// Comma-separated token names to select first; without this,
        /// the selection stored in the host state is used
        #[arg(long)]
        select: Option<String>,
    },

    /// Select and focus a party slot's visible side
    Find {
        #[arg(long)]
        party: u8,
    },

    /// Print the module and slot status report
    Health,

    /// Print the 25-cell spread table
    Spread,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = run(cli)?;
    println!("{}", output);
    Ok(())
}

fn run(cli: Cli) -> Result<String> {
    if let Commands::Spread = cli.command {
        return Ok(render_spread_table());
    }

    let host_path = cli.host.context("--host <file> is required for this command")?;
    let host_json = std::fs::read_to_string(&host_path)
        .with_context(|| format!("failed to read host state from {}", host_path.display()))?;
    let mut host: MemoryHost = serde_json::from_str(&host_json)
        .with_context(|| format!("invalid host state in {}", host_path.display()))?;
    if let Commands::Group { select: Some(names), .. } = &cli.command {
        select_by_names(&mut host, names)?;
    }
    let mut module = PartyModule::new(host);

    let response = match &cli.command {
        Commands::Toggle { party } => {
            toggle_party_json(&mut module, &party_request(*party))
        }
        Commands::Group { party, name, .. } => {
            let request = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "party_no": party,
                "party_name": name,
            })
            .to_string();
            group_party_json(&mut module, &request)
        }
        Commands::Find { party } => find_party_json(&mut module, &party_request(*party)),
        Commands::Health => health_check_json(&module),
        Commands::Spread => unreachable!("handled above"),
    };

    let mut output = String::new();
    match response {
        Ok(body) => output.push_str(&pretty(&body)),
        Err(body) => output.push_str(&pretty(&body)),
    }

    let host = module.into_host();
    for message in &host.chat_log {
        output.push_str(&format!("\n[chat] {}: {}", message.speaker, message.content));
    }
    for note in &host.notifications {
        output.push_str(&format!("\n[{:?}] {}", note.level, note.text));
    }

    if let Some(out_path) = &cli.out {
        let state = serde_json::to_string_pretty(&host)?;
        std::fs::write(out_path, state)
            .with_context(|| format!("failed to write host state to {}", out_path.display()))?;
        output.push_str(&format!("\nhost state written to {}", out_path.display()));
    }

    Ok(output)
}

fn party_request(party: u8) -> String {
    serde_json::json!({ "schema_version": SCHEMA_VERSION, "party_no": party }).to_string()
}

/// Replace the host selection with the tokens named in `names`.
fn select_by_names(host: &mut MemoryHost, names: &str) -> Result<()> {
    let wanted: Vec<String> =
        names.split(',').map(|n| n.trim().to_lowercase()).filter(|n| !n.is_empty()).collect();
    let ids: Vec<_> = host
        .tokens
        .iter()
        .filter(|t| wanted.contains(&t.name.to_lowercase()))
        .map(|t| t.id.clone())
        .collect();
    anyhow::ensure!(!ids.is_empty(), "no scene token matches --select {}", names);
    host.select_tokens(&ids).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

fn pretty(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .and_then(|v| serde_json::to_string_pretty(&v))
        .unwrap_or_else(|_| body.to_string())
}

fn render_spread_table() -> String {
    let mut out = String::from("index  dx  dy\n");
    for (index, (dx, dy)) in party_core::spread::SPREAD_OFFSETS.iter().enumerate() {
        out.push_str(&format!("{:>5} {:>3} {:>3}\n", index, dx, dy));
    }
    out
}
