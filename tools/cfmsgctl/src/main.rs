// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! cfmsgctl - interface type inspection tool
//!
//! Lists the registered message and service types, prints their
//! definitions, and converts messages between JSON and wire bytes.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use cfmsg::json::{from_json, to_json};
use cfmsg::{Config, TypeRegistry};
use std::path::PathBuf;

/// Interface type inspection tool
#[derive(Parser, Debug)]
#[command(name = "cfmsgctl")]
#[command(version)]
#[command(about = "Inspect, encode and decode crazyflie_driver interface types")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Additional interface directory (repeatable)
    #[arg(short, long = "interfaces", global = true)]
    interfaces: Vec<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered types
    List {
        /// List services instead of message types
        #[arg(long)]
        services: bool,
    },
    /// Print the definition of a message type or service
    Show {
        /// Type or service name, e.g. crazyflie_driver/GoTo
        name: String,
    },
    /// Encode a JSON message and print the bytes as hex
    Encode {
        /// Message type name
        type_name: String,
        /// Message as a JSON object
        json: String,
    },
    /// Decode hex bytes and print the message as JSON
    Decode {
        /// Message type name
        type_name: String,
        /// Encoded bytes as hex (whitespace allowed)
        hex: String,
    },
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(args: &Args) -> Result<()> {
    let registry = load_registry(args)?;

    match &args.command {
        Command::List { services } => {
            let names = if *services {
                registry.service_names()
            } else {
                registry.type_names()
            };
            for name in names {
                println!("{}", name);
            }
        }
        Command::Show { name } => show(&registry, name)?,
        Command::Encode { type_name, json } => {
            let entry = registry.resolve(type_name)?;
            let value: serde_json::Value =
                serde_json::from_str(json).context("message is not valid JSON")?;
            let message = from_json(entry.schema(), &value)?;
            let bytes = entry.encode(&message)?;
            println!("{}", to_hex(&bytes));
        }
        Command::Decode { type_name, hex } => {
            let bytes = from_hex(hex)?;
            let message = registry.decode(type_name, &bytes)?;
            println!("{}", serde_json::to_string_pretty(&to_json(&message))?);
        }
    }
    Ok(())
}

fn load_registry(args: &Args) -> Result<TypeRegistry> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    config.interface_dirs.extend(args.interfaces.iter().cloned());
    let config = config.with_env()?;
    log::debug!(
        "cfmsgctl: {} interface directories, builtin={}",
        config.interface_dirs.len(),
        config.load_builtin
    );
    Ok(config.build_registry()?)
}

fn show(registry: &TypeRegistry, name: &str) -> Result<()> {
    if let Ok(service) = registry.resolve_service(name) {
        println!("{} {}", "service".cyan().bold(), service.name());
        print!("{}", service.request().definition_text());
        println!("---");
        print!("{}", service.response().definition_text());
        return Ok(());
    }
    let Ok(entry) = registry.resolve(name) else {
        bail!("unknown type or service: {}", name);
    };
    let schema = entry.schema();
    println!(
        "{} {} ({}, {})",
        "message".cyan().bold(),
        schema.name(),
        schema.signature(),
        match schema.fixed_size() {
            Some(size) => format!("{} bytes", size),
            None => format!("at least {} bytes", schema.min_size()),
        }
    );
    print!("{}", schema.definition_text());
    Ok(())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

fn from_hex(text: &str) -> Result<Vec<u8>> {
    let digits: Vec<char> = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        bail!("hex input has an odd number of digits");
    }
    digits
        .chunks(2)
        .map(|pair| {
            let s: String = pair.iter().collect();
            u8::from_str_radix(&s, 16).with_context(|| format!("invalid hex byte '{}'", s))
        })
        .collect()
}
