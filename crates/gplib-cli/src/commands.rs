use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use gplib_config::{ConfigStore, FileSystem, OsFileSystem, StringConfigStore};
use gplib_types::{codec, TypedValue, ValueKind};
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Show(args) => cmd_show(args, cli.format),
        Command::Get(args) => cmd_get(args, cli.format),
        Command::Set(args) => cmd_set(args),
        Command::Init(args) => cmd_init(args),
    }
}

fn cmd_show(args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let store = load_existing(&args.file)?;
    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = store
                .iter()
                .map(|(key, value)| entry_json(key, value))
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            if store.is_empty() {
                println!("No values in {}.", args.file.display());
            }
            for (key, value) in store.iter() {
                println!(
                    "{} {} {}",
                    key.bold(),
                    format!("({})", value.kind()).dimmed(),
                    value
                );
            }
        }
    }
    Ok(())
}

fn cmd_get(args: GetArgs, format: OutputFormat) -> anyhow::Result<()> {
    let store = load_existing(&args.file)?;
    let value = store.require(&args.key)?;
    match format {
        OutputFormat::Json => println!("{}", entry_json(&args.key, value)),
        OutputFormat::Text => println!("{value}"),
    }
    Ok(())
}

fn cmd_set(args: SetArgs) -> anyhow::Result<()> {
    if !OsFileSystem.exists(&args.file) {
        bail!("config file not found: {}", args.file.display());
    }
    let value = parse_value(&args.value, args.kind)?;
    // Untyped, so every other value keeps its exact on-disk token.
    let mut store = StringConfigStore::open(&args.file, BTreeMap::new())?;
    store.set(args.key.clone(), codec::encode(&value));
    store.save()?;
    println!(
        "{} {} = {} {}",
        "✓".green().bold(),
        args.key.bold(),
        value,
        format!("({})", value.kind()).dimmed()
    );
    Ok(())
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    let defaults = read_defaults(&args.defaults)?;
    let existed = OsFileSystem.exists(&args.file);
    let store = ConfigStore::open(&args.file, defaults)?;
    if !existed {
        println!(
            "{} Created {} with {} default values",
            "✓".green().bold(),
            args.file.display().to_string().bold(),
            store.len()
        );
    } else if store.repaired().is_empty() {
        println!("{} {} is complete", "✓".green().bold(), args.file.display());
    } else {
        println!(
            "{} Repaired {}",
            "✓".green().bold(),
            args.file.display().to_string().bold()
        );
        for key in store.repaired() {
            println!("  {} {}", "added:".yellow(), key);
        }
    }
    Ok(())
}

/// Open a file that must already exist, sniffing every value.
fn load_existing(path: &Path) -> anyhow::Result<ConfigStore> {
    if !OsFileSystem.exists(path) {
        bail!("config file not found: {}", path.display());
    }
    tracing::debug!(file = %path.display(), "loading config without defaults");
    Ok(ConfigStore::open(path, BTreeMap::new())?)
}

/// Read a JSON object of canonical tokens and sniff each into a default.
fn read_defaults(path: &Path) -> anyhow::Result<BTreeMap<String, TypedValue>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading defaults from {}", path.display()))?;
    let raw: BTreeMap<String, String> = serde_json::from_str(&data)
        .with_context(|| format!("defaults file {} is not a JSON object of strings", path.display()))?;
    Ok(raw
        .into_iter()
        .map(|(key, token)| {
            let value = codec::sniff(&token);
            (key, value)
        })
        .collect())
}

fn parse_value(raw: &str, kind: Option<ValueKind>) -> anyhow::Result<TypedValue> {
    match kind {
        Some(kind) => Ok(codec::decode(raw, kind)?),
        None => Ok(codec::sniff(raw)),
    }
}

fn entry_json(key: &str, value: &TypedValue) -> serde_json::Value {
    json!({
        "key": key,
        "kind": value.kind(),
        "value": codec::encode(value),
    })
}
