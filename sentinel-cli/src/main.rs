//! Sentinel command-line demo: load a config file, evaluate one endpoint
//! against a synthetic principal, print the decision as JSON.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{arg, command, Args, Parser, Subcommand};
use sentinel::SentinelBuilder;
use sentinel_types::StaticPrincipal;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, env = "SENTINEL_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "evaluate one endpoint against a synthetic principal")]
    Check(Check),
}

#[derive(Args, Debug)]
struct Check {
    #[arg(long, help = "e.g. \"GET /books?category=public\"")]
    endpoint: String,

    #[arg(long = "role", value_delimiter = ',')]
    roles: Vec<String>,

    #[arg(long = "permission", value_delimiter = ',')]
    permissions: Vec<String>,

    #[arg(long = "group", value_delimiter = ',')]
    groups: Vec<String>,

    #[arg(long = "custom", value_parser = parse_key_val)]
    custom: Vec<(String, String)>,

    #[arg(long, help = "require every query key the matched pattern declares")]
    strict: bool,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, found `{s}`"))
}

#[derive(Serialize)]
struct Decision {
    pass: bool,
}

#[derive(Serialize)]
struct Failure {
    error: String,
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let sentinel = match SentinelBuilder::new().with_config_file(&cli.config) {
        Ok(builder) => builder.build(),
        Err(e) => {
            print_failure(&e.to_string());
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Check(check) => run_check(&sentinel, check),
    }
}

fn run_check(sentinel: &sentinel::Sentinel, check: Check) {
    let principal = StaticPrincipal::new("cli")
        .with_roles(check.roles.clone())
        .with_permissions(check.permissions.clone())
        .with_groups(check.groups.clone());
    let custom: HashMap<String, String> = check.custom.into_iter().collect();

    let result = if check.strict {
        sentinel.strict_check(&check.endpoint, &principal, custom)
    } else {
        sentinel.check(&check.endpoint, &principal, custom)
    };

    match result {
        Ok(pass) => print_decision(pass),
        Err(e) => print_failure(&e.to_string()),
    }
}

fn print_decision(pass: bool) {
    let out = serde_json::to_string_pretty(&Decision { pass }).unwrap_or_else(|_| "{}".to_string());
    println!("{out}");
}

fn print_failure(message: &str) {
    let out = serde_json::to_string_pretty(&Failure {
        error: message.to_string(),
    })
    .unwrap_or_else(|_| "{}".to_string());
    println!("{out}");
}
