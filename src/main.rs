//! oast-decode - find, validate and decode OAST callback domains
//!
//! Thin command-line front end over the library: arguments and env config in,
//! text or JSON lines out.

use oast_decode::{
    decode, extract_and_decode, extract_domains, validate, CliConfig, DecodedPreamble, OastError,
    OutputFormat, Result, KNOWN_SUFFIXES,
};
use serde::Serialize;
use std::env;
use std::process;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

/// Parsed command line
#[derive(Debug)]
struct Invocation {
    command: String,
    args: Vec<String>,
    config: CliConfig,
}

#[tokio::main]
async fn main() {
    // Initialize the library
    if let Err(e) = oast_decode::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("oast-decode {}", oast_decode::VERSION);
        return;
    }

    let invocation = match parse_args(args) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{}", e.user_message());
            process::exit(2);
        }
    };

    init_logging(&invocation.config.log_filter);

    match run(&invocation).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{}", e.user_message());
            process::exit(1);
        }
    }
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Split flags from positionals; flags override the environment.
fn parse_args(args: Vec<String>) -> Result<Invocation> {
    let mut config = CliConfig::from_env()?;
    let mut positionals = Vec::new();

    for arg in args {
        match arg.as_str() {
            "--json" => config.format = OutputFormat::Json,
            "--text" => config.format = OutputFormat::Text,
            "--pretty" => config.pretty = true,
            flag if flag.starts_with("--") => {
                return Err(OastError::cli(format!("unknown option '{}'", flag)));
            }
            _ => positionals.push(arg),
        }
    }

    let mut positionals = positionals.into_iter();
    let command = positionals
        .next()
        .ok_or_else(|| OastError::cli("missing command"))?;

    Ok(Invocation {
        command,
        args: positionals.collect(),
        config,
    })
}

/// Run a command and return the process exit code.
async fn run(invocation: &Invocation) -> Result<i32> {
    let config = &invocation.config;
    match invocation.command.as_str() {
        "validate" => {
            require_args(&invocation.args, "validate")?;
            let mut all_valid = true;
            for input in &invocation.args {
                let valid = validate(input);
                all_valid &= valid;
                match config.format {
                    OutputFormat::Text => println!("{}\t{}", input, valid),
                    OutputFormat::Json => emit_json(&ValidationRecord { input, valid }, config)?,
                }
            }
            Ok(if all_valid { 0 } else { 1 })
        }
        "decode" => {
            require_args(&invocation.args, "decode")?;
            for input in &invocation.args {
                print_decoded(&decode(input), config)?;
            }
            Ok(0)
        }
        "extract" => {
            let text = read_input(invocation.args.first().map(String::as_str)).await?;
            let domains = extract_domains(&text)?;
            tracing::info!(count = domains.len(), "Extraction completed");
            match config.format {
                OutputFormat::Text => domains.iter().for_each(|d| println!("{}", d)),
                OutputFormat::Json => emit_json(&domains, config)?,
            }
            Ok(0)
        }
        "extract-decode" => {
            let text = read_input(invocation.args.first().map(String::as_str)).await?;
            let decoded = extract_and_decode(&text)?;
            tracing::info!(count = decoded.len(), "Extraction completed");
            match config.format {
                OutputFormat::Text => {
                    for record in &decoded {
                        print_decoded(record, config)?;
                    }
                }
                OutputFormat::Json => emit_json(&decoded, config)?,
            }
            Ok(0)
        }
        "suffixes" => {
            match config.format {
                OutputFormat::Text => KNOWN_SUFFIXES.iter().for_each(|s| println!("{}", s)),
                OutputFormat::Json => emit_json(&KNOWN_SUFFIXES, config)?,
            }
            Ok(0)
        }
        other => Err(OastError::cli(format!("unknown command '{}'", other))),
    }
}

#[derive(Serialize)]
struct ValidationRecord<'a> {
    input: &'a str,
    valid: bool,
}

fn require_args(args: &[String], command: &str) -> Result<()> {
    if args.is_empty() {
        return Err(OastError::cli(format!("'{}' needs at least one domain", command)));
    }
    Ok(())
}

/// Read a file, or stdin when `path` is absent or `-`. Invalid UTF-8 is replaced.
async fn read_input(path: Option<&str>) -> Result<String> {
    let bytes = match path {
        None | Some("-") => {
            let mut buf = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buf)
                .await
                .map_err(|e| OastError::io(e.to_string(), Some("<stdin>".to_string())))?;
            buf
        }
        Some(path) => tokio::fs::read(path)
            .await
            .map_err(|e| OastError::io(e.to_string(), Some(path.to_string())))?,
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn emit_json<T: Serialize + ?Sized>(value: &T, config: &CliConfig) -> Result<()> {
    let rendered = if config.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", rendered);
    Ok(())
}

fn print_decoded(record: &DecodedPreamble, config: &CliConfig) -> Result<()> {
    match config.format {
        OutputFormat::Json => emit_json(record, config),
        OutputFormat::Text => {
            if record.valid {
                let issued = record
                    .issued_at()
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}\tts={} ({}) machine={} pid={} counter={} ksort={} campaign={} nonce={}",
                    record.original,
                    record.timestamp,
                    issued,
                    record.machine_id,
                    record.pid,
                    record.counter,
                    record.ksort,
                    record.campaign,
                    if record.nonce.is_empty() { "-" } else { record.nonce.as_str() },
                );
            } else {
                println!(
                    "{}\terror: {}",
                    record.original,
                    record.error.as_deref().unwrap_or("unknown error")
                );
            }
            Ok(())
        }
    }
}

/// Print help information
fn print_help() {
    println!("oast-decode {} - find, validate and decode OAST callback domains", oast_decode::VERSION);
    println!();
    println!("USAGE:");
    println!("    oast-decode <COMMAND> [ARGS] [--json|--text] [--pretty]");
    println!();
    println!("COMMANDS:");
    println!("    validate <DOMAIN>...       Check full OAST domains (exit 1 if any is invalid)");
    println!("    decode <DOMAIN>...         Decode subdomains, FQDNs or bare preambles");
    println!("    extract [FILE|-]           List OAST domains found in a file or stdin");
    println!("    extract-decode [FILE|-]    Extract, then decode every match");
    println!("    suffixes                   List recognized provider suffixes");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    OAST_FORMAT    Output format: text or json (default: text)");
    println!("    OAST_PRETTY    Pretty-print JSON when set to 1/true");
    println!("    OAST_LOG       Log filter, e.g. debug or oast_decode=trace (default: warn)");
}
