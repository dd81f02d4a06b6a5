use abi_gen::{AbiConverter, ContractModel, EndpointKind, EndpointPolicy, RustCodeGeneratorOptions};
use abi_loader::load_contract_abi;
use abi_reflect::Reflector;
use abi_types::{AbiDocument, ResolvedType};
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::CodegenConfig;

#[derive(Parser)]
#[command(name = "abi")]
#[command(about = "MultiversX ABI toolchain - binding generation, analysis and return-data decoding")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Rust client bindings from a contract ABI
    Codegen {
        /// Contract ABI file (JSON, or YAML by extension)
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file: PathBuf,

        /// Output directory for generated code
        #[arg(short = 'o', long = "output", value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Crate the generated code imports its runtime from
        #[arg(long = "runtime-crate", value_name = "CRATE")]
        runtime_crate: Option<String>,

        /// Drop endpoints that fail to convert instead of failing the run
        #[arg(long = "allow-partial")]
        allow_partial: bool,

        /// YAML config file (defaults to ./abi-gen.yaml when present)
        #[arg(long = "config", value_name = "FILE")]
        config: Option<PathBuf>,

        /// Enable verbose output
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },

    /// Show resolved types, composites and endpoint decode strategies
    Analyze {
        /// Contract ABI file
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file: PathBuf,

        /// Print the resolved model as JSON
        #[arg(long = "json")]
        json: bool,

        /// Enable verbose output
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },

    /// Decode raw return slots of a readonly endpoint and print JSON
    Decode {
        /// Contract ABI file
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file: PathBuf,

        /// Endpoint name as declared in the ABI
        #[arg(short = 'e', long = "endpoint")]
        endpoint: String,

        /// Hex-encoded return slot, repeated in order
        #[arg(long = "slot", value_name = "HEX")]
        slots: Vec<String>,

        /// Pretty-print the JSON output
        #[arg(long = "pretty")]
        pretty: bool,

        /// Enable verbose output
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config_path, verbose) = match &cli.command {
        Commands::Codegen { config, verbose, .. } => (config.as_deref(), *verbose),
        Commands::Analyze { verbose, .. } => (None, *verbose),
        Commands::Decode { verbose, .. } => (None, *verbose),
    };
    let cwd = std::env::current_dir().context("failed to read working directory")?;
    let config = CodegenConfig::load(config_path, &cwd)?;
    init_tracing(if verbose { "debug" } else { config.log_filter.as_str() })?;

    match cli.command {
        Commands::Codegen { file, output_dir, runtime_crate, allow_partial, .. } => {
            let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
            let runtime_crate = runtime_crate.unwrap_or_else(|| config.runtime_crate.clone());
            run_codegen(&file, &output_dir, runtime_crate, allow_partial || config.allow_partial)
        }
        Commands::Analyze { file, json, .. } => run_analyze(&file, json),
        Commands::Decode { file, endpoint, slots, pretty, .. } => run_decode(&file, &endpoint, &slots, pretty),
    }
}

/// Logs go to stderr so JSON on stdout stays machine-readable. `RUST_LOG`
/// wins over the config file and `-v`.
fn init_tracing(fallback: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .with_context(|| format!("invalid log filter '{}'", fallback))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    Ok(())
}

fn load(file: &Path) -> anyhow::Result<AbiDocument> {
    load_contract_abi(file).with_context(|| format!("failed to load ABI {}", file.display()))
}

fn run_codegen(
    file: &Path,
    output_dir: &Path,
    runtime_crate: String,
    allow_partial: bool,
) -> anyhow::Result<()> {
    let document = load(file)?;
    let policy = if allow_partial { EndpointPolicy::SkipFailed } else { EndpointPolicy::Strict };
    let options = RustCodeGeneratorOptions { runtime_crate, ..Default::default() };
    debug!(?policy, runtime = %options.runtime_crate, "starting code generation");

    let conversion = AbiConverter::new(&document)
        .and_then(|converter| converter.convert(policy, options))
        .with_context(|| format!("failed to convert {}", file.display()))?;

    for failure in conversion.failures() {
        warn!(endpoint = %failure.endpoint, error = %failure.error.root(), "endpoint dropped from bindings");
    }

    let path = conversion.write_to(output_dir)?;
    info!(path = %path.display(), "code generation complete");
    println!(
        "Generated {} ({} endpoints, {} skipped)",
        path.display(),
        conversion.model.endpoints.len(),
        conversion.failures().len()
    );
    Ok(())
}

fn run_analyze(file: &Path, json: bool) -> anyhow::Result<()> {
    let document = load(file)?;
    let model = AbiConverter::new(&document)?.analyze(EndpointPolicy::SkipFailed)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&model)?);
    } else {
        print!("{}", render_analysis(&model));
    }
    Ok(())
}

fn render_analysis(model: &ContractModel) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Contract: {} ({} {})\n",
        model.name, model.framework, model.framework_version
    ));

    if !model.custom_types.is_empty() {
        let aliases: Vec<&str> = model.custom_types.iter().map(|kind| kind.keyword()).collect();
        out.push_str(&format!("Aliases: {}\n", aliases.join(", ")));
    }

    out.push_str("Named types:\n");
    for (name, fields) in &model.catalog.records {
        out.push_str(&format!("  {} (struct, {} fields)\n", name, fields.len()));
    }
    for (name, variants) in &model.catalog.enums {
        out.push_str(&format!("  {} (enum, {} variants)\n", name, variants.len()));
    }

    if !model.catalog.composites.is_empty() {
        out.push_str("Composites:\n");
        for (name, fields) in &model.catalog.composites {
            let members: Vec<String> = fields.iter().map(|f| f.field_type.to_string()).collect();
            out.push_str(&format!("  {} = <{}>\n", name, members.join(",")));
        }
    }

    out.push_str("Endpoints:\n");
    for endpoint in &model.endpoints {
        let mut tags = vec![match endpoint.kind {
            EndpointKind::Readonly => "readonly",
            EndpointKind::Mutable => "mutable",
        }];
        if endpoint.only_owner {
            tags.push("owner");
        }
        if endpoint.accepts_token_payment {
            tags.push("payable");
        }
        out.push_str(&format!("  {} -> {} [{}]\n", endpoint.name, endpoint.method_name, tags.join(", ")));
        for (output, plan) in endpoint.outputs.iter().zip(&endpoint.plans) {
            out.push_str(&format!(
                "    {}: {} from slot {}\n",
                output.ty,
                plan.strategy.label(),
                plan.first_slot
            ));
        }
    }

    for name in &model.skipped {
        out.push_str(&format!("Skipped: {} (unknown mutability)\n", name));
    }
    for failure in &model.failures {
        out.push_str(&format!("Failed: {}: {}\n", failure.endpoint, failure.error.root()));
    }
    out
}

fn run_decode(file: &Path, endpoint_name: &str, slots: &[String], pretty: bool) -> anyhow::Result<()> {
    let document = load(file)?;
    let model = AbiConverter::new(&document)?.analyze(EndpointPolicy::SkipFailed)?;

    let Some(endpoint) = model.endpoints.iter().find(|e| e.name == endpoint_name) else {
        if let Some(failure) = model.failures.iter().find(|f| f.endpoint == endpoint_name) {
            bail!("endpoint '{}' cannot be decoded: {}", endpoint_name, failure.error.root());
        }
        bail!("endpoint '{}' not found in {}", endpoint_name, file.display());
    };
    if endpoint.kind != EndpointKind::Readonly {
        bail!("endpoint '{}' is not readonly; mutable calls return a transaction hash", endpoint_name);
    }

    let raw: Vec<Vec<u8>> = slots
        .iter()
        .enumerate()
        .map(|(index, slot)| hex::decode(slot).with_context(|| format!("slot {} is not valid hex", index)))
        .collect::<anyhow::Result<_>>()?;

    let outputs: Vec<ResolvedType> = endpoint.outputs.iter().map(|o| o.ty.clone()).collect();
    let values = Reflector::new(&model.catalog).decode_outputs(endpoint_name, &outputs, &raw)?;

    let rendered = if endpoint.has_named_outputs() {
        let mut object = serde_json::Map::new();
        for (output, value) in endpoint.outputs.iter().zip(&values) {
            object.insert(output.name.clone().unwrap_or_default(), serde_json::to_value(value)?);
        }
        serde_json::Value::Object(object)
    } else {
        serde_json::to_value(&values)?
    };

    if pretty {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        println!("{}", serde_json::to_string(&rendered)?);
    }
    Ok(())
}
