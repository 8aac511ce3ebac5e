use anyhow::{Context as AnyhowContext, Result};
use apiscope_explorer::{
    compute_analytics, search_endpoints, EndpointQuery, ExplorerError, LoadedSpec, LoaderConfig,
    SpecLoader, SpecSource,
};
use apiscope_protocol::{serialize_json_pretty, ErrorEnvelope, ProgressEvent, ProgressStage};
use apiscope_stream_parser::{Complexity, DocumentFormat, HttpMethod, ParseOptions};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    print_stdout(&serialize_json_pretty(value)?)
}

#[derive(Parser)]
#[command(name = "apiscope")]
#[command(about = "Stream-parse and explore OpenAPI / Swagger documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Bytes per read slice (overrides APISCOPE_CHUNK_SIZE)
    #[arg(long, global = true)]
    chunk_size: Option<usize>,

    /// Force the document format instead of sniffing it
    #[arg(long, global = true, value_enum)]
    format: Option<FormatArg>,

    /// Parse option preset
    #[arg(long, global = true, value_enum, default_value = "default")]
    preset: Preset,

    /// Size ceiling in bytes (overrides APISCOPE_MAX_FILE_SIZE)
    #[arg(long, global = true)]
    max_file_size: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and print its summary and parse metadata
    Parse(ParseArgs),

    /// List endpoints, optionally filtered
    Endpoints(EndpointsArgs),

    /// Print endpoint and schema statistics
    Analytics(SourceArgs),

    /// List schemas with metrics, or show one schema in detail
    Schemas(SchemasArgs),

    /// Score the compatibility of two schemas
    Compare(CompareArgs),
}

#[derive(Args)]
struct SourceArgs {
    /// URL, file path, or the document text itself
    source: String,
}

#[derive(Args)]
struct ParseArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Print the assembled document and every endpoint instead of the summary
    #[arg(long)]
    full: bool,
}

#[derive(Args)]
struct EndpointsArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Case-insensitive text filter
    #[arg(long)]
    query: Option<String>,

    /// HTTP method filter
    #[arg(long, short = 'm')]
    method: Option<HttpMethod>,

    /// Tag filter
    #[arg(long)]
    tag: Option<String>,

    /// Complexity filter (low, medium, high)
    #[arg(long)]
    complexity: Option<Complexity>,

    /// Only deprecated (true) or only active (false) endpoints
    #[arg(long)]
    deprecated: Option<bool>,

    /// Maximum number of endpoints
    #[arg(long, short = 'n')]
    limit: Option<usize>,
}

#[derive(Args)]
struct SchemasArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Show a single schema with dependencies and dependents
    #[arg(long)]
    name: Option<String>,
}

#[derive(Args)]
struct CompareArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// First schema name
    left: String,

    /// Second schema name
    right: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Json,
    Yaml,
}

impl From<FormatArg> for DocumentFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => Self::Json,
            FormatArg::Yaml => Self::Yaml,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    Default,
    Large,
    LowMemory,
}

impl Preset {
    fn options(self) -> ParseOptions {
        match self {
            Self::Default => ParseOptions::default(),
            Self::Large => ParseOptions::for_large_documents(),
            Self::LowMemory => ParseOptions::low_memory(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SchemaRow<'a> {
    name: &'a str,
    complexity: usize,
    depth: usize,
    property_count: usize,
    dependency_count: usize,
    circular_refs: bool,
}

/// Preset first, then `APISCOPE_*` variables, then command-line flags
fn loader_config(cli: &Cli, lookup: impl Fn(&str) -> Option<String>) -> LoaderConfig {
    let mut config = LoaderConfig {
        parse: cli.preset.options(),
        ..LoaderConfig::default()
    }
    .with_overrides(lookup);
    if let Some(chunk_size) = cli.chunk_size {
        config.parse.chunk_size = chunk_size;
    }
    if let Some(format) = cli.format {
        config.parse.format = Some(format.into());
    }
    if let Some(limit) = cli.max_file_size {
        config.max_file_size = limit;
    }
    config
}

fn log_progress(event: &ProgressEvent) {
    match event.stage {
        ProgressStage::Parsing => log::debug!("{:>5.1}% {}", event.percentage, event.message),
        _ => log::info!("{}: {}", event.stage.as_str(), event.message),
    }
}

async fn load(loader: &SpecLoader, raw: &str) -> Result<LoadedSpec> {
    let source = SpecSource::classify(raw)?;
    let parser = loader.parser()?.with_progress(log_progress);
    Ok(loader.load_with(&source, parser).await?)
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = loader_config(&cli, |key| std::env::var(key).ok());
    let loader = SpecLoader::new(config).context("Failed to build loader")?;
    let result = match cli.command {
        Commands::Parse(args) => run_parse(&loader, args).await,
        Commands::Endpoints(args) => run_endpoints(&loader, args).await,
        Commands::Analytics(args) => run_analytics(&loader, args).await,
        Commands::Schemas(args) => run_schemas(&loader, args).await,
        Commands::Compare(args) => run_compare(&loader, args).await,
    };

    if let Err(err) = &result {
        if let Some(explorer) = err.downcast_ref::<ExplorerError>() {
            let mut envelope = ErrorEnvelope::new(explorer.code(), explorer.to_string());
            if let Some(hint) = explorer.hint() {
                envelope = envelope.with_hint(hint);
            }
            print_json(&envelope)?;
        }
    }
    result
}

async fn run_parse(loader: &SpecLoader, args: ParseArgs) -> Result<()> {
    let loaded = load(loader, &args.source.source).await?;
    if args.full {
        #[derive(Serialize)]
        struct Full<'a> {
            spec: &'a apiscope_stream_parser::AssembledSpecification,
            endpoints: &'a [apiscope_stream_parser::EndpointRecord],
            metadata: &'a apiscope_protocol::ParseMetadata,
        }
        return print_json(&Full {
            spec: loaded.spec(),
            endpoints: loaded.endpoints(),
            metadata: loaded.metadata(),
        });
    }
    print_json(&loaded.summary())
}

async fn run_endpoints(loader: &SpecLoader, args: EndpointsArgs) -> Result<()> {
    let loaded = load(loader, &args.source.source).await?;
    let query = EndpointQuery {
        query: args.query,
        method: args.method,
        tag: args.tag,
        complexity: args.complexity,
        deprecated: args.deprecated,
        limit: args.limit,
    };
    print_json(&search_endpoints(loaded.endpoints(), &query))
}

async fn run_analytics(loader: &SpecLoader, args: SourceArgs) -> Result<()> {
    let loaded = load(loader, &args.source).await?;
    print_json(&compute_analytics(&loaded))
}

async fn run_schemas(loader: &SpecLoader, args: SchemasArgs) -> Result<()> {
    let loaded = load(loader, &args.source.source).await?;
    if let Some(name) = &args.name {
        return print_json(&loaded.schema_detail(name)?);
    }
    let rows: Vec<SchemaRow<'_>> = loaded
        .analysis()
        .all_metrics()
        .iter()
        .map(|(name, m)| SchemaRow {
            name,
            complexity: m.complexity,
            depth: m.depth,
            property_count: m.property_count,
            dependency_count: m.dependency_count,
            circular_refs: m.circular_refs,
        })
        .collect();
    print_json(&rows)
}

async fn run_compare(loader: &SpecLoader, args: CompareArgs) -> Result<()> {
    let loaded = load(loader, &args.source.source).await?;
    print_json(&loaded.compare(&args.left, &args.right)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiscope_explorer::{ENV_CHUNK_SIZE, ENV_MAX_FILE_SIZE};
    use std::collections::HashMap;

    fn config_for(args: &[&str], env: &[(&str, &str)]) -> LoaderConfig {
        let cli = Cli::parse_from(args);
        let env: HashMap<&str, &str> = env.iter().copied().collect();
        loader_config(&cli, |key| env.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn env_chunk_size_survives_preset() {
        let config = config_for(
            &["apiscope", "--preset", "low-memory", "parse", "spec.yaml"],
            &[(ENV_CHUNK_SIZE, "4096")],
        );
        let low_memory = ParseOptions::low_memory();
        assert_eq!(config.parse.chunk_size, 4096);
        assert_eq!(config.parse.max_memory_bytes, low_memory.max_memory_bytes);
    }

    #[test]
    fn flags_override_env_and_preset() {
        let config = config_for(
            &[
                "apiscope",
                "--preset",
                "large",
                "--chunk-size",
                "512",
                "--max-file-size",
                "99",
                "analytics",
                "spec.yaml",
            ],
            &[(ENV_CHUNK_SIZE, "4096"), (ENV_MAX_FILE_SIZE, "1000")],
        );
        assert_eq!(config.parse.chunk_size, 512);
        assert_eq!(config.max_file_size, 99);
    }

    #[test]
    fn default_preset_uses_default_options() {
        let config = config_for(&["apiscope", "parse", "spec.yaml"], &[]);
        assert_eq!(config.parse, ParseOptions::default());
        assert_eq!(config.max_file_size, apiscope_explorer::DEFAULT_MAX_FILE_SIZE);
    }
}
