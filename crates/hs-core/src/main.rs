//! hmmseg - segment symbol sequences with a hidden Markov model
//!
//! Commands:
//! - `decode`: Viterbi or posterior decoding of a job file or model + sequence
//! - `sample`: draw a synthetic path and sequence from a model
//! - `config show`: print the resolved decoder configuration

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use hs_common::{format_error_human, DecodeMethod, Error, OutputFormat, Result, StructuredError};
use hs_config::{load_config, LoadedConfig};
use hs_core::exit_codes::ExitCode;
use hs_core::logging::{generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use hs_core::{sample, DecodeJob, DecodeReport, ModelSpec, SequenceInput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// Segment symbol sequences into runs of hidden states
#[derive(Parser)]
#[command(name = "hmmseg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Options shared by every command
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Decoder config file (overrides HMMSEG_CONFIG and the XDG location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Minimum log level on stderr
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format on stderr
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a sequence into state segments
    Decode(DecodeArgs),

    /// Sample a hidden path and observations from a model
    Sample(SampleArgs),

    /// Configuration management
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Job file holding a model and a sequence
    #[arg(long, short = 'i', required_unless_present = "model", conflicts_with = "model")]
    input: Option<PathBuf>,

    /// Model file (use with --sequence)
    #[arg(long, short = 'm', requires = "sequence")]
    model: Option<PathBuf>,

    /// Sequence text, one symbol per character
    #[arg(long, short = 's', requires = "model")]
    sequence: Option<String>,

    /// Decoding method (defaults to the job's, then the config's)
    #[arg(long)]
    method: Option<DecodeMethod>,
}

#[derive(Args, Debug)]
struct SampleArgs {
    /// Model file
    #[arg(long, short = 'm')]
    model: PathBuf,

    /// Number of positions to draw
    #[arg(long, short = 'n')]
    length: usize,

    /// RNG seed for a reproducible draw
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the resolved configuration and where it came from
    Show,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(ExitCode::ArgsError.as_i32());
        }
        Err(e) => e.exit(),
    };

    let log_config = LogConfig::from_env(cli.global.log_level, cli.global.log_format);
    init_logging(&log_config);

    let run_id = generate_run_id();
    tracing::debug!(run_id = %run_id, "hmmseg started");

    let result = match &cli.command {
        Commands::Decode(args) => run_decode(&cli.global, args),
        Commands::Sample(args) => run_sample(&cli.global, args),
        Commands::Config(args) => match args.command {
            ConfigCommands::Show => run_config_show(&cli.global),
        },
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Clean,
        Err(err) => report_error(&cli.global, &err),
    };
    tracing::debug!(run_id = %run_id, exit_code = %exit_code, "hmmseg finished");
    std::process::exit(exit_code.as_i32());
}

fn report_error(global: &GlobalOpts, err: &Error) -> ExitCode {
    match global.format {
        OutputFormat::Json => eprintln!("{}", StructuredError::from(err).to_json()),
        OutputFormat::Summary => {
            let use_color = !global.no_color && std::io::stderr().is_terminal();
            eprintln!("{}", format_error_human(err, use_color));
        }
    }
    ExitCode::from(err)
}

fn load(global: &GlobalOpts) -> Result<LoadedConfig> {
    Ok(load_config(global.config.as_deref())?)
}

fn read_model(path: &Path) -> Result<ModelSpec> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

// ============================================================================
// decode
// ============================================================================

fn run_decode(global: &GlobalOpts, args: &DecodeArgs) -> Result<()> {
    let loaded = load(global)?;
    let job = match (&args.input, &args.model, &args.sequence) {
        (Some(input), _, _) => DecodeJob::from_file(input)?,
        (None, Some(model), Some(sequence)) => DecodeJob {
            model: read_model(model)?,
            sequence: SequenceInput::Text(sequence.clone()),
            method: None,
        },
        _ => {
            return Err(Error::Config(
                "decode needs --input, or --model together with --sequence".to_string(),
            ))
        }
    };

    let report = job.run(&loaded.config, args.method)?;
    match global.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Summary => print_decode_summary(&report),
    }
    Ok(())
}

fn print_decode_summary(report: &DecodeReport) {
    println!(
        "{}: {} positions, {} segments, log P(X) = {:.4}",
        report.method,
        report.sequence_len,
        report.segments.len(),
        report.log_likelihood
    );
    for (state, count) in &report.segment_counts {
        let mean = report.mean_segment_len.get(state).copied().unwrap_or(0.0);
        println!("  {}: {} segments, mean length {:.1}", state, count, mean);
    }
    for seg in &report.segments {
        println!("{}", seg);
    }
}

// ============================================================================
// sample
// ============================================================================

#[derive(Serialize)]
struct SampleOutput<'a> {
    schema_version: &'static str,
    length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    states: Vec<&'a str>,
    symbols: Vec<&'a str>,
}

fn run_sample(global: &GlobalOpts, args: &SampleArgs) -> Result<()> {
    let loaded = load(global)?;
    let model = read_model(&args.model)?.build(loaded.config.row_sum_tolerance)?;
    loaded.config.check_sequence_len(args.length)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let drawn = sample(&model, args.length, &mut rng)?;

    let output = SampleOutput {
        schema_version: hs_common::SCHEMA_VERSION,
        length: drawn.len(),
        seed: args.seed,
        states: drawn.state_names(&model),
        symbols: drawn.symbol_names(&model),
    };
    match global.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Summary => {
            println!("{}", output.symbols.join(" "));
            println!("{}", output.states.join(" "));
        }
    }
    Ok(())
}

// ============================================================================
// config show
// ============================================================================

fn run_config_show(global: &GlobalOpts) -> Result<()> {
    let loaded = load(global)?;
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": hs_common::SCHEMA_VERSION,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "source": loaded.source.to_string(),
                "path": loaded.path.as_ref().map(|p| p.display().to_string()),
                "config": &loaded.config,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Summary => {
            match &loaded.path {
                Some(p) => println!("Config: {} ({})", p.display(), loaded.source),
                None => println!("Config: using built-in defaults"),
            }
            println!("  method: {}", loaded.config.method);
            match loaded.config.max_sequence_len {
                Some(max) => println!("  max_sequence_len: {}", max),
                None => println!("  max_sequence_len: unlimited"),
            }
            println!("  row_sum_tolerance: {}", loaded.config.row_sum_tolerance);
        }
    }
    Ok(())
}
