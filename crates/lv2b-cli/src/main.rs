use std::fs;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::info;

use lv2b_core::config::{self, CONFIG_FILE_NAME, Lv2bConfig, TargetId};
use lv2b_core::embed::chunk_text;
use lv2b_core::emit::Newline;
use lv2b_core::scan;
use lv2b_core::{Bundle, BundleEmitter, EmitOptions};
use lv2b_cpp::CppEmitter;
use lv2b_rust::RustEmitter;

#[derive(Parser)]
#[command(
    name = "lv2b",
    about = "Embed LV2 Turtle bundles into a generated source file",
    version,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    generate: GenerateArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the bundles that would be embedded, without rendering them
    Inspect {
        /// Root directory of the LV2 tree
        lv2_dir: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Initialize a new lv2b configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Root directory of the LV2 tree to embed
    lv2_dir: Option<PathBuf>,

    /// Output language [default: rust]
    #[arg(long)]
    target: Option<TargetId>,

    /// Maximum characters per string literal [default: 8000]
    #[arg(long)]
    chunk_size: Option<NonZeroUsize>,

    /// File whose text replaces the default preamble comment
    #[arg(long)]
    header: Option<PathBuf>,

    /// Terminator appended to the output: crlf or lf [default: crlf]
    #[arg(long)]
    newline: Option<Newline>,

    #[command(flatten)]
    scan: ScanArgs,
}

#[derive(Args)]
struct ScanArgs {
    /// File name suffix of embedded files [default: .ttl]
    #[arg(long)]
    suffix: Option<String>,

    /// Descend into symlinked directories
    #[arg(long)]
    follow_links: bool,

    /// Config file to use instead of ./.lv2b.yaml
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Inspect {
            lv2_dir,
            format,
            scan,
        }) => cmd_inspect(&lv2_dir, format, &scan),

        Some(Commands::Init { force }) => cmd_init(force),

        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "lv2b", &mut io::stdout());
            Ok(())
        }

        None => cmd_generate(cli.generate),
    }
}

/// Load the config file and apply the scan flags on top of it.
fn load_settings(args: &ScanArgs) -> Result<Lv2bConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let mut cfg = config::load_config(path)?
                .with_context(|| format!("config file {} not found", path.display()))?;
            // Header paths in a config file are relative to that file.
            if let (Some(header), Some(base)) = (&cfg.header, path.parent()) {
                cfg.header = Some(base.join(header));
            }
            cfg
        }
        None => config::load_config(Path::new(CONFIG_FILE_NAME))?.unwrap_or_default(),
    };

    if let Some(suffix) = &args.suffix {
        cfg.suffix = suffix.clone();
    }
    if args.follow_links {
        cfg.follow_links = true;
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Look up an emitter by its target.
fn get_emitter(id: TargetId) -> Box<dyn BundleEmitter> {
    match id {
        TargetId::Rust => Box::new(RustEmitter),
        TargetId::Cpp => Box::new(CppEmitter),
    }
}

fn scan_bundles(lv2_dir: &Path, cfg: &Lv2bConfig) -> Result<Vec<Bundle>> {
    scan::collect_bundles(lv2_dir, &cfg.scan_options())
        .with_context(|| format!("failed to collect bundles from {}", lv2_dir.display()))
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let Some(lv2_dir) = args.lv2_dir else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "the following required arguments were not provided:\n  <LV2_DIR>",
            )
            .exit();
    };

    let mut cfg = load_settings(&args.scan)?;
    if let Some(target) = args.target {
        cfg.target = target;
    }
    if let Some(chunk_size) = args.chunk_size {
        cfg.chunk_size = chunk_size;
    }
    if let Some(newline) = args.newline {
        cfg.newline = newline;
    }
    if let Some(header) = args.header {
        cfg.header = Some(header);
    }

    let header = cfg
        .header
        .as_ref()
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("failed to read header {}", path.display()))
        })
        .transpose()?;

    let bundles = scan_bundles(&lv2_dir, &cfg)?;
    let options = EmitOptions {
        chunk_size: cfg.chunk_size,
        header,
        newline: cfg.newline,
    };

    let emitter = get_emitter(cfg.target);
    let output = emitter
        .emit(&bundles, &options)
        .with_context(|| format!("failed to render {} output", emitter.id()))?;

    // Nothing reaches stdout unless rendering succeeded.
    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    info!(
        "embedded {} bundles ({} resources) as {}",
        bundles.len(),
        bundles.iter().map(|b| b.resources.len()).sum::<usize>(),
        emitter.id()
    );
    Ok(())
}

fn cmd_inspect(lv2_dir: &Path, format: InspectFormat, args: &ScanArgs) -> Result<()> {
    let cfg = load_settings(args)?;
    let bundles = scan_bundles(lv2_dir, &cfg)?;

    let summary = build_inspect_summary(lv2_dir, &bundles, cfg.chunk_size);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(
    lv2_dir: &Path,
    bundles: &[Bundle],
    chunk_size: NonZeroUsize,
) -> serde_json::Value {
    let bundles: Vec<serde_json::Value> = bundles
        .iter()
        .map(|bundle| {
            let resources: Vec<serde_json::Value> = bundle
                .resources
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "name": r.name,
                        "chars": r.contents.chars().count(),
                        "bytes": r.contents.len(),
                        "chunks": chunk_text(&r.contents, chunk_size).len(),
                    })
                })
                .collect();
            serde_json::json!({
                "name": bundle.name,
                "path": bundle.path.display().to_string(),
                "chars": bundle.char_count(),
                "resources": resources,
            })
        })
        .collect();

    serde_json::json!({
        "root": lv2_dir.display().to_string(),
        "chunk_size": chunk_size.get(),
        "bundles": bundles,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
