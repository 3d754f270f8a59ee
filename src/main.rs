use clap::{Parser, Subcommand};
use figure_color::ColorMapping;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use figpolish::assets::{AssetCategory, AssetLoader};
use figpolish::error::BatchError;
use figpolish::models::{AppConfig, ExportFormat};
use figpolish::rendering::SvgRenderer;
use figpolish::services::batch::default_output_dir;
use figpolish::services::{
    list_processable_files, AnalysisEntry, BatchReport, BatchService, FileWatcher,
    ImproveOptions, ProcessEntry, TemplateService,
};

#[derive(Parser)]
#[command(name = "figpolish")]
#[command(about = "Publication styling and matplotlib cleanup for SVG/PDF figures")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by `improve` and `watch`
#[derive(clap::Args)]
struct ImproveArgs {
    /// Template id (defaults to config `default_template`)
    #[arg(short, long)]
    template: Option<String>,

    /// Output directory (defaults to `improved/` next to the inputs)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: svg, png or pdf (defaults to config `export_format`)
    #[arg(short, long)]
    format: Option<ExportFormat>,

    /// Always run matplotlib cleanup
    #[arg(long, conflicts_with = "no_cleanup")]
    cleanup: bool,

    /// Never run matplotlib cleanup
    #[arg(long)]
    no_cleanup: bool,

    /// Leave fonts unchanged
    #[arg(long)]
    no_fonts: bool,

    /// Leave colors and backgrounds unchanged
    #[arg(long)]
    no_colors: bool,

    /// Disable automatic palette mapping
    #[arg(long)]
    no_auto_color: bool,

    /// Explicit color map as JSON, e.g. '{"#1f77b4": "#4dbbd5"}'
    #[arg(long)]
    color_map: Option<String>,

    /// File name filter for directory input (e.g. 'fig_*')
    #[arg(short, long)]
    pattern: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report colors, elements and matplotlib detection without modifying files
    Analyze {
        /// Directory, file, or comma-separated file list
        input: String,

        /// Template whose palette is used for mapping suggestions
        #[arg(short, long)]
        template: Option<String>,

        /// File name filter for directory input
        #[arg(short, long)]
        pattern: Option<String>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply a publication template to every figure
    Improve {
        /// Directory, file, or comma-separated file list
        input: String,

        #[command(flatten)]
        args: ImproveArgs,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Process a directory, then re-process figures as they change
    Watch {
        /// Directory to watch
        input: PathBuf,

        #[command(flatten)]
        args: ImproveArgs,

        /// Stop after this many seconds (defaults to config `watch.duration_secs`)
        #[arg(long)]
        duration: Option<u64>,
    },
    /// List templates or show one
    Templates {
        /// Template id to show
        id: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Extract embedded assets to filesystem for customization
    Init {
        /// Extract templates/styles.json
        #[arg(long)]
        templates: bool,

        /// Extract config.yaml
        #[arg(long)]
        config: bool,

        /// Extract all assets
        #[arg(long)]
        all: bool,

        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init {
            templates,
            config,
            all,
            force,
            list,
        }) => run_init_command(templates, config, all, force, list),
        Some(command) => {
            init_tracing();
            let loader = AssetLoader::from_env();
            if let Err(e) = loader.seed_if_configured() {
                tracing::warn!(%e, "Failed to seed assets");
            }
            let config = AppConfig::load_from_assets(&loader);
            let templates = TemplateService::load(&loader)?;

            match command {
                Commands::Analyze {
                    input,
                    template,
                    pattern,
                    json,
                } => run_analyze_command(templates, &input, template, pattern, json),
                Commands::Improve { input, args, json } => {
                    run_improve_command(templates, &config, &input, args, json)
                }
                Commands::Watch {
                    input,
                    args,
                    duration,
                } => run_watch_command(templates, &config, input, args, duration).await,
                Commands::Templates { id, json } => run_templates_command(&templates, id, json),
                Commands::Init { .. } => Ok(()),
            }
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "figpolish=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn batch_service(templates: TemplateService) -> BatchService {
    BatchService::new(templates, SvgRenderer::new())
}

/// Merge command line flags over the config file
fn improve_options(
    config: &AppConfig,
    args: &ImproveArgs,
) -> anyhow::Result<(String, ExportFormat, ImproveOptions)> {
    let color_map = args
        .color_map
        .as_deref()
        .map(serde_json::from_str::<ColorMapping>)
        .transpose()
        .map_err(|e| anyhow::anyhow!("Invalid --color-map JSON: {e}"))?;

    let cleanup_matplotlib = if args.no_cleanup {
        Some(false)
    } else if args.cleanup || config.cleanup_matplotlib {
        Some(true)
    } else {
        None
    };

    let options = ImproveOptions {
        cleanup_matplotlib,
        apply_fonts: !args.no_fonts,
        apply_colors: !args.no_colors,
        color_map,
        auto_color: config.auto_color && !args.no_auto_color,
        pattern: args.pattern.clone(),
        output_dir_name: config.output_dir_name.clone(),
        png_scale: config.png_scale,
    };

    let template = args
        .template
        .clone()
        .unwrap_or_else(|| config.default_template.clone());
    let format = args.format.unwrap_or(config.export_format);

    Ok((template, format, options))
}

fn run_analyze_command(
    templates: TemplateService,
    input: &str,
    template: Option<String>,
    pattern: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let service = batch_service(templates);
    let analysis = service.batch_analyze(input, template.as_deref(), pattern.as_deref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("{}\n", analysis.summary());
    for entry in &analysis.file_analyses {
        match entry {
            AnalysisEntry::Analyzed(a) => {
                let marker = if a.matplotlib_detected { " [matplotlib]" } else { "" };
                println!(
                    "  {}{marker}: {} elements, {} colors ({} data), {}",
                    a.file,
                    a.total_elements,
                    a.color_analysis.total_unique_colors,
                    a.color_analysis.data_colors.len(),
                    a.dimensions
                );
            }
            AnalysisEntry::Error { file, error } => {
                println!("  {file}: error: {error}");
            }
        }
    }

    if !analysis.aggregate_data_colors.is_empty() {
        println!("\nData colors:");
        for (color, count) in &analysis.aggregate_data_colors {
            println!("  {color}  x{count}");
        }
    }
    if let Some(mapping) = &analysis.aggregate_suggested_mapping {
        println!("\nSuggested mapping:");
        for (from, to) in mapping {
            println!("  {from} -> {to}");
        }
    }

    Ok(())
}

fn print_report(report: &BatchReport) {
    println!("{}", report.summary());
    println!("Output: {}", report.output_dir.display());
    for entry in &report.file_results {
        match entry {
            ProcessEntry::Ok(r) => println!(
                "  + {} -> {} ({} modifications)",
                r.input, r.output, r.modifications
            ),
            ProcessEntry::Error { input, error } => {
                println!("  ! {input}: {error}")
            }
        }
    }
    if let Some(mapping) = &report.auto_color_map {
        println!("Auto color map:");
        for (from, to) in mapping {
            println!("  {from} -> {to}");
        }
    }
}

fn run_improve_command(
    templates: TemplateService,
    config: &AppConfig,
    input: &str,
    args: ImproveArgs,
    json: bool,
) -> anyhow::Result<()> {
    let (template, format, options) = improve_options(config, &args)?;
    let service = batch_service(templates);

    let report = service.batch_improve(input, &template, args.output.as_deref(), format, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Improve everything once, then re-process changed files until the
/// duration elapses or Ctrl-C is pressed.
async fn run_watch_command(
    templates: TemplateService,
    config: &AppConfig,
    input: PathBuf,
    args: ImproveArgs,
    duration: Option<u64>,
) -> anyhow::Result<()> {
    if !input.is_dir() {
        return Err(BatchError::NotADirectory("watch", input.display().to_string()).into());
    }

    let (template, format, options) = improve_options(config, &args)?;
    let input_str = input.to_string_lossy().into_owned();
    let files = list_processable_files(&input_str, options.pattern.as_deref())?;
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(&input_str, &files, &options.output_dir_name));

    let service = Arc::new(batch_service(templates));
    let options = Arc::new(options);

    let mut processed = 0usize;
    let mut failed = 0usize;
    let mut cycles = 0usize;

    if !files.is_empty() {
        let report = run_blocking_batch(&service, files, &template, &output_dir, format, &options).await?;
        processed += report.files_processed;
        failed += report.files_failed;
        cycles += 1;
        print_report(&report);
    }

    let watcher = FileWatcher::new(
        &input,
        Some(output_dir.clone()),
        Duration::from_millis(config.watch.debounce_ms),
    )?;
    let mut events = watcher.subscribe();

    let duration_secs = duration.unwrap_or(config.watch.duration_secs);
    let deadline = async {
        if duration_secs == 0 {
            std::future::pending::<()>().await
        } else {
            tokio::time::sleep(Duration::from_secs(duration_secs)).await
        }
    };
    tokio::pin!(deadline);

    println!("Watching {} (Ctrl-C to stop)", input.display());
    let started = std::time::Instant::now();

    loop {
        tokio::select! {
            event = events.recv() => {
                let event = match event {
                    Ok(event) => event,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Watcher lagged");
                        continue;
                    }
                    Err(_) => break,
                };
                let changed: Vec<PathBuf> = event.paths.into_iter().filter(|p| p.is_file()).collect();
                if changed.is_empty() {
                    continue;
                }
                let report = run_blocking_batch(&service, changed, &template, &output_dir, format, &options).await?;
                processed += report.files_processed;
                failed += report.files_failed;
                cycles += 1;
                print_report(&report);
                tracing::info!(processed, failed, cycles, "Watch totals");
            }
            _ = &mut deadline => break,
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    println!(
        "Watch complete: {processed} files processed, {failed} failed in {}s ({cycles} cycles)",
        started.elapsed().as_secs()
    );
    Ok(())
}

async fn run_blocking_batch(
    service: &Arc<BatchService>,
    files: Vec<PathBuf>,
    template: &str,
    output_dir: &Path,
    format: ExportFormat,
    options: &Arc<ImproveOptions>,
) -> anyhow::Result<BatchReport> {
    let service = service.clone();
    let options = options.clone();
    let template = template.to_string();
    let output_dir = output_dir.to_path_buf();

    let report = tokio::task::spawn_blocking(move || {
        service.improve_files(&files, &template, &output_dir, format, &options)
    })
    .await??;
    Ok(report)
}

fn run_templates_command(
    templates: &TemplateService,
    id: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    match id {
        Some(id) => {
            let template = templates.get(&id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(template)?);
            } else {
                println!("{} ({id})", template.name);
                println!("  {}", template.description);
                let fonts = &template.fonts;
                for (role, font) in [("title", &fonts.title), ("label", &fonts.label), ("tick", &fonts.tick)] {
                    println!("  {role:<6} {} {}pt", font.family, font.size);
                }
                println!("  palette    {}", template.colors.palette.join(" "));
                println!("  background {}", template.colors.background);
            }
        }
        None => {
            let list = templates.list();
            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                println!("{} templates available:", list.len());
                for t in list {
                    println!("  {:<16} {} - {}", t.id, t.name, t.description);
                }
            }
        }
    }
    Ok(())
}

/// Extract embedded assets to filesystem
fn run_init_command(
    templates: bool,
    config: bool,
    all: bool,
    force: bool,
    list: bool,
) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        println!("Templates:");
        for f in AssetLoader::list_embedded(AssetCategory::Templates) {
            println!("  {f}");
        }
        println!("\nConfig:");
        for f in AssetLoader::list_embedded(AssetCategory::Config) {
            println!("  {f}");
        }
        return Ok(());
    }

    // Determine which categories to extract
    let mut categories = Vec::new();
    if all || templates {
        categories.push(AssetCategory::Templates);
    }
    if all || config {
        categories.push(AssetCategory::Config);
    }

    if categories.is_empty() {
        eprintln!("No categories specified. Use --all, --templates, or --config");
        eprintln!("\nRun 'figpolish init --list' to see embedded assets.");
        std::process::exit(1);
    }

    let loader = AssetLoader::from_env();
    let report = loader.init(&categories, force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var("CONFIG_FILE").ok();
    let templates_file = std::env::var("TEMPLATES_FILE").ok();

    println!("figpolish v{VERSION}");
    println!("Publication styling for scientific figures\n");

    println!("Environment Variables:");
    println!(
        "  CONFIG_FILE    = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  TEMPLATES_FILE = {}",
        templates_file.as_deref().unwrap_or("(not set)")
    );

    fn source(path: Option<&str>) -> String {
        match path {
            Some(p) if Path::new(p).exists() => p.to_string(),
            Some(_) => "embedded (file not found)".to_string(),
            None => "embedded".to_string(),
        }
    }

    println!("\nAsset Sources:");
    println!("  Config:    {}", source(config_file.as_deref()));
    println!("  Templates: {}", source(templates_file.as_deref()));

    let loader = AssetLoader::from_env();
    let config = AppConfig::load_from_assets(&loader);
    println!("\nDefaults:");
    println!("  template: {}", config.default_template);
    println!("  format:   {}", config.export_format);
    println!("  output:   {}/", config.output_dir_name);

    match TemplateService::load(&loader) {
        Ok(templates) => {
            let ids: Vec<&str> = templates.ids().collect();
            println!("\nTemplates: {}", ids.join(", "));
        }
        Err(e) => println!("\nTemplates: error: {e}"),
    }

    println!("\nCommands:");
    println!("  figpolish analyze <path>             Report colors and matplotlib artifacts");
    println!("  figpolish improve <path> -t <id>     Apply a publication template");
    println!("  figpolish watch <dir> -t <id>        Re-process figures as they change");
    println!("  figpolish templates [id]             List or show templates");
    println!("  figpolish init --all                 Extract embedded assets");
}
