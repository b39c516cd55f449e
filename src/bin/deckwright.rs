use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use deckwright::{
    DeckPlanner, DocumentAssembler as _, FsAssetProvider, JsonAssembler, QaLoop, QaOptions,
    QaThresholds, SnapshotFormat, SnapshotMethod, Template, ThemeColors, ThemeName, ThemeResolver,
    select_renderer, validate_file, write_gallery,
};

#[derive(Parser, Debug)]
#[command(name = "deckwright", version)]
struct Cli {
    /// Log debug detail (layout resolution, QA decisions).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan and assemble a deck, optionally running the QA loop.
    Build(BuildArgs),
    /// Validate a spec and list every defect.
    Validate(ValidateArgs),
    /// List a template's layouts and placeholder roles.
    Layouts(LayoutsArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Input spec JSON.
    #[arg(long)]
    config: PathBuf,

    /// Output deck path.
    #[arg(long)]
    output: PathBuf,

    /// Template (`.pptx` package or `.json` manifest).
    #[arg(long)]
    template: Option<PathBuf>,

    /// Color theme: dark, light or template (default: template with a template, else dark).
    #[arg(long)]
    theme: Option<String>,

    /// Directory of previously generated images (default: `<output stem>-assets`).
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Run the render-measure-split QA loop.
    #[arg(long, default_value_t = false)]
    qa: bool,

    /// QA pass budget.
    #[arg(long, default_value_t = 2)]
    qa_passes: usize,

    /// Baseline bullets per slide.
    #[arg(long)]
    qa_max_bullets: Option<usize>,

    /// Baseline lines per two-column column.
    #[arg(long)]
    qa_max_column_lines: Option<usize>,

    /// Baseline workflow steps per slide.
    #[arg(long)]
    qa_max_steps: Option<usize>,

    /// Baseline KPI cards per slide.
    #[arg(long)]
    qa_max_cards: Option<usize>,

    /// JSON file with QA thresholds; flags above override it.
    #[arg(long)]
    qa_thresholds: Option<PathBuf>,

    /// Where to write the QA-adjusted spec (default: `<output stem>.qa.json`).
    #[arg(long)]
    qa_config_out: Option<PathBuf>,

    /// Snapshot directory (QA default: `<output stem>-slides`).
    #[arg(long)]
    snapshots_dir: Option<PathBuf>,

    /// Snapshot format: png, jpg or jpeg.
    #[arg(long, default_value = "png")]
    snapshots_format: String,

    /// Snapshot renderer: auto, preview or office.
    #[arg(long, default_value = "auto")]
    snapshots_method: String,

    /// Also write an index.html gallery next to the snapshots.
    #[arg(long, default_value_t = false)]
    snapshots_gallery: bool,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input spec JSON.
    #[arg(long)]
    config: PathBuf,
}

#[derive(Parser, Debug)]
struct LayoutsArgs {
    /// Template (`.pptx` package or `.json` manifest).
    #[arg(long)]
    template: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Layouts(args) => cmd_layouts(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

fn sibling(output: &Path, suffix: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "deck".to_owned());
    output.with_file_name(format!("{stem}{suffix}"))
}

fn thresholds(args: &BuildArgs) -> anyhow::Result<QaThresholds> {
    let mut t = match &args.qa_thresholds {
        Some(path) => QaThresholds::from_file(path)?,
        None => QaThresholds::default(),
    };
    if let Some(n) = args.qa_max_bullets {
        t.max_bullets = n;
    }
    if let Some(n) = args.qa_max_column_lines {
        t.max_column_lines = n;
    }
    if let Some(n) = args.qa_max_steps {
        t.max_steps = n;
    }
    if let Some(n) = args.qa_max_cards {
        t.max_cards = n;
    }
    Ok(t)
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let format = SnapshotFormat::parse(&args.snapshots_format)
        .with_context(|| format!("unknown snapshot format '{}'", args.snapshots_format))?;
    let method = SnapshotMethod::parse(&args.snapshots_method)
        .with_context(|| format!("unknown snapshot method '{}'", args.snapshots_method))?;
    let mut theme = match &args.theme {
        Some(raw) => ThemeName::parse(raw).with_context(|| format!("unknown theme '{raw}'"))?,
        None if args.template.is_some() => ThemeName::Template,
        None => ThemeName::Dark,
    };

    let (spec, wrapped) = validate_file(&args.config)?;
    let template = args.template.as_deref().map(Template::load).transpose()?;
    if theme == ThemeName::Template && template.is_none() {
        tracing::warn!("theme 'template' needs --template; using dark");
        theme = ThemeName::Dark;
    }
    let colors = template
        .as_ref()
        .map_or_else(ThemeColors::default, |t| t.theme.clone());
    let resolver = ThemeResolver::new(theme, colors);

    let assets = FsAssetProvider::new(args.config.parent().map(Path::to_path_buf)).with_assets_dir(
        args.assets_dir
            .clone()
            .unwrap_or_else(|| sibling(&args.output, "-assets")),
    );
    let planner = DeckPlanner::new(template.as_ref(), &resolver, &assets);
    let assembler = JsonAssembler::new(template.as_ref());

    if args.qa {
        let options = QaOptions {
            max_passes: args.qa_passes,
            thresholds: thresholds(&args)?,
            snapshots_dir: args
                .snapshots_dir
                .clone()
                .unwrap_or_else(|| sibling(&args.output, "-slides")),
            format,
            method,
            gallery: args.snapshots_gallery,
            config_out: Some(
                args.qa_config_out
                    .clone()
                    .unwrap_or_else(|| sibling(&args.output, ".qa.json")),
            ),
        };
        let outcome = QaLoop::new(&planner, &assembler, options).run(spec, wrapped, &args.output)?;
        eprintln!(
            "wrote {} ({} slides, {} QA changes over {} passes)",
            outcome.document.display(),
            outcome.state.spec.slides.len(),
            outcome.report.total_changes(),
            outcome.report.passes
        );
        return Ok(());
    }

    let deck = planner.plan(&spec);
    let handle = assembler.assemble(&deck)?;
    let saved = assembler.save(handle, &args.output)?;

    // Snapshots are a convenience; the deck is already written.
    if let Some(dir) = &args.snapshots_dir {
        match select_renderer(method, &saved).render(&saved, dir, format) {
            Ok(images) => {
                if args.snapshots_gallery
                    && let Err(e) = write_gallery(dir, &images)
                {
                    tracing::warn!(error = %e, "gallery not written");
                }
                eprintln!("wrote {} snapshots to {}", images.len(), dir.display());
            }
            Err(e) => tracing::warn!(error = %e, "snapshots unavailable"),
        }
    }
    eprintln!("wrote {}", saved.display());
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let (spec, _) = validate_file(&args.config)?;
    tracing::debug!(slides = spec.slides.len(), "spec valid");
    println!("ok");
    Ok(())
}

fn cmd_layouts(args: LayoutsArgs) -> anyhow::Result<()> {
    let template = Template::load(&args.template)?;
    for layout in &template.layouts {
        let roles: Vec<_> = layout
            .capabilities
            .placeholders()
            .iter()
            .map(|p| p.role.as_str())
            .collect();
        println!("{}\t{}\t{}", layout.index, layout.name, roles.join(","));
    }
    Ok(())
}
