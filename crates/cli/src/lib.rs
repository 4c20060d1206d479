use anyhow::{bail, Context as AnyhowContext, Result};
use cache::{fallback_collection, CachingSource};
use clap::{Args, Parser, Subcommand};
use config::Settings;
use flags::{KindFlag, OrderingFlag, PageModeFlag};
use listview_protocol::{parse_query, serialize_json, FilterPatch};
use listview_records::{load_collection, source_for, LoadOutcome};
use listview_search::{collection_stats, filter_options, page_size};
use listview_session::{run_session, ViewController, ViewEvent};
use listview_store::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
use render::{CliRenderer, OutputFormat, Sink};
use std::env;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

mod cache;
mod config;
mod flags;
mod input;
mod render;

const EVENT_QUEUE: usize = 64;

pub(crate) fn print_stdout(text: &str) -> Result<()> {
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

#[derive(Parser)]
#[command(name = "listview")]
#[command(about = "Filter, page and browse JSON listing collections", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Config file (default: ./listview.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Preference directory (overrides LISTVIEW_PREFS_DIR)
    #[arg(long, global = true)]
    prefs_dir: Option<PathBuf>,

    /// Keep filter preferences in memory only
    #[arg(long, global = true)]
    no_persist: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one page of a collection and exit
    Show(ViewArgs),

    /// Interactive session; reads one command per line from stdin
    /// (search <text>, type|location|category <value>, more, page <n>, clear, open <id>, quit)
    Browse(ViewArgs),

    /// List the values each filter can take, plus collection counts
    Options(OptionsArgs),

    /// Inspect or wipe stored filter preferences
    Prefs(PrefsArgs),
}

#[derive(Args)]
struct ViewArgs {
    /// JSON collection: file path or http(s) URL
    #[arg(long)]
    source: Option<String>,

    /// Collection kind, selects field mapping and ordering
    #[arg(long, value_enum)]
    kind: Option<KindFlag>,

    /// Filter overrides as a query string, e.g. "?type=Training&location=awka"
    #[arg(long)]
    query: Option<String>,

    /// Page to show (cumulative mode shows everything up to it)
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Paging style
    #[arg(long, value_enum)]
    mode: Option<PageModeFlag>,

    /// Records per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Override the kind's ordering rule
    #[arg(long, value_enum)]
    ordering: Option<OrderingFlag>,

    /// Show the detail view of one record instead of the list
    #[arg(long)]
    open: Option<String>,

    /// Output JSON frames
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct OptionsArgs {
    /// JSON collection: file path or http(s) URL
    #[arg(long)]
    source: Option<String>,

    /// Collection kind, selects field mapping
    #[arg(long, value_enum)]
    kind: Option<KindFlag>,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct PrefsArgs {
    #[command(subcommand)]
    action: PrefsAction,
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print stored preferences as JSON
    Show,
    /// Remove every stored preference
    Clear,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers
    let json_output = match &cli.command {
        Commands::Show(args) | Commands::Browse(args) => args.json,
        Commands::Options(args) => args.json,
        Commands::Prefs(_) => true,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let cwd = env::current_dir().context("Cannot determine working directory")?;
    let mut settings = Settings::load(cli.config.as_deref(), &cwd)?;
    if let Some(dir) = cli.prefs_dir.clone() {
        settings.prefs_dir = dir;
    }

    match cli.command {
        Commands::Show(args) => {
            let store = open_store(&settings, cli.no_persist);
            run_show(args, settings, store).await?;
        }
        Commands::Browse(args) => {
            let store = open_store(&settings, cli.no_persist);
            run_browse(args, settings, store).await?;
        }
        Commands::Options(args) => {
            let store = open_store(&settings, cli.no_persist);
            run_options(args, settings, store).await?;
        }
        Commands::Prefs(args) => run_prefs(args, &settings, cli.no_persist)?,
    }

    Ok(())
}

fn open_store(settings: &Settings, no_persist: bool) -> Arc<dyn PreferenceStore> {
    if no_persist {
        log::debug!("Preferences kept in memory (--no-persist)");
        return Arc::new(MemoryPreferenceStore::new());
    }
    Arc::new(FilePreferenceStore::open(
        &settings.prefs_dir,
        settings.key_prefix.clone(),
    ))
}

/// Folds view flags over the loaded settings.
fn apply_view_args(settings: &mut Settings, args: &ViewArgs) -> Result<()> {
    if let Some(source) = &args.source {
        settings.source = Some(source.clone());
    }
    if let Some(kind) = args.kind {
        settings.kind = kind.as_domain();
    }
    if let Some(mode) = args.mode {
        settings.page_mode = mode.as_domain();
    }
    if let Some(size) = args.page_size {
        settings.page_size = page_size(size).context("--page-size must be at least 1")?;
    }
    if let Some(ordering) = args.ordering {
        settings.ordering = Some(ordering.as_domain());
    }
    Ok(())
}

fn resolve_source(settings: &Settings, store: Arc<dyn PreferenceStore>) -> Result<CachingSource> {
    let Some(location) = settings.source.as_deref() else {
        bail!("No collection source: pass --source or set `source` in listview.toml");
    };
    Ok(CachingSource::new(
        source_for(location),
        store,
        settings.kind,
        settings.cache_ttl,
    ))
}

/// Loads through the cache, falling back to the cached copy or the configured file.
async fn load(source: &CachingSource, settings: &Settings) -> LoadOutcome {
    let fallback = fallback_collection(source, settings.fallback.as_deref()).await;
    load_collection(source, settings.kind, fallback).await
}

fn url_overrides(args: &ViewArgs) -> FilterPatch {
    args.query.as_deref().map(parse_query).unwrap_or_default()
}

const fn output_format(args: &ViewArgs) -> OutputFormat {
    if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    }
}

async fn run_show(
    args: ViewArgs,
    mut settings: Settings,
    store: Arc<dyn PreferenceStore>,
) -> Result<()> {
    apply_view_args(&mut settings, &args)?;
    let source = resolve_source(&settings, store.clone())?;
    let kind = settings.kind;

    let renderer = CliRenderer::new(output_format(&args), kind, Sink::Latest(None));
    let mut controller = ViewController::new(settings.session_config(), store, renderer);
    controller.restore(&url_overrides(&args));
    controller.attach(load(&source, &settings).await);
    if args.page > 1 {
        controller.go_to_page(args.page);
    }
    let found = args.open.as_deref().map(|id| controller.inspect(id));

    controller.renderer_mut().flush()?;
    if found == Some(false) {
        bail!(
            "No {} with id '{}'",
            kind.nouns().0,
            args.open.unwrap_or_default()
        );
    }
    Ok(())
}

async fn run_browse(
    args: ViewArgs,
    mut settings: Settings,
    store: Arc<dyn PreferenceStore>,
) -> Result<()> {
    apply_view_args(&mut settings, &args)?;
    let source = resolve_source(&settings, store.clone())?;
    let kind = settings.kind;

    let renderer = CliRenderer::new(output_format(&args), kind, Sink::Stdout);
    let mut controller = ViewController::new(settings.session_config(), store, renderer);
    controller.restore(&url_overrides(&args));

    let (tx, rx) = mpsc::channel(EVENT_QUEUE);
    let reader = tokio::spawn(read_events(tx));
    let state = run_session(&mut controller, load(&source, &settings), rx).await;
    reader.abort();
    log::debug!(
        "Session ended on page {} with {} of {} records matching",
        state.page,
        state.filtered,
        state.total
    );
    Ok(())
}

/// Forwards stdin lines as events until EOF or `quit`.
async fn read_events(tx: mpsc::Sender<ViewEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                log::warn!("Failed to read input: {err}");
                break;
            }
        };
        match input::parse_event(&line) {
            Ok(Some(event)) => {
                let stop = event == ViewEvent::Shutdown;
                if tx.send(event).await.is_err() || stop {
                    break;
                }
            }
            Ok(None) => {}
            Err(err) => log::warn!("{err}"),
        }
    }
}

async fn run_options(
    args: OptionsArgs,
    mut settings: Settings,
    store: Arc<dyn PreferenceStore>,
) -> Result<()> {
    if let Some(source) = args.source {
        settings.source = Some(source);
    }
    if let Some(kind) = args.kind {
        settings.kind = kind.as_domain();
    }
    let source = resolve_source(&settings, store)?;
    let outcome = load(&source, &settings).await;
    let records = outcome.collection.records();
    let options = filter_options(records);
    let stats = collection_stats(records);

    if args.json {
        let text = serialize_json(&serde_json::json!({
            "kind": settings.kind,
            "options": options,
            "stats": stats,
            "error": outcome.error,
        }))?;
        return print_stdout(&text);
    }

    let mut out = String::new();
    if let Some(error) = &outcome.error {
        out.push_str(&format!("! Could not load {}: {error}\n", settings.kind.nouns().1));
    }
    for (label, values) in [
        ("Types", &options.types),
        ("Locations", &options.locations),
        ("Categories", &options.categories),
    ] {
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        out.push_str(&format!("{label:<12}{}\n", values.join(", ")));
    }
    let noun = if stats.total == 1 {
        settings.kind.nouns().0
    } else {
        settings.kind.nouns().1
    };
    out.push_str(&format!("\n{} {noun}", stats.total));
    if !stats.by_type.is_empty() {
        let counts: Vec<String> = stats
            .by_type
            .iter()
            .map(|(record_type, count)| format!("{record_type} {count}"))
            .collect();
        out.push_str(&format!(" ({})", counts.join(", ")));
    }
    out.push_str(&format!(
        ", {} locations, {} organisations",
        stats.distinct_locations, stats.distinct_labels
    ));
    print_stdout(&out)
}

fn run_prefs(args: PrefsArgs, settings: &Settings, no_persist: bool) -> Result<()> {
    let store = open_store(settings, no_persist);
    if !store.is_available() {
        bail!(
            "Preference store at {} is unavailable",
            settings.prefs_dir.display()
        );
    }

    match args.action {
        PrefsAction::Show => {
            let entries: serde_json::Map<String, serde_json::Value> = store
                .keys()
                .into_iter()
                .filter_map(|key| store.get(&key).map(|value| (key, value)))
                .collect();
            let text = serde_json::to_string_pretty(&entries)
                .context("Failed to encode preferences")?;
            print_stdout(&text)?;
        }
        PrefsAction::Clear => {
            let removed = store.keys().len();
            if !store.clear() {
                bail!("Failed to clear preferences");
            }
            log::info!("Cleared {removed} preference(s)");
            print_stdout(&serde_json::json!({ "cleared": removed }).to_string())?;
        }
    }
    Ok(())
}
