use anyhow::{Context, Result};
use bibtex_search::config::{find_config_file, load_config, Config};
use bibtex_search::models::{ArticleSummary, SourceKind};
use bibtex_search::sources::SourceRegistry;
use bibtex_search::ui::{self, Spinner, Status};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Search ACM, Google Scholar or IEEE Xplore and copy a BibTeX reference to the clipboard
#[derive(Parser, Debug)]
#[command(name = "bibtex-search")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Searches for BibTeX references", long_about = None)]
#[command(after_help = "Examples:\n  $ bibtex-search bayou\n  $ bibtex-search --source google zaharia spark")]
struct Cli {
    /// Search query (words are joined with spaces)
    #[arg(required_unless_present_any = ["env", "print_config"])]
    query: Vec<String>,

    /// Where to find papers from
    #[arg(long, short, value_enum)]
    source: Option<SourceArg>,

    /// Maximum number of articles offered in the picker
    #[arg(long, short = 'n')]
    max_articles: Option<usize>,

    /// Print the reference without copying it to the clipboard
    #[arg(long)]
    no_copy: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (default: no client-side timeout)
    #[arg(long)]
    timeout: Option<u64>,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Show all environment variables
    #[arg(long)]
    env: bool,

    /// Print the effective configuration as TOML
    #[arg(long)]
    print_config: bool,
}

/// Available sources
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SourceArg {
    #[value(name = "acm")]
    Acm,
    #[value(name = "google")]
    Google,
    #[value(name = "ieee")]
    Ieee,
}

impl From<SourceArg> for SourceKind {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::Acm => SourceKind::Acm,
            SourceArg::Google => SourceKind::Google,
            SourceArg::Ieee => SourceKind::Ieee,
        }
    }
}

/// Print all available environment variables
fn print_env_vars() {
    println!("bibtex-search - Environment Variables");
    println!();
    println!("HTTP:");
    println!("  BIBTEX_SEARCH_HTTP__USER_AGENT        User agent sent to every source");
    println!("  BIBTEX_SEARCH_HTTP__TIMEOUT_SECS      Request timeout in seconds (default: none)");
    println!();
    println!("Endpoints:");
    println!("  BIBTEX_SEARCH_ENDPOINTS__ACM            ACM base URL (default: https://dl.acm.org)");
    println!("  BIBTEX_SEARCH_ENDPOINTS__GOOGLE_SCHOLAR Google Scholar base URL (default: https://scholar.google.com)");
    println!("  BIBTEX_SEARCH_ENDPOINTS__IEEE           IEEE Xplore base URL (default: https://ieeexplore.ieee.org)");
    println!();
    println!("IEEE Xplore:");
    println!("  BIBTEX_SEARCH_IEEE__SESSION_COOKIE    Session cookie sent with IEEE requests");
    println!();
    println!("Command line:");
    println!("  BIBTEX_SEARCH_CLI__MAX_ARTICLES       Articles offered in the picker (default: 10)");
    println!("  BIBTEX_SEARCH_CLI__DEFAULT_SOURCE     ACM, GOOGLE or IEEE (default: ACM)");
    println!("  BIBTEX_SEARCH_CLI__COPY_TO_CLIPBOARD  Copy the reference (default: true)");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                    Rust logging level (e.g., debug, info, warn, error)");
}

fn init_tracing(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("bibtex_search={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &path {
        tracing::info!("Using config file: {}", path.display());
    }

    let mut config = load_config(path.as_deref()).context("Failed to load configuration")?;

    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = Some(timeout);
    }
    if let Some(max_articles) = cli.max_articles {
        config.cli.max_articles = max_articles;
    }
    if cli.no_copy {
        config.cli.copy_to_clipboard = false;
    }

    Ok(config)
}

fn new_spinner(quiet: bool) -> Spinner {
    if quiet {
        Spinner::hidden()
    } else {
        Spinner::new()
    }
}

/// Ask the user to pick an article; `None` when the prompt is dismissed.
fn pick_article(articles: &[ArticleSummary]) -> Result<Option<&ArticleSummary>> {
    let labels: Vec<String> = articles.iter().map(ui::article_label).collect();

    let selection = dialoguer::Select::new()
        .with_prompt("Which article are you looking for?")
        .items(&labels)
        .default(0)
        .interact_opt()?;

    Ok(selection.map(|i| &articles[i]))
}

fn searching_message(query: &str) -> String {
    format!("Searching for '{}'", query)
}

/// How long to wait for a clipboard manager to take over the selection.
#[cfg(target_os = "linux")]
const CLIPBOARD_HANDOFF: std::time::Duration = std::time::Duration::from_millis(500);

/// Whether the copied text outlives this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Copied {
    Persisted,
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    UntilExit,
}

impl Copied {
    fn status(self) -> (Status, &'static str) {
        match self {
            Copied::Persisted => (Status::Success, "Copied to clipboard!"),
            Copied::UntilExit => (
                Status::Warning,
                "Copied to clipboard, but no clipboard manager took it over; it is lost when bibtex-search exits.",
            ),
        }
    }
}

/// X11 and Wayland selections are served by the owning process, so the text
/// only survives exit if a clipboard manager takes ownership of it.
#[cfg(target_os = "linux")]
fn copy_to_clipboard(text: &str) -> Result<Copied, arboard::Error> {
    use arboard::SetExtLinux;
    use std::sync::mpsc::RecvTimeoutError;

    let (tx, rx) = std::sync::mpsc::channel();
    let text = text.to_string();
    std::thread::spawn(move || {
        let result = arboard::Clipboard::new().and_then(|mut clipboard| {
            let set = clipboard.set().wait();
            set.text(text)
        });
        let _ = tx.send(result);
    });

    match rx.recv_timeout(CLIPBOARD_HANDOFF) {
        Ok(result) => result.map(|()| Copied::Persisted),
        Err(RecvTimeoutError::Timeout) => Ok(Copied::UntilExit),
        Err(RecvTimeoutError::Disconnected) => Err(arboard::Error::Unknown {
            description: "clipboard thread exited without a result".to_string(),
        }),
    }
}

#[cfg(not(target_os = "linux"))]
fn copy_to_clipboard(text: &str) -> Result<Copied, arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(Copied::Persisted)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.env {
        print_env_vars();
        return Ok(());
    }

    init_tracing(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let source = cli
        .source
        .map(SourceKind::from)
        .unwrap_or(config.cli.default_source);
    let query = cli.query.join(" ");
    let registry = SourceRegistry::from_config(&config)?;

    let spinner = new_spinner(cli.quiet);
    tracing::debug!(source = %source, "using {}", source.name());
    spinner.start(&searching_message(&query));

    let mut articles = match registry.search(source, &query).await {
        Ok(articles) => articles,
        Err(e) => {
            spinner.fail(&format!("Something went wrong while searching: {}", e));
            std::process::exit(1);
        }
    };
    articles.truncate(config.cli.max_articles);
    spinner.stop();

    if articles.is_empty() {
        spinner.info(&format!("No results found for query '{}'.", query));
        return Ok(());
    }

    let Some(article) = pick_article(&articles)? else {
        return Ok(());
    };

    let spinner = new_spinner(cli.quiet);
    spinner.start("Retrieving BibTeX reference");

    let reference = match registry.retrieve(source, &article.id).await {
        Ok(reference) => reference,
        Err(e) => {
            spinner.fail(&format!(
                "Something went wrong while retrieving reference: {}",
                e
            ));
            std::process::exit(1);
        }
    };
    spinner.stop();

    println!("{}", reference);

    if config.cli.copy_to_clipboard {
        match copy_to_clipboard(&reference) {
            Ok(copied) => match copied.status() {
                (Status::Success, msg) => spinner.succeed(msg),
                (status, msg) => eprintln!("{}", ui::status_line(status, msg)),
            },
            Err(e) => {
                tracing::debug!("Clipboard error: {}", e);
                eprintln!(
                    "{}",
                    ui::status_line(Status::Warning, &format!("Could not copy to clipboard: {}", e))
                );
            }
        }
    }

    Ok(())
}
