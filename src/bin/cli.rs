//! Freebie CLI
//!
//! Runs the giveaway proxy and browses listings through it (or straight from
//! the upstream with `--direct`).

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use freebie::{
    error::{AppError, Result},
    models::{Config, FilterPatch, FilterState, GiveawayType, Platform, Selection, SortBy},
    pipeline::{GiveawayBrowser, GiveawayFetcher, SearchDebouncer, SharedBrowser},
    server,
    services::{GiveawaySource, ProxyClient, UpstreamGateway},
    utils::log as console,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Freebie - free game giveaway proxy
#[derive(Parser, Debug)]
#[command(name = "freebie", version, about = "Rate-limited free game giveaway proxy")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "freebie.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read from the upstream directly instead of through the proxy
    #[arg(long, global = true)]
    direct: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the proxy server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },

    /// Fetch one page of giveaways
    List {
        #[arg(long, default_value = "all")]
        platform: Selection<Platform>,
        #[arg(long = "type", default_value = "all")]
        kind: Selection<GiveawayType>,
        #[arg(long, default_value = "date")]
        sort_by: SortBy,
        /// Case-insensitive text to search for
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Browse giveaways interactively
    Browse,

    /// Show a single giveaway
    Show { id: u64 },

    /// Show totals across live giveaways
    Stats,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn fetcher(config: &Config, direct: bool) -> Result<Arc<dyn GiveawayFetcher>> {
    if direct {
        Ok(Arc::new(UpstreamGateway::new(&config.upstream)?))
    } else {
        Ok(Arc::new(ProxyClient::from_config(config)?))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;
            server::serve(config).await?;
        }

        Command::List {
            platform,
            kind,
            sort_by,
            search,
            page,
        } => {
            let filters = FilterState {
                platform,
                kind,
                sort_by,
                ..FilterState::default()
            };
            let fetcher = fetcher(&config, cli.direct)?;
            let mut browser = GiveawayBrowser::with_filters(filters, config.browse.page_size);
            browser.refresh(fetcher.as_ref()).await;
            browser.search(&search);
            browser.set_page(page);
            console::page(&browser.view(), Utc::now());
            ensure_fetched(&browser)?;
        }

        Command::Browse => browse(&config, cli.direct).await?,

        Command::Show { id } => {
            let listing = if cli.direct {
                match UpstreamGateway::new(&config.upstream)?.giveaway(id).await {
                    Ok(listing) => Some(listing),
                    Err(AppError::NotFound(_)) => None,
                    Err(e) => return Err(e),
                }
            } else {
                ProxyClient::from_config(&config)?
                    .fetch_giveaway_by_id(id)
                    .await?
            };
            match listing {
                Some(listing) => console::detail(&listing, Utc::now()),
                None => log::warn!("Giveaway {} not found", id),
            }
        }

        Command::Stats => {
            let stats = if cli.direct {
                match UpstreamGateway::new(&config.upstream)?.stats().await {
                    Ok(stats) => Some(stats),
                    Err(e) => {
                        log::warn!("Stats unavailable: {}", e);
                        None
                    }
                }
            } else {
                ProxyClient::from_config(&config)?.fetch_stats().await?
            };
            match stats {
                Some(stats) => console::stats(&stats),
                None => log::warn!("No statistics available"),
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}

/// One line of input in a browse session.
#[derive(Debug, Clone, PartialEq)]
enum BrowseCommand {
    Filter(FilterPatch),
    Search(String),
    Page(usize),
    Next,
    Prev,
    Reload,
    Help,
    Quit,
}

impl BrowseCommand {
    fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        let command = match word {
            "" => return Ok(None),
            "platform" => Self::Filter(FilterPatch::default().platform(rest.parse::<Selection<Platform>>()?)),
            "type" => Self::Filter(FilterPatch::default().kind(rest.parse::<Selection<GiveawayType>>()?)),
            "sort" => Self::Filter(FilterPatch::default().sort_by(rest.parse()?)),
            "reset" => Self::Filter(FilterPatch::reset()),
            "search" => Self::Search(rest.to_string()),
            "page" => Self::Page(
                rest.parse()
                    .map_err(|_| AppError::validation("page", format!("Invalid page '{rest}'")))?,
            ),
            "next" | "n" => Self::Next,
            "prev" | "p" => Self::Prev,
            "reload" | "r" => Self::Reload,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => {
                return Err(AppError::validation(
                    "command",
                    format!("Unknown command '{other}'. Type 'help' for a list"),
                ));
            }
        };
        Ok(Some(command))
    }
}

fn print_help() {
    console::header("Commands");
    for line in [
        "platform <slug|all>   filter by platform (refetches)",
        "type <game|loot|beta|all>",
        "sort <date|value|popularity>",
        "reset                 clear platform, type and sort",
        "search <text>         filter fetched giveaways",
        "page <n> | next | prev",
        "reload                fetch again",
        "quit",
    ] {
        console::sub_item(line);
    }
}

/// Fail the command when the last fetch did not succeed.
fn ensure_fetched(browser: &GiveawayBrowser) -> Result<()> {
    match browser.error() {
        Some(message) => Err(AppError::upstream(None, message)),
        None => Ok(()),
    }
}

/// Forward a fetch task's outcome to the session loop.
fn watch(task: JoinHandle<bool>, done: &mpsc::UnboundedSender<bool>) {
    let done = done.clone();
    tokio::spawn(async move {
        let committed = task.await.unwrap_or(false);
        let _ = done.send(committed);
    });
}

fn render(shared: &SharedBrowser) {
    let browser = shared.lock();
    console::page(&browser.view(), Utc::now());
}

async fn browse(config: &Config, direct: bool) -> Result<()> {
    let fetcher = fetcher(config, direct)?;
    let shared = SharedBrowser::new(GiveawayBrowser::new(config.browse.page_size));
    let mut debouncer = SearchDebouncer::new(config.browse.search_debounce());
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_help();
    watch(shared.spawn_refresh(Arc::clone(&fetcher)), &done_tx);
    render(&shared);

    loop {
        let deadline = debouncer.deadline();
        let wake_at = deadline.map(Instant::from_std).unwrap_or_else(Instant::now);

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match BrowseCommand::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        console::line(&e.to_string());
                        continue;
                    }
                };
                match command {
                    BrowseCommand::Filter(patch) => {
                        match shared.update_filters(patch, Arc::clone(&fetcher)) {
                            Some(task) => watch(task, &done_tx),
                            None => console::line("Filters unchanged"),
                        }
                        render(&shared);
                    }
                    BrowseCommand::Search(text) if text.is_empty() => {
                        debouncer.push(text, std::time::Instant::now());
                        if let Some(text) = debouncer.flush() {
                            shared.lock().search(&text);
                            render(&shared);
                        }
                    }
                    BrowseCommand::Search(text) => debouncer.push(text, std::time::Instant::now()),
                    BrowseCommand::Page(page) => {
                        shared.lock().set_page(page);
                        render(&shared);
                    }
                    BrowseCommand::Next => {
                        {
                            let mut browser = shared.lock();
                            let last = browser.total_pages().max(1);
                            let next = (browser.filters().page + 1).min(last);
                            browser.set_page(next);
                        }
                        render(&shared);
                    }
                    BrowseCommand::Prev => {
                        {
                            let mut browser = shared.lock();
                            let prev = browser.filters().page.saturating_sub(1);
                            browser.set_page(prev);
                        }
                        render(&shared);
                    }
                    BrowseCommand::Reload => {
                        watch(shared.spawn_refresh(Arc::clone(&fetcher)), &done_tx);
                        render(&shared);
                    }
                    BrowseCommand::Help => print_help(),
                    BrowseCommand::Quit => break,
                }
            }
            Some(committed) = done_rx.recv() => {
                if committed {
                    render(&shared);
                }
            }
            _ = tokio::time::sleep_until(wake_at), if deadline.is_some() => {
                if let Some(text) = debouncer.poll(std::time::Instant::now()) {
                    shared.lock().search(&text);
                    render(&shared);
                }
            }
        }
    }

    log::info!("Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_browse_commands() {
        assert_eq!(
            BrowseCommand::parse("platform steam").unwrap(),
            Some(BrowseCommand::Filter(FilterPatch::default().platform(Platform::Steam)))
        );
        assert_eq!(
            BrowseCommand::parse("type all").unwrap(),
            Some(BrowseCommand::Filter(FilterPatch::default().kind(Selection::All)))
        );
        assert_eq!(
            BrowseCommand::parse("search  Epic Games ").unwrap(),
            Some(BrowseCommand::Search("Epic Games".into()))
        );
        assert_eq!(BrowseCommand::parse("page 3").unwrap(), Some(BrowseCommand::Page(3)));
        assert_eq!(BrowseCommand::parse("   ").unwrap(), None);
        assert_eq!(BrowseCommand::parse("q").unwrap(), Some(BrowseCommand::Quit));
    }

    #[test]
    fn rejects_bad_browse_input() {
        assert!(BrowseCommand::parse("platform nes").is_err());
        assert!(BrowseCommand::parse("sort newest").is_err());
        assert!(BrowseCommand::parse("page two").is_err());
        assert!(BrowseCommand::parse("jump").is_err());
    }

    #[test]
    fn cli_parses_list_filters() {
        let cli = Cli::parse_from([
            "freebie", "--direct", "list", "--platform", "gog", "--type", "loot", "--sort-by",
            "popularity", "--page", "2",
        ]);
        assert!(cli.direct);
        match cli.command {
            Command::List {
                platform,
                kind,
                sort_by,
                page,
                ..
            } => {
                assert_eq!(platform, Selection::One(Platform::Gog));
                assert_eq!(kind, Selection::One(GiveawayType::Loot));
                assert_eq!(sort_by, SortBy::Popularity);
                assert_eq!(page, 2);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn list_fails_when_the_fetch_failed() {
        let mut browser = GiveawayBrowser::new(12);
        let ticket = browser.begin_fetch();
        browser.commit(ticket, Ok(Vec::new()));
        assert!(ensure_fetched(&browser).is_ok());

        let ticket = browser.begin_fetch();
        browser.commit(ticket, Err(AppError::upstream(Some(502), "bad gateway")));
        let err = ensure_fetched(&browser).unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("bad gateway"), "{err}");
    }
}
