use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use navsync_core::{
    save_item_id, CachedSnapshot, EmptyState, EnrichmentProgress, Link, Msg, PanelViewModel,
    SNAPSHOT_KEY,
};
use navsync_engine::{
    build_bundle, run_enrichment, Activation, BackgroundService, CaptureClient,
    CaptureInvocation, CaptureOutcome, ContextMenuSynchronizer, EnrichmentSink,
    ExtensionSettings, FileBackend, HttpDescriptionGenerator, LinkStore, LocalCache,
    PanelDriver, PanelHandle, ReqwestLinkStore, RuntimeBus,
};
use navsync_logging::{nav_error, nav_info, nav_warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use super::config::AppConfig;
use super::host::{ConsoleHost, ConsoleMenu};
use crate::{CaptureArgs, Command, ExtensionArgs, ListArgs};

const CONSOLE_WINDOW: u32 = 1;

pub(crate) async fn run(config: AppConfig, command: Command) -> Result<()> {
    let cache = LocalCache::new(FileBackend::new(config.cache_dir.clone()));
    let store: Arc<dyn LinkStore> = Arc::new(
        ReqwestLinkStore::new(config.remote_settings()).context("failed to build http client")?,
    );

    match command {
        Command::Sync => sync(&cache, store).await,
        Command::List(args) => list(cache, store, args).await,
        Command::Menu => {
            menu(cache);
            Ok(())
        }
        Command::Capture(args) => capture(store, args).await,
        Command::Enrich => enrich(&config, &cache).await,
        Command::Extension(args) => extension(&config, args),
        Command::Watch => watch(cache, store).await,
    }
}

async fn sync(cache: &LocalCache, store: Arc<dyn LinkStore>) -> Result<()> {
    if !store.is_configured() {
        bail!("no secret configured; set it in the config file or NAVSYNC_SECRET");
    }
    let snapshot = store.fetch_snapshot().await?;
    println!(
        "Fetched {} link(s) in {} categor(ies)",
        snapshot.links.len(),
        snapshot.categories.len()
    );
    cache.put(SNAPSHOT_KEY, snapshot)?;
    Ok(())
}

async fn list(cache: LocalCache, store: Arc<dyn LinkStore>, args: ListArgs) -> Result<()> {
    let mut driver = PanelDriver::new(cache, store);
    driver
        .dispatch(Msg::Opened {
            force_refresh: args.refresh,
        })
        .await;
    if let Some(query) = args.query {
        driver.dispatch(Msg::QueryChanged(query)).await;
    }
    print_view(&driver.view());
    Ok(())
}

fn menu(cache: LocalCache) {
    let host = Arc::new(ConsoleMenu::default());
    let created = ContextMenuSynchronizer::new(cache, host.clone()).rebuild();
    nav_info!("Built {} menu entries", created);
    print!("{}", host.render());
}

async fn capture(store: Arc<dyn LinkStore>, args: CaptureArgs) -> Result<()> {
    let client = CaptureClient::new(store, Arc::new(ConsoleHost), RuntimeBus::new());
    let outcome = client
        .capture(&CaptureInvocation {
            window_id: CONSOLE_WINDOW,
            menu_item_id: save_item_id(&args.category),
            link_url: args.link,
            page_url: Some(args.url),
            page_title: args.title,
        })
        .await;
    match outcome {
        CaptureOutcome::Failed(kind) => bail!("capture failed: {kind}"),
        _ => Ok(()),
    }
}

/// Writes each partial result through to the cache so an interrupted run
/// keeps what it already generated.
struct CacheSink {
    cache: LocalCache,
    base: CachedSnapshot,
}

impl EnrichmentSink for CacheSink {
    fn on_partial_result(&self, links: &[Link]) {
        if let Err(err) = self
            .cache
            .put(SNAPSHOT_KEY, self.base.with_links(links.to_vec()))
        {
            nav_error!("Failed to store partial enrichment: {}", err);
        }
    }

    fn on_progress(&self, progress: EnrichmentProgress) {
        println!("{}/{}", progress.completed, progress.total);
    }
}

async fn enrich(config: &AppConfig, cache: &LocalCache) -> Result<()> {
    let Some(snapshot) = cache.get(SNAPSHOT_KEY) else {
        bail!("cache is empty; run `navsync sync` first");
    };
    let generator = HttpDescriptionGenerator::new(config.ai.clone())?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            nav_warn!("Interrupted, finishing the current item");
            on_interrupt.cancel();
        }
    });

    let sink = CacheSink {
        cache: cache.clone(),
        base: (*snapshot).clone(),
    };
    let report = run_enrichment(
        &snapshot.links,
        Link::is_missing_description,
        &generator,
        &sink,
        &cancel,
    )
    .await?;

    if report.nothing_to_do() {
        println!("Every link already has a description");
    } else {
        println!(
            "Described {} link(s), {} failed, {}/{} processed",
            report.succeeded, report.failed, report.progress.completed, report.progress.total
        );
    }
    Ok(())
}

fn extension(config: &AppConfig, args: ExtensionArgs) -> Result<()> {
    let icon_path = args.icon.or_else(|| config.extension.icon.clone());
    let settings = ExtensionSettings {
        api_base: config.api_base.clone(),
        secret: config.secret.clone().unwrap_or_default(),
        title: args
            .title
            .unwrap_or_else(|| config.extension.title.clone()),
        variant: args.browser.unwrap_or(config.extension.browser),
        icon_png: icon_path.as_deref().and_then(read_icon),
    };
    if settings.secret.is_empty() {
        nav_warn!("Generating an extension without a secret; captures will be refused");
    }

    let bundle = build_bundle(&settings)?;
    let written = bundle.write_to(&args.out)?;
    println!(
        "Wrote {} file(s) for {} to {}",
        written.len(),
        settings.variant,
        args.out.display()
    );
    Ok(())
}

fn read_icon(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            nav_warn!("Could not read icon {:?}: {}", path, err);
            None
        }
    }
}

/// Runs the background service with one panel and drives it from stdin.
async fn watch(cache: LocalCache, store: Arc<dyn LinkStore>) -> Result<()> {
    let service = BackgroundService::start(
        cache,
        store,
        Arc::new(ConsoleHost),
        Arc::new(ConsoleMenu::default()),
    );
    let mut panel = Some(service.open_panel(CONSOLE_WINDOW, false));
    println!("Commands: /<query>, refresh, toggle <category>, save <category> <url>, panel, quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            view = next_view(&mut panel) => match view {
                Some(view) => print_view(&view),
                None => {
                    println!("[panel] closed");
                    panel = None;
                }
            },
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                match line.split_whitespace().collect::<Vec<_>>().as_slice() {
                    ["quit"] => break,
                    ["refresh"] => send(&panel, Msg::RefreshClicked),
                    ["toggle", category] => send(&panel, Msg::CategoryToggled(category.to_string())),
                    ["save", category, url] => {
                        service
                            .menu_clicked(&CaptureInvocation {
                                window_id: CONSOLE_WINDOW,
                                menu_item_id: save_item_id(category),
                                page_url: Some(url.to_string()),
                                ..CaptureInvocation::default()
                            })
                            .await;
                    }
                    ["panel"] => {
                        if service.activate(CONSOLE_WINDOW).await != Activation::Closed {
                            panel = Some(service.open_panel(CONSOLE_WINDOW, false));
                        }
                    }
                    _ if line.starts_with('/') => send(&panel, Msg::QueryChanged(line[1..].to_string())),
                    _ => println!("unknown command: {line}"),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    if let Some(panel) = panel {
        panel.close().await;
    }
    service.shutdown().await;
    Ok(())
}

async fn next_view(panel: &mut Option<PanelHandle>) -> Option<PanelViewModel> {
    match panel {
        Some(handle) => handle.next_view().await,
        None => std::future::pending().await,
    }
}

fn send(panel: &Option<PanelHandle>, msg: Msg) {
    match panel {
        Some(handle) => {
            handle.send(msg);
        }
        None => println!("no panel open; use `panel`"),
    }
}

fn print_view(view: &PanelViewModel) {
    if let Some(error) = &view.error {
        println!("Load failed: {error}\nUse `refresh` to retry");
        return;
    }
    if let Some(empty) = view.empty {
        println!("{}", match empty {
            EmptyState::NoResults => "No results",
            EmptyState::NoData => "No data yet",
        });
        return;
    }
    for section in &view.sections {
        let marker = if section.expanded { "v" } else { ">" };
        println!("{marker} {} ({})", section.name, section.links.len());
        if section.expanded {
            for link in &section.links {
                println!("    {}  {}", link.title, link.url);
            }
        }
    }
}
