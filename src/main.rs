use arcadia::config::AppConfig;
use arcadia::controller::{spawn_collector, InputSource, PollLoop};
use arcadia::host::{ChannelBridge, HostRequest, Inbound, LinePrompt};
use arcadia::mapping::EdgeDetector;
use arcadia::menu::item::{parse_mod_listing, WorkspaceListing};
use arcadia::menu::{ConfiguratorMenu, MenuController, ModMenu, TracingSink, WorkspaceMenu};
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use std::io::BufRead;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::instrument::WithSubscriber;
use tracing::{debug, error, info, warn, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuKind {
    Mods,
    Workspaces,
    Config,
}

struct Args {
    menu: MenuKind,
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;
    let args = parse_args()?;

    let config_path = args.config.unwrap_or_else(AppConfig::default_path);
    // The level lives in the config, loading it logs at the default level
    let config = AppConfig::load_or_create(&config_path)
        .with_subscriber(logging_subscriber(LevelFilter::INFO))
        .await
        .map_err(|e| eyre!("Failed to load config {}: {}", config_path.display(), e))?;
    setup_logging_env(config.logger.level.into())?;
    info!("Using config {}", config_path.display());

    // Gilrs is not Send, the loop stays on this task
    let collector = spawn_collector(Some(config.controller.collector_settings()))
        .map_err(|e| eyre!("Failed to start controller: {}", e))?;
    let edges = EdgeDetector::new(config.bindings.clone(), config.controller.edge_settings());
    let mut poll = PollLoop::new(collector, edges, config.controller.poll_interval());

    let (bridge, requests) = ChannelBridge::channel(config.host.channel_capacity);
    let writer = spawn_request_writer(requests);

    let result = match args.menu {
        MenuKind::Mods => {
            let listing = tokio::fs::read_to_string(&config.host.mod_listing)
                .await
                .map_err(|e| {
                    eyre!(
                        "Failed to read mod listing {}: {}",
                        config.host.mod_listing.display(),
                        e
                    )
                })?;
            let items = parse_mod_listing(&listing)
                .map_err(|e| eyre!("Failed to parse mod listing: {}", e))?;

            poll = with_host_input(poll, config.host.channel_capacity)?;
            let mut menu = ModMenu::new(items, &config.menu, bridge, TracingSink::default());
            run_menu(&mut poll, &mut menu).await
        }
        MenuKind::Config => {
            poll = with_host_input(poll, config.host.channel_capacity)?;
            let mut menu = ConfiguratorMenu::new(
                config.configurator.sections.clone(),
                &config.menu,
                bridge,
                TracingSink::default(),
            );
            run_menu(&mut poll, &mut menu).await
        }
        MenuKind::Workspaces => {
            let listing = tokio::fs::read_to_string(&config.host.workspace_listing)
                .await
                .map_err(|e| {
                    eyre!(
                        "Failed to read workspace listing {}: {}",
                        config.host.workspace_listing.display(),
                        e
                    )
                })?;
            let listing = WorkspaceListing::parse(&listing)
                .map_err(|e| eyre!("Failed to parse workspace listing: {}", e))?;

            // stdin is taken by the dialogs here
            let mut menu = WorkspaceMenu::new(
                listing,
                &config.menu,
                bridge,
                TracingSink::default(),
                LinePrompt::stdio(),
            );
            run_menu(&mut poll, &mut menu).await
        }
    };

    // The menu held the last sender, the writer drains and stops
    if let Err(e) = writer.await {
        error!("Request writer failed: {}", e);
    }
    result
}

async fn run_menu<S: InputSource, C: MenuController>(
    poll: &mut PollLoop<S>,
    menu: &mut C,
) -> Result<()> {
    let stats = poll
        .run(menu)
        .await
        .map_err(|e| eyre!("Menu stopped: {}", e))?;
    info!(
        "Session finished: {} ticks, {} actions since {}",
        stats.ticks,
        stats.actions,
        stats.started.format("%H:%M:%S")
    );
    Ok(())
}

fn parse_args() -> Result<Args> {
    let mut menu = MenuKind::Mods;
    let mut config = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "mods" => menu = MenuKind::Mods,
            "workspaces" => menu = MenuKind::Workspaces,
            "config" => menu = MenuKind::Config,
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| eyre!("--config needs a path"))?;
                config = Some(PathBuf::from(path));
            }
            other => return Err(eyre!("Unknown argument: {}", other)),
        }
    }
    Ok(Args { menu, config })
}

// Requests leave as one JSON document per line on stdout
fn spawn_request_writer(mut requests: mpsc::Receiver<HostRequest>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(request) = requests.recv().await {
            let line = match request.to_json() {
                Ok(line) => line,
                Err(e) => {
                    error!("Failed to serialize {:?}: {}", request, e);
                    continue;
                }
            };
            if let Err(e) = stdout.write_all(format!("{}\n", line).as_bytes()).await {
                error!("Failed to write host request: {}", e);
                break;
            }
            if let Err(e) = stdout.flush().await {
                warn!("Failed to flush stdout: {}", e);
            }
        }
        debug!("Request writer stopped");
    })
}

fn with_host_input<S: InputSource>(poll: PollLoop<S>, capacity: usize) -> Result<PollLoop<S>> {
    let (inbound_tx, inbound_rx) = mpsc::channel(capacity.max(1));
    spawn_inbound_reader(inbound_tx)?;
    Ok(poll.with_inbound(inbound_rx))
}

// A blocking read on stdin never completes on its own, so it runs on a detached
// thread that cannot keep the runtime alive once the menu is closed.
fn spawn_inbound_reader(inbound: mpsc::Sender<Inbound>) -> Result<()> {
    std::thread::Builder::new()
        .name("host-stdin".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        error!("Failed to read from host: {}", e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match Inbound::parse(line.trim()) {
                    Ok(message) => {
                        if inbound.blocking_send(message).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Ignoring host line {:?}: {}", line, e),
                }
            }
            debug!("Inbound reader stopped");
        })
        .map_err(|e| eyre!("Failed to start host reader: {}", e))?;
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    Ok(())
}

fn logging_subscriber(level: LevelFilter) -> impl Subscriber + Send + Sync + 'static {
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .finish()
}

fn setup_logging_env(level: LevelFilter) -> Result<()> {
    tracing::subscriber::set_global_default(logging_subscriber(level))
        .map_err(|e| eyre!("Failed to set up logging: {}", e))
}
