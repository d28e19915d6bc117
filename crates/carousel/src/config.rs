use crate::events::AppEvent;
use crate::gui::stage::STAGE_NAME;
use async_channel::Sender;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use prism::CarouselConfig;
use prism::config::{default_config, get_config_path, load_config, write_default_config};
use std::path::Path;
use std::time::Duration;

const FALLBACK_FACETS: usize = 6;

/// Loads the user configuration, falling back to the bundled one when it is
/// missing or unusable.
pub fn load_or_default() -> CarouselConfig {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        match write_default_config(&path) {
            Ok(_) => log::info!("Wrote the default configuration to {}", path.display()),
            Err(e) => log::warn!(
                "No configuration at {} and writing the default failed: {}",
                path.display(),
                e
            ),
        }
        return bundled();
    }

    match load_config().and_then(|c| c.validate().map(|()| c)) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using the bundled default: {}", e);
            bundled()
        }
    }
}

fn bundled() -> CarouselConfig {
    default_config().unwrap_or_else(|e| {
        log::error!("Bundled config is unusable: {}", e);
        CarouselConfig::new(STAGE_NAME, vec![""; FALLBACK_FACETS], 480.0, 300.0)
    })
}

/// Quiet period that folds an editor's save burst into a single reload.
const RELOAD_SETTLE: Duration = Duration::from_millis(150);

/// Whether `event` should make the carousel re-read `config_path`.
/// Deleting the file keeps the running configuration.
fn triggers_reload(event: &notify::Event, config_path: &Path) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event.paths.iter().any(|p| p == config_path)
}

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent().map(Path::to_path_buf) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }
    log::debug!("Watching {} for changes", config_path.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if triggers_reload(&event, &config_path) => {
                tokio::time::sleep(RELOAD_SETTLE).await;
                let folded = std::iter::from_fn(|| bridge_rx.try_recv().ok()).count();
                log::info!(
                    "{} changed ({} more events folded), reloading",
                    config_path.display(),
                    folded
                );
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
