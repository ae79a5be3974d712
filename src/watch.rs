//! Rebuild on source changes

use crate::compiler::Compiler;
use crate::config::Config;
use crate::config::constants::WORK_DIR;
use crate::error::Result;
use crate::session::Session;
use crate::util::file::resolve;
use indexmap::IndexSet;
use notify::{Config as WatchConfig, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const DEBOUNCE: Duration = Duration::from_millis(200);

/// Directories holding declared entry files
pub fn watch_roots(root: &Path, config: &Config) -> Vec<PathBuf> {
    let mut dirs = IndexSet::new();
    for pair in config.js.iter().chain(config.style_bundles()) {
        for entry in &pair.entry {
            if let Some(parent) = entry.absolute.parent() {
                dirs.insert(parent.to_path_buf());
            }
        }
    }

    if dirs.is_empty() {
        dirs.insert(root.to_path_buf());
    }
    dirs.into_iter().collect()
}

fn is_output(path: &Path, public_dir: &Path, work_dir: &Path) -> bool {
    path.starts_with(public_dir) || path.starts_with(work_dir)
}

/// Watch entry directories and re-run the compiler after each burst of changes
///
/// Every successful rebuild fires `build` again. Failed rebuilds are logged
/// and watching continues.
pub async fn watch_and_rebuild(session: &mut Session, compiler: &dyn Compiler) -> Result<()> {
    let (tx, rx) = mpsc::channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| {
            if let Err(e) = tx.send(res) {
                error!("Failed to send watch event: {}", e);
            }
        },
        WatchConfig::default(),
    )?;

    for dir in watch_roots(session.root(), session.config()) {
        watcher.watch(&dir, RecursiveMode::Recursive)?;
        debug!("Watching directory: {:?}", dir);
    }

    let public_dir = resolve(session.root(), &session.config().public_path);
    let work_dir = session.root().join(WORK_DIR);

    info!("Watching for changes...");

    let mut pending_changes: HashSet<PathBuf> = HashSet::new();
    let mut last_event_time = Instant::now();

    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(event)) => {
                if matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    let relevant: Vec<_> = event
                        .paths
                        .into_iter()
                        .filter(|path| !is_output(path, &public_dir, &work_dir))
                        .collect();

                    if !relevant.is_empty() {
                        pending_changes.extend(relevant);
                        last_event_time = Instant::now();
                    }
                }
            }
            Ok(Err(e)) => {
                warn!("Watch error: {}", e);
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                if !pending_changes.is_empty() && last_event_time.elapsed() >= DEBOUNCE {
                    let changed: Vec<_> = pending_changes.drain().collect();
                    info!("Detected changes in: {:?}", changed);

                    match session.run(compiler).await {
                        Ok(report) => debug!("Rebuild produced {} assets", report.assets.len()),
                        Err(e) => error!("Rebuild failed: {}", e),
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                error!("Watch channel disconnected");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Mix;

    #[test]
    fn test_watch_roots_from_entries() {
        let mut mix = Mix::new("/project");
        mix.js("resources/assets/js/app.js", "public/js").unwrap();
        mix.js("resources/assets/js/admin.js", "public/js").unwrap();
        mix.sass("resources/assets/sass/app.scss", "public/css").unwrap();

        let roots = watch_roots(mix.root(), mix.config());
        assert_eq!(
            roots,
            vec![
                PathBuf::from("/project/resources/assets/js"),
                PathBuf::from("/project/resources/assets/sass"),
            ]
        );
    }

    #[test]
    fn test_watch_roots_default_to_project() {
        let mix = Mix::new("/project");
        assert_eq!(watch_roots(mix.root(), mix.config()), vec![PathBuf::from("/project")]);
    }
}
