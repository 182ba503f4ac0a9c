//! Shader file watching for hot-reload.
//!
//! Watches the configured shader files and reports when any of them change.
//! Events arrive on a channel from notify's watcher thread and are drained
//! on the event-loop thread once per frame; the actual reload (recompile,
//! relink, swap on success) is driven by the application.

use std::path::PathBuf;
use std::sync::mpsc;

use notify::{RecursiveMode, Watcher};

/// Watches shader files and coalesces change notifications.
pub struct ShaderWatcher {
    rx: mpsc::Receiver<notify::Result<notify::Event>>,
    // Kept alive for the lifetime of the watch.
    _watcher: notify::RecommendedWatcher,
}

impl ShaderWatcher {
    /// Start watching the given files.
    pub fn watch(paths: &[PathBuf]) -> notify::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx)?;
        for path in paths {
            watcher.watch(path, RecursiveMode::NonRecursive)?;
        }
        Ok(Self {
            rx,
            _watcher: watcher,
        })
    }

    /// Drain pending events; returns `true` if any watched file was written.
    ///
    /// Multiple events between frames (editors often write twice) coalesce
    /// into a single reload.
    pub fn take_change(&self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(event) if is_content_change(&event.kind) => changed = true,
                Ok(_) => {}
                Err(err) => log::warn!("shader watch error: {err}"),
            }
        }
        changed
    }
}

fn is_content_change(kind: &notify::EventKind) -> bool {
    matches!(
        kind,
        notify::EventKind::Create(_) | notify::EventKind::Modify(_)
    )
}
