//! Installation point for the process-wide saver.
//!
//! Late-binding callers ask the registry instead of building their own
//! saver, so capabilities are probed once per process.

use std::sync::OnceLock;

use crate::saver::Saver;

#[derive(Default)]
pub struct Registry {
    installed: OnceLock<Saver>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the saver built by `init` unless one is already installed,
    /// and returns the installed saver either way.
    pub fn install_with<F>(&self, init: F) -> Saver
    where
        F: FnOnce() -> Saver,
    {
        let mut fresh = false;
        let saver = self.installed.get_or_init(|| {
            fresh = true;
            init()
        });
        if !fresh {
            tracing::debug!("saver already installed; reusing it");
        }
        saver.clone()
    }

    pub fn installed(&self) -> Option<Saver> {
        self.installed.get().cloned()
    }
}

/// The process-wide registry.
pub fn global() -> &'static Registry {
    static GLOBAL: OnceLock<Registry> = OnceLock::new();
    GLOBAL.get_or_init(Registry::new)
}
