// Process-wide format configuration provider
// Author: Gabriel Demetrios Lafis

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use once_cell::sync::Lazy;

use super::FormatConfig;

/// Callback invoked with the new configuration after every change
pub type FormatListener = Arc<dyn Fn(&FormatConfig) + Send + Sync>;

/// Handle returned by [`FormatConfigProvider::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Holds the current formatting preferences and notifies subscribers
pub struct FormatConfigProvider {
    config: RwLock<FormatConfig>,
    listeners: Mutex<Vec<(SubscriptionId, FormatListener)>>,
    next_id: AtomicU64,
}

static GLOBAL: Lazy<Arc<FormatConfigProvider>> =
    Lazy::new(|| Arc::new(FormatConfigProvider::new(FormatConfig::default())));

/// The single process-wide provider
pub fn global() -> Arc<FormatConfigProvider> {
    GLOBAL.clone()
}

impl FormatConfigProvider {
    /// Create a standalone provider
    pub fn new(config: FormatConfig) -> Self {
        FormatConfigProvider {
            config: RwLock::new(config),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Snapshot of the current configuration
    pub fn get(&self) -> FormatConfig {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the configuration and notify subscribers
    pub fn set(&self, config: FormatConfig) {
        {
            let mut current = self
                .config
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *current = config.clone();
        }

        self.notify(&config);
    }

    /// Modify the configuration in place and notify subscribers
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut FormatConfig),
    {
        let updated = {
            let mut current = self
                .config
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            f(&mut current);
            current.clone()
        };

        self.notify(&updated);
    }

    /// Register a listener for configuration changes
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&FormatConfig) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn notify(&self, config: &FormatConfig) {
        // Listeners may call back into the provider, so run them unlocked.
        let listeners: Vec<FormatListener> = self
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(config);
        }
    }
}

impl Default for FormatConfigProvider {
    fn default() -> Self {
        Self::new(FormatConfig::default())
    }
}
