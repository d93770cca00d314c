// Debounced synchronization of preferences to the backend
// Author: Gabriel Demetrios Lafis

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, error, warn};
use tokio::task::JoinHandle;

use super::{FormatConfig, FormatConfigProvider, FormatError, SubscriptionId};
use crate::storage::{load_draft, save_draft, DraftStorage};

/// Delay between the last edit and the push
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);

/// Storage key of the persisted preferences
pub const FORMAT_PREFERENCES_KEY: &str = "format-preferences";

/// Destination for preference pushes (the backend preference endpoint)
pub trait PreferenceSink: Send + Sync {
    /// Persist the given preferences
    fn push(&self, config: &FormatConfig) -> Result<(), FormatError>;
}

/// Sink keeping preferences in draft storage
pub struct StoragePreferenceSink {
    storage: Arc<dyn DraftStorage + Send + Sync>,
}

impl StoragePreferenceSink {
    pub fn new(storage: Arc<dyn DraftStorage + Send + Sync>) -> Self {
        StoragePreferenceSink { storage }
    }

    /// Preferences saved by an earlier push, if any
    pub fn load(&self) -> Result<Option<FormatConfig>, FormatError> {
        load_draft(self.storage.as_ref(), FORMAT_PREFERENCES_KEY)
            .map_err(|e| FormatError::Sync(e.to_string()))
    }
}

impl PreferenceSink for StoragePreferenceSink {
    fn push(&self, config: &FormatConfig) -> Result<(), FormatError> {
        save_draft(self.storage.as_ref(), FORMAT_PREFERENCES_KEY, config)
            .map_err(|e| FormatError::Sync(e.to_string()))
    }
}

/// Buffers preference changes and pushes only the latest state
pub struct PreferenceSync {
    provider: Arc<FormatConfigProvider>,
    sink: Arc<dyn PreferenceSink>,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
    remote: Mutex<Option<FormatConfig>>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl PreferenceSync {
    /// Create a sync bound to a provider and a sink
    pub fn new(provider: Arc<FormatConfigProvider>, sink: Arc<dyn PreferenceSink>) -> Self {
        PreferenceSync {
            provider,
            sink,
            delay: DEFAULT_DEBOUNCE,
            pending: Mutex::new(None),
            remote: Mutex::new(None),
            subscription: Mutex::new(None),
        }
    }

    /// Override the debounce delay
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Restart the debounce timer
    ///
    /// The timer callback reads the provider when it fires, so the push
    /// always carries the state current at that moment.
    pub fn schedule(&self) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime available, preference push skipped");
                return;
            }
        };

        let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let provider = self.provider.clone();
        let sink = self.sink.clone();
        let delay = self.delay;

        *pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            push_current(&provider, sink.as_ref());
        }));
    }

    /// Cancel the pending timer and push immediately
    pub fn flush(&self) -> Result<(), FormatError> {
        if let Some(previous) = self.pending.lock().unwrap_or_else(|p| p.into_inner()).take() {
            previous.abort();
        }
        self.sink.push(&self.provider.get())
    }

    /// Whether a push is waiting on the timer
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }

    /// Schedule a push on every provider change
    pub fn watch(self: &Arc<Self>) -> SubscriptionId {
        let weak = Arc::downgrade(self);
        let id = self.provider.subscribe(move |config| {
            if let Some(sync) = weak.upgrade() {
                if !sync.take_remote_echo(config) {
                    sync.schedule();
                }
            }
        });

        let mut subscription = self.subscription.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = subscription.replace(id) {
            self.provider.unsubscribe(previous);
        }
        id
    }

    /// Apply preferences received from the backend without echoing them back
    ///
    /// Only the notification carrying exactly these preferences is skipped;
    /// local edits made meanwhile still schedule a push.
    pub fn apply_remote(&self, config: FormatConfig) {
        *self.remote.lock().unwrap_or_else(|p| p.into_inner()) = Some(config.clone());
        self.provider.set(config);
        self.remote.lock().unwrap_or_else(|p| p.into_inner()).take();
        debug!("Applied remote preferences");
    }

    // True once for the notification of the remote preferences being applied
    fn take_remote_echo(&self, config: &FormatConfig) -> bool {
        let mut remote = self.remote.lock().unwrap_or_else(|p| p.into_inner());
        if remote.as_ref() == Some(config) {
            remote.take();
            true
        } else {
            false
        }
    }
}

impl Drop for PreferenceSync {
    fn drop(&mut self) {
        let subscription = self.subscription.lock().unwrap_or_else(|p| p.into_inner()).take();
        if let Some(id) = subscription {
            self.provider.unsubscribe(id);
        }
    }
}

fn push_current(provider: &FormatConfigProvider, sink: &dyn PreferenceSink) {
    let current = provider.get();
    match sink.push(&current) {
        Ok(()) => debug!("Pushed preferences (locale {})", current.locale),
        Err(err) => error!("Preference push failed: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;

    mock! {
        pub Sink {}

        impl PreferenceSink for Sink {
            fn push(&self, config: &FormatConfig) -> Result<(), FormatError>;
        }
    }

    fn sync_with(provider: Arc<FormatConfigProvider>, sink: MockSink) -> Arc<PreferenceSync> {
        Arc::new(
            PreferenceSync::new(provider, Arc::new(sink)).with_delay(Duration::from_millis(40)),
        )
    }

    #[tokio::test]
    async fn rapid_edits_push_only_the_last_value() {
        let provider = Arc::new(FormatConfigProvider::default());
        let mut sink = MockSink::new();
        sink.expect_push()
            .times(1)
            .withf(|cfg| cfg.decimals == 4 && cfg.currency == "EUR")
            .returning(|_| Ok(()));

        let sync = sync_with(provider.clone(), sink);
        sync.watch();

        provider.update(|cfg| cfg.decimals = 3);
        provider.update(|cfg| cfg.decimals = 4);
        provider.update(|cfg| cfg.currency = "EUR".to_string());
        assert!(sync.is_pending());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!sync.is_pending());
    }

    #[tokio::test]
    async fn timer_reads_state_at_fire_time() {
        let provider = Arc::new(FormatConfigProvider::default());
        let mut sink = MockSink::new();
        sink.expect_push()
            .times(1)
            .withf(|cfg| cfg.locale == "de-DE")
            .returning(|_| Ok(()));

        let sync = sync_with(provider.clone(), sink);
        sync.schedule();

        // Not watched, so this edit does not reschedule.
        provider.update(|cfg| cfg.locale = "de-DE".to_string());

        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    #[tokio::test]
    async fn remote_preferences_are_not_echoed() {
        let provider = Arc::new(FormatConfigProvider::default());
        let mut sink = MockSink::new();
        sink.expect_push().times(0);

        let sync = sync_with(provider.clone(), sink);
        sync.watch();

        let remote = FormatConfig {
            locale: "fr-FR".to_string(),
            ..FormatConfig::default()
        };
        sync.apply_remote(remote.clone());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(provider.get(), remote);
        assert!(!sync.is_pending());
    }

    #[tokio::test]
    async fn local_edit_during_remote_apply_is_pushed() {
        let provider = Arc::new(FormatConfigProvider::default());
        let mut sink = MockSink::new();
        sink.expect_push()
            .times(1)
            .withf(|cfg| cfg.locale == "fr-FR" && cfg.decimals == 5)
            .returning(|_| Ok(()));

        // Another component reacts to the remote locale with a local edit
        let editor = provider.clone();
        provider.subscribe(move |cfg| {
            if cfg.locale == "fr-FR" && cfg.decimals != 5 {
                editor.update(|cfg| cfg.decimals = 5);
            }
        });

        let sync = sync_with(provider.clone(), sink);
        sync.watch();

        sync.apply_remote(FormatConfig {
            locale: "fr-FR".to_string(),
            ..FormatConfig::default()
        });
        assert!(sync.is_pending());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(provider.get().decimals, 5);
    }

    #[tokio::test]
    async fn storage_sink_persists_the_debounced_state() {
        use crate::storage::MemoryStorage;

        let provider = Arc::new(FormatConfigProvider::default());
        let storage = Arc::new(MemoryStorage::new());
        let sink = Arc::new(StoragePreferenceSink::new(storage.clone()));
        let sync = Arc::new(
            PreferenceSync::new(provider.clone(), sink.clone())
                .with_delay(Duration::from_millis(20)),
        );
        sync.watch();

        provider.update(|cfg| cfg.null_value = "n/a".to_string());
        assert_eq!(sink.load().unwrap(), None);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(sink.load().unwrap().map(|cfg| cfg.null_value), Some("n/a".to_string()));
    }

    #[tokio::test]
    async fn flush_pushes_now_and_cancels_the_timer() {
        let provider = Arc::new(FormatConfigProvider::default());
        let mut sink = MockSink::new();
        sink.expect_push()
            .times(1)
            .withf(|cfg| cfg.currency == "JPY")
            .returning(|_| Err(FormatError::Sync("offline".to_string())));

        let sync = sync_with(provider.clone(), sink);
        sync.watch();

        provider.update(|cfg| cfg.currency = "JPY".to_string());
        assert!(sync.is_pending());

        assert!(matches!(sync.flush(), Err(FormatError::Sync(_))));
        assert!(!sync.is_pending());

        tokio::time::sleep(Duration::from_millis(120)).await;
    }

    #[tokio::test]
    async fn dropping_the_sync_unsubscribes() {
        let provider = Arc::new(FormatConfigProvider::default());
        let sync = sync_with(provider.clone(), MockSink::new());
        sync.watch();
        assert_eq!(provider.listener_count(), 1);

        drop(sync);
        assert_eq!(provider.listener_count(), 0);
    }
}
