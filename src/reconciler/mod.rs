// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Toggle reconciliation.
//!
//! The physical light only understands a toggle pulse. The reconciler keeps
//! a believed on/off state and, when asked for a different state, fires the
//! configured number of pulses before recording the new state.
//!
//! # Bootstrap
//!
//! Every operation first awaits [`ToggleReconciler::initialize`], which runs
//! exactly once: it seeds the believed state from the store and resolves the
//! configured appliance/button pair to a signal id. A resolution failure is
//! logged and leaves the reconciler usable, but every later pulse fails
//! until the process is restarted with a corrected configuration.
//!
//! # Transitions
//!
//! A single async mutex guards the believed state and is held for the whole
//! pulse sequence. Concurrent `set_state` calls therefore run one after the
//! other in arrival order, and readers wait for an in-flight sequence to
//! finish before they see the state.
//!
//! # Failed pulses
//!
//! Pulse failures never abort a sequence and never leave the believed state
//! stale: once the sequence has run, the desired state is recorded and
//! persisted. The returned [`TransitionReport`] carries the failure count.
//!
//! The sequence itself runs on a spawned task that owns the state lock, so a
//! caller that gives up waiting (a host-side timeout, say) cannot leave the
//! light half-toggled with the old state recorded.

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, OnceCell, OwnedMutexGuard, watch};

use crate::config::AccessoryConfig;
use crate::error::{Error, ProtocolError, Result};
use crate::protocol::{SignalTransport, find_appliance};
use crate::pulse::{self, PulseReport};
use crate::store::StateStore;

/// Outcome of a [`ToggleReconciler::set_state`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionReport {
    /// The requested state.
    pub desired: bool,
    /// False when the believed state already matched and nothing was sent.
    pub changed: bool,
    /// Pulse delivery counters.
    pub pulses: PulseReport,
}

impl TransitionReport {
    fn unchanged(desired: bool) -> Self {
        Self {
            desired,
            changed: false,
            pulses: PulseReport::default(),
        }
    }

    /// Returns true if no pulse failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.pulses.is_clean()
    }
}

/// Drives a toggle-only light towards a desired on/off state.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use remo_toggle_light::AccessoryConfig;
/// use remo_toggle_light::protocol::HttpConfig;
/// use remo_toggle_light::reconciler::ToggleReconciler;
/// use remo_toggle_light::store::MemoryStore;
///
/// # async fn example() -> remo_toggle_light::Result<()> {
/// let config = AccessoryConfig::new("Bedroom Light", "toggle", "https://api.nature.global", "token");
/// let client = HttpConfig::new(config.api_endpoint(), config.access_token()).into_client()?;
/// let reconciler = ToggleReconciler::new(config, Arc::new(client), Arc::new(MemoryStore::new()));
///
/// let report = reconciler.set_state(true).await;
/// assert!(reconciler.get_state().await);
/// println!("{} pulses delivered", report.pulses.delivered());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ToggleReconciler<T, S> {
    shared: Arc<Shared<T, S>>,
    signal_id: OnceCell<Option<String>>,
}

/// State reachable from a detached transition task.
#[derive(Debug)]
struct Shared<T, S> {
    config: Arc<AccessoryConfig>,
    transport: Arc<T>,
    store: Arc<S>,
    believed_on: Arc<Mutex<bool>>,
    transitioning: AtomicBool,
    state_tx: watch::Sender<bool>,
}

/// Lowers the transitioning flag when the transition task ends.
struct TransitionFlag<'a>(&'a AtomicBool);

impl Drop for TransitionFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<T, S> ToggleReconciler<T, S>
where
    T: SignalTransport + 'static,
    S: StateStore + 'static,
{
    /// Creates a reconciler with the believed state set to off.
    ///
    /// Nothing is read or resolved until [`initialize`](Self::initialize)
    /// or another operation runs.
    pub fn new(config: impl Into<Arc<AccessoryConfig>>, transport: Arc<T>, store: Arc<S>) -> Self {
        let (state_tx, _) = watch::channel(false);
        Self {
            shared: Arc::new(Shared {
                config: config.into(),
                transport,
                store,
                believed_on: Arc::new(Mutex::new(false)),
                transitioning: AtomicBool::new(false),
                state_tx,
            }),
            signal_id: OnceCell::new(),
        }
    }

    /// Returns the accessory configuration.
    #[must_use]
    pub fn config(&self) -> &AccessoryConfig {
        &self.shared.config
    }

    /// Runs bootstrap once; later and concurrent calls wait for that run.
    ///
    /// Returns the resolved signal id, or `None` if resolution failed.
    pub async fn initialize(&self) -> Option<&str> {
        self.signal_id
            .get_or_init(|| self.shared.bootstrap())
            .await
            .as_deref()
    }

    /// Returns true once bootstrap has completed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.signal_id.initialized()
    }

    /// Returns the resolved signal id without waiting for bootstrap.
    #[must_use]
    pub fn signal_id(&self) -> Option<&str> {
        self.signal_id.get().and_then(Option::as_deref)
    }

    /// Returns true while a pulse sequence is running.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.shared.transitioning.load(Ordering::SeqCst)
    }

    /// Subscribes to believed state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shared.state_tx.subscribe()
    }

    /// Waits for bootstrap and for any in-flight transition to finish.
    pub async fn wait_idle(&self) {
        self.initialize().await;
        drop(self.shared.believed_on.lock().await);
    }

    /// Returns the believed state once bootstrap and any in-flight
    /// transition have completed.
    pub async fn get_state(&self) -> bool {
        self.initialize().await;
        let on = *self.shared.believed_on.lock().await;
        tracing::info!(accessory = %self.config().name(), on, "Getting state");
        on
    }

    /// Moves the light to `desired`.
    ///
    /// If the believed state already equals `desired` nothing is sent and
    /// nothing is written. Otherwise the pulse count for the desired
    /// direction is fired, then the believed state is updated and persisted
    /// regardless of individual pulse failures.
    ///
    /// The pulse sequence runs on its own task. Dropping the returned future
    /// stops waiting for the sequence but does not cut it short.
    pub async fn set_state(&self, desired: bool) -> TransitionReport {
        let signal_id = self.initialize().await.map(str::to_owned);
        let name = self.config().name();

        let believed_on = Arc::clone(&self.shared.believed_on).lock_owned().await;
        tracing::info!(accessory = %name, desired, "Setting state");

        if *believed_on == desired {
            tracing::debug!(accessory = %name, "Already in requested state");
            return TransitionReport::unchanged(desired);
        }

        self.shared.transitioning.store(true, Ordering::SeqCst);
        let transition = tokio::spawn(Arc::clone(&self.shared).run_transition(
            believed_on,
            desired,
            signal_id,
        ));

        match transition.await {
            Ok(report) => report,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                tracing::error!(accessory = %name, "Transition task cancelled: {e}");
                TransitionReport::unchanged(desired)
            }
        }
    }
}

impl<T: SignalTransport, S: StateStore> Shared<T, S> {
    async fn run_transition(
        self: Arc<Self>,
        mut believed_on: OwnedMutexGuard<bool>,
        desired: bool,
        signal_id: Option<String>,
    ) -> TransitionReport {
        let _flag = TransitionFlag(&self.transitioning);
        let name = self.config.name();

        let count = self.config.toggle_count_for(desired);
        tracing::debug!(accessory = %name, count = %count, "Sending toggle pulses");

        let pulses = pulse::repeat(count, self.config.signal_delay(), |_| {
            self.send_pulse(signal_id.as_deref())
        })
        .await;

        if !pulses.is_clean() {
            tracing::warn!(
                accessory = %name,
                failed = pulses.failed,
                attempted = pulses.attempted,
                "Some toggle pulses failed; recording requested state anyway"
            );
        }

        *believed_on = desired;
        if let Err(e) = self.store.save(name, desired).await {
            tracing::error!(accessory = %name, "Error persisting state: {e}");
        }
        self.state_tx.send_replace(desired);

        TransitionReport {
            desired,
            changed: true,
            pulses,
        }
    }

    async fn send_pulse(&self, signal_id: Option<&str>) -> Result<()> {
        let signal_id = signal_id.ok_or(Error::SignalUnresolved)?;
        let timeout = self.config.pulse_timeout();

        match tokio::time::timeout(timeout, self.transport.send_signal(signal_id)).await {
            Ok(result) => result.map_err(Error::from),
            Err(_) => Err(ProtocolError::Timeout(
                u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            )
            .into()),
        }
    }

    async fn bootstrap(&self) -> Option<String> {
        let name = self.config.name();

        match self.store.load(name).await {
            Ok(Some(on)) => {
                *self.believed_on.lock().await = on;
                self.state_tx.send_replace(on);
                tracing::debug!(accessory = %name, on, "Restored persisted state");
            }
            Ok(None) => {
                tracing::debug!(accessory = %name, "No persisted state, starting off");
            }
            Err(e) => {
                tracing::error!(accessory = %name, "Error reading persisted state: {e}");
            }
        }

        match self.resolve_signal().await {
            Ok(signal_id) => {
                tracing::info!(accessory = %name, signal_id = %signal_id, "Resolved signal id");
                Some(signal_id)
            }
            Err(e) => {
                tracing::error!(accessory = %name, "Error getting signal id: {e}");
                None
            }
        }
    }

    async fn resolve_signal(&self) -> Result<String> {
        let name = self.config.name();
        let button = self.config.button_name();

        let appliances = self.transport.list_appliances().await?;
        let appliance = find_appliance(&appliances, name)
            .ok_or_else(|| Error::ApplianceNotFound(name.to_string()))?;
        let signal = appliance
            .find_signal(button)
            .ok_or_else(|| Error::SignalNotFound {
                appliance: appliance.nickname.clone(),
                button: button.to_string(),
            })?;

        Ok(signal.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::testing::FakeTransport;
    use super::*;
    use crate::store::MemoryStore;

    const NAME: &str = "Bedroom Light";

    fn config() -> AccessoryConfig {
        AccessoryConfig::new(NAME, "toggle", "http://remo.invalid", "token")
            .with_toggle_counts(1, 2)
            .with_signal_delay(Duration::from_millis(500))
    }

    fn reconciler(
        transport: FakeTransport,
        store: MemoryStore,
    ) -> (
        Arc<ToggleReconciler<FakeTransport, MemoryStore>>,
        Arc<FakeTransport>,
        Arc<MemoryStore>,
    ) {
        let transport = Arc::new(transport);
        let store = Arc::new(store);
        let reconciler = Arc::new(ToggleReconciler::new(
            config(),
            Arc::clone(&transport),
            Arc::clone(&store),
        ));
        (reconciler, transport, store)
    }

    #[tokio::test]
    async fn bootstrap_resolves_signal_id() {
        let (r, transport, _) = reconciler(
            FakeTransport::with_button(" Bedroom Light ", "toggle "),
            MemoryStore::new(),
        );

        assert!(!r.is_initialized());
        assert_eq!(r.initialize().await, Some("sig-1"));
        assert!(r.is_initialized());
        assert_eq!(r.signal_id(), Some("sig-1"));

        r.initialize().await;
        assert_eq!(transport.list_calls(), 1);
    }

    #[tokio::test]
    async fn bootstrap_seeds_state_from_store() {
        let (r, _, _) = reconciler(
            FakeTransport::with_button(NAME, "toggle"),
            MemoryStore::with_value(NAME, true),
        );
        assert!(r.get_state().await);
        assert!(*r.subscribe().borrow());
    }

    #[tokio::test]
    async fn setting_current_state_is_a_no_op() {
        let (r, transport, store) =
            reconciler(FakeTransport::with_button(NAME, "toggle"), MemoryStore::new());

        let report = r.set_state(false).await;

        assert!(!report.changed);
        assert_eq!(report.pulses.attempted, 0);
        assert_eq!(transport.sent_count(), 0);
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn sample_scenario() {
        let (r, transport, store) =
            reconciler(FakeTransport::with_button(NAME, "toggle"), MemoryStore::new());

        let report = r.set_state(true).await;
        assert!(report.changed);
        assert_eq!(report.pulses.attempted, 1);
        assert!(r.get_state().await);
        assert_eq!(store.get(NAME), Some(true));

        let report = r.set_state(true).await;
        assert!(!report.changed);
        assert_eq!(transport.sent_count(), 1);

        let before = tokio::time::Instant::now();
        let report = r.set_state(false).await;
        assert_eq!(report.pulses.attempted, 2);
        assert_eq!(before.elapsed(), Duration::from_millis(500));
        assert!(!r.get_state().await);
        assert_eq!(store.get(NAME), Some(false));
        assert_eq!(store.writes(), 2);

        let sent = transport.sent_at();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[2] - sent[1], Duration::from_millis(500));
        assert!(transport.sent_ids().iter().all(|id| id == "sig-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_sets_do_not_interleave() {
        let (r, transport, store) = reconciler(
            FakeTransport::with_button(NAME, "toggle").with_send_latency(Duration::from_millis(100)),
            MemoryStore::new(),
        );
        r.initialize().await;

        let (first, second) = tokio::join!(r.set_state(true), r.set_state(false));

        assert_eq!(first.pulses.attempted, 1);
        assert_eq!(second.pulses.attempted, 2);
        assert_eq!(
            transport.sent_at(),
            vec![
                Duration::ZERO,
                Duration::from_millis(100),
                Duration::from_millis(700)
            ]
        );
        assert!(!r.get_state().await);
        assert_eq!(store.writes(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn readers_wait_for_transition() {
        let (r, _, _) = reconciler(
            FakeTransport::with_button(NAME, "toggle").with_send_latency(Duration::from_secs(1)),
            MemoryStore::new(),
        );
        r.initialize().await;

        let setter = tokio::spawn({
            let r = Arc::clone(&r);
            async move { r.set_state(true).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(r.is_transitioning());

        assert!(r.get_state().await);
        assert!(!r.is_transitioning());
        setter.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn operations_wait_for_bootstrap() {
        let (transport, gate) = FakeTransport::with_button(NAME, "toggle").gated();
        let (r, _, _) = reconciler(transport, MemoryStore::with_value(NAME, true));

        let getter = tokio::spawn({
            let r = Arc::clone(&r);
            async move { r.get_state().await }
        });
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!getter.is_finished());
        assert!(!r.is_initialized());

        gate.notify_one();
        assert!(getter.await.unwrap());
        assert_eq!(r.signal_id(), Some("sig-1"));
    }

    #[tokio::test]
    async fn missing_appliance_leaves_signal_unresolved() {
        let (r, transport, store) = reconciler(
            FakeTransport::with_button("Kitchen", "toggle"),
            MemoryStore::with_value(NAME, false),
        );

        assert_eq!(r.initialize().await, None);
        assert!(!r.get_state().await);

        let report = r.set_state(true).await;
        assert_eq!(report.pulses.attempted, 1);
        assert_eq!(report.pulses.failed, 1);
        assert_eq!(transport.sent_count(), 0);
        assert!(r.get_state().await);
        assert_eq!(store.get(NAME), Some(true));
    }

    #[tokio::test]
    async fn missing_button_leaves_signal_unresolved() {
        let (r, _, _) = reconciler(
            FakeTransport::with_button(NAME, "power"),
            MemoryStore::new(),
        );
        assert_eq!(r.initialize().await, None);
        assert_eq!(r.signal_id(), None);
    }

    #[tokio::test]
    async fn failed_pulses_still_record_state() {
        let (r, transport, store) =
            reconciler(FakeTransport::with_button(NAME, "toggle"), MemoryStore::new());
        transport.set_failing(true);

        let report = r.set_state(true).await;
        assert!(!report.is_clean());
        assert_eq!(report.pulses.failed, 1);
        assert!(r.get_state().await);
        assert_eq!(store.get(NAME), Some(true));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_pulse_times_out() {
        let transport = Arc::new(
            FakeTransport::with_button(NAME, "toggle").with_send_latency(Duration::from_secs(60)),
        );
        let r = ToggleReconciler::new(
            config().with_pulse_timeout(Duration::from_secs(2)),
            Arc::clone(&transport),
            Arc::new(MemoryStore::new()),
        );
        r.initialize().await;

        let before = tokio::time::Instant::now();
        let report = r.set_state(true).await;

        assert_eq!(report.pulses.failed, 1);
        assert_eq!(before.elapsed(), Duration::from_secs(2));
        assert!(r.get_state().await);
    }

    #[tokio::test]
    async fn state_survives_a_fresh_instance() {
        let store = Arc::new(MemoryStore::new());

        let first = ToggleReconciler::new(
            config(),
            Arc::new(FakeTransport::with_button(NAME, "toggle")),
            Arc::clone(&store),
        );
        first.set_state(true).await;

        let transport = Arc::new(FakeTransport::with_button(NAME, "toggle"));
        let second = ToggleReconciler::new(config(), Arc::clone(&transport), Arc::clone(&store));
        assert!(second.get_state().await);
        assert_eq!(transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn negative_count_records_state_without_pulses() {
        let transport = Arc::new(FakeTransport::with_button(NAME, "toggle"));
        let r = ToggleReconciler::new(
            config().with_toggle_counts(-1, 1),
            Arc::clone(&transport),
            Arc::new(MemoryStore::new()),
        );

        let report = r.set_state(true).await;
        assert!(report.changed);
        assert_eq!(report.pulses.attempted, 0);
        assert_eq!(transport.sent_count(), 0);
        assert!(r.get_state().await);
    }

    #[tokio::test]
    async fn subscribers_see_new_state() {
        let (r, _, _) = reconciler(FakeTransport::with_button(NAME, "toggle"), MemoryStore::new());
        let mut rx = r.subscribe();

        r.set_state(true).await;
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_caller_does_not_cut_sequence_short() {
        let (r, transport, store) = reconciler(
            FakeTransport::with_button(NAME, "toggle").with_send_latency(Duration::from_millis(100)),
            MemoryStore::new(),
        );
        r.set_state(true).await;

        let abandoned =
            tokio::time::timeout(Duration::from_millis(150), r.set_state(false)).await;
        assert!(abandoned.is_err());
        assert_eq!(transport.sent_count(), 2);

        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(transport.sent_count(), 3);
        assert!(!r.is_transitioning());
        assert!(!r.get_state().await);
        assert_eq!(store.get(NAME), Some(false));
    }

    #[tokio::test]
    async fn save_failure_keeps_requested_state() {
        let (r, transport, store) =
            reconciler(FakeTransport::with_button(NAME, "toggle"), MemoryStore::new());
        r.initialize().await;
        store.set_failing(true);

        let report = r.set_state(true).await;

        assert!(report.changed);
        assert!(report.is_clean());
        assert_eq!(transport.sent_count(), 1);
        assert!(r.get_state().await);
        assert!(!r.is_transitioning());
        assert_eq!(store.get(NAME), None);
    }

    #[tokio::test]
    async fn load_failure_starts_off() {
        let store = MemoryStore::with_value(NAME, true);
        store.set_failing(true);
        let (r, _, _) = reconciler(FakeTransport::with_button(NAME, "toggle"), store);

        assert_eq!(r.initialize().await, Some("sig-1"));
        assert!(!r.get_state().await);

        let report = r.set_state(true).await;
        assert!(report.changed);
        assert!(r.get_state().await);
    }
}
