//! The widget module shared by all built-in runtimes
//!
//! One module owns the reactive graph holding every widget's state. It also
//! carries the "finished loading" flag: until the module is marked ready,
//! every state access fails with [`RuntimeError::NotLoaded`] instead of
//! waiting.
//!
//! Change callbacks are never invoked while the graph is locked. A signal
//! write marks the affected subscriptions pending (the same way widget
//! effects queue dirty widgets), and the callbacks are dispatched once the
//! write has released the lock. A callback is therefore free to read the
//! widget value it was told about.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashMap;
use tether_core::error::{RuntimeError, RuntimeResult};
use tether_core::reactive::{
    Effect, ReactiveGraph, ReactiveStats, SharedReactiveGraph, Signal, SignalId,
};
use tether_core::value::ChangeCallback;

use crate::runtime::SubscriptionId;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Subscriber {
    signal: SignalId,
    effect: Effect,
    callback: ChangeCallback,
}

/// Shared state store and load flag for widget runtimes
pub struct WidgetModule {
    name: &'static str,
    graph: SharedReactiveGraph,
    ready: AtomicBool,
    /// Subscriptions whose signal changed, waiting for dispatch
    pending: Arc<Mutex<Vec<SubscriptionId>>>,
    subscribers: Mutex<FxHashMap<SubscriptionId, Subscriber>>,
    next_subscription: AtomicU64,
}

impl WidgetModule {
    /// A module that is already loaded
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self::with_ready(name, true))
    }

    /// A module still loading; calls fail until [`WidgetModule::mark_ready`]
    pub fn loading(name: &'static str) -> Arc<Self> {
        Arc::new(Self::with_ready(name, false))
    }

    fn with_ready(name: &'static str, ready: bool) -> Self {
        Self {
            name,
            graph: ReactiveGraph::new_shared(),
            ready: AtomicBool::new(ready),
            pending: Arc::new(Mutex::new(Vec::new())),
            subscribers: Mutex::new(FxHashMap::default()),
            next_subscription: AtomicU64::new(1),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn mark_ready(&self) {
        if !self.ready.swap(true, Ordering::AcqRel) {
            tracing::debug!(module = self.name, "widget module ready");
        }
    }

    pub fn mark_unloaded(&self) {
        self.ready.store(false, Ordering::Release);
    }

    pub fn ensure_ready(&self) -> RuntimeResult<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(RuntimeError::NotLoaded(self.name))
        }
    }

    fn graph(&self) -> MutexGuard<'_, ReactiveGraph> {
        lock(&self.graph)
    }

    // =========================================================================
    // STATE
    // =========================================================================

    pub fn create_signal<T: Send + 'static>(&self, initial: T) -> RuntimeResult<Signal<T>> {
        self.ensure_ready()?;
        Ok(self.graph().create_signal(initial))
    }

    /// Read a signal; a disposed signal means the handle was released
    pub fn read<T: Clone + 'static>(&self, signal: Signal<T>) -> RuntimeResult<T> {
        self.ensure_ready()?;
        self.graph()
            .get_untracked(signal)
            .ok_or(RuntimeError::UnknownHandle)
    }

    /// Write a signal and notify its subscribers
    pub fn write<T: Send + 'static>(&self, signal: Signal<T>, value: T) -> RuntimeResult<()> {
        self.ensure_ready()?;
        let written = self.graph().set(signal, value);
        if !written {
            return Err(RuntimeError::UnknownHandle);
        }
        self.dispatch();
        Ok(())
    }

    pub fn update<T, F>(&self, signal: Signal<T>, f: F) -> RuntimeResult<()>
    where
        T: Clone + Send + 'static,
        F: FnOnce(T) -> T,
    {
        self.ensure_ready()?;
        let written = self.graph().update(signal, f);
        if !written {
            return Err(RuntimeError::UnknownHandle);
        }
        self.dispatch();
        Ok(())
    }

    /// Free a signal together with every subscription watching it
    pub fn dispose<T>(&self, signal: Signal<T>) {
        let orphaned: Vec<Effect> = {
            let mut subscribers = lock(&self.subscribers);
            let ids: Vec<SubscriptionId> = subscribers
                .iter()
                .filter(|(_, sub)| sub.signal == signal.id())
                .map(|(id, _)| *id)
                .collect();
            ids.iter()
                .filter_map(|id| subscribers.remove(id))
                .map(|sub| sub.effect)
                .collect()
        };

        let mut graph = self.graph();
        for effect in orphaned {
            graph.dispose_effect(effect);
        }
        graph.dispose_signal(signal);
    }

    // =========================================================================
    // SUBSCRIPTIONS
    // =========================================================================

    /// Call `callback` after every later write to `signal`
    pub fn watch<T: Clone + 'static>(
        &self,
        signal: Signal<T>,
        callback: ChangeCallback,
    ) -> RuntimeResult<SubscriptionId> {
        self.ensure_ready()?;
        let id = SubscriptionId::from_raw(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        let pending = Arc::clone(&self.pending);

        let effect = {
            let mut graph = self.graph();
            if graph.signal_version(signal.id()).is_none() {
                return Err(RuntimeError::UnknownHandle);
            }
            graph.watch(signal, move |_| lock(&pending).push(id))
        };

        lock(&self.subscribers).insert(
            id,
            Subscriber {
                signal: signal.id(),
                effect,
                callback,
            },
        );
        Ok(id)
    }

    pub fn unwatch(&self, id: SubscriptionId) -> bool {
        let Some(sub) = lock(&self.subscribers).remove(&id) else {
            return false;
        };
        self.graph().dispose_effect(sub.effect);
        true
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }

    pub fn stats(&self) -> ReactiveStats {
        self.graph().stats()
    }

    fn dispatch(&self) {
        loop {
            let ready = std::mem::take(&mut *lock(&self.pending));
            if ready.is_empty() {
                break;
            }
            for id in ready {
                let callback = lock(&self.subscribers)
                    .get(&id)
                    .map(|sub| Arc::clone(&sub.callback));
                if let Some(callback) = callback {
                    callback();
                }
            }
        }
    }
}

impl std::fmt::Debug for WidgetModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetModule")
            .field("name", &self.name)
            .field("ready", &self.is_ready())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
