//! Fine-grained reactive signal graph
//!
//! Widget runtimes keep their state in signals. Effects subscribe to the
//! signals they read and are re-run whenever one of those signals is set:
//! - Signals push invalidation to their subscribing effects
//! - Effects are queued and flushed after each write
//! - [`ReactiveGraph::watch`] creates an effect that stays silent on its
//!   priming run and only reports subsequent changes
//!
//! ```rust
//! use tether_core::reactive::ReactiveGraph;
//! use std::sync::{Arc, Mutex};
//!
//! let mut graph = ReactiveGraph::new();
//! let count = graph.create_signal(0i32);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//! graph.watch(count, move |value: &i32| sink.lock().unwrap().push(*value));
//!
//! graph.set(count, 5);
//! assert_eq!(*seen.lock().unwrap(), vec![5]);
//! ```

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

new_key_type! {
    /// Unique identifier for a signal
    pub struct SignalId;
    /// Unique identifier for an effect
    pub struct EffectId;
}

/// A typed signal handle (cheap to copy)
#[derive(Debug)]
pub struct Signal<T> {
    id: SignalId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Signal<T> {}

impl<T> PartialEq for Signal<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Signal<T> {}

impl<T> Signal<T> {
    /// Get the signal's internal ID
    pub fn id(&self) -> SignalId {
        self.id
    }
}

/// An effect handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    id: EffectId,
}

impl Effect {
    pub fn id(&self) -> EffectId {
        self.id
    }
}

type EffectFn = Box<dyn FnMut(&ReactiveGraph) + Send>;

struct SignalNode {
    /// The signal value (type-erased)
    value: Box<dyn Any + Send>,
    /// Bumped on every write
    version: u64,
    /// Effects to notify on change
    subscribers: SmallVec<[EffectId; 4]>,
}

struct EffectNode {
    /// `None` only while the effect is executing
    run: Option<EffectFn>,
    /// Signals read during the last run
    dependencies: SmallVec<[SignalId; 4]>,
    dirty: Cell<bool>,
}

/// The reactive graph that owns all signals and effects
pub struct ReactiveGraph {
    signals: SlotMap<SignalId, SignalNode>,
    effects: SlotMap<EffectId, EffectNode>,
    pending_effects: RefCell<VecDeque<EffectId>>,
    /// Dependencies collected by the effect currently running
    tracking: RefCell<Option<Vec<SignalId>>>,
    global_version: Cell<u64>,
}

/// Reactive graph shared between a runtime module and its handles
pub type SharedReactiveGraph = Arc<Mutex<ReactiveGraph>>;

impl ReactiveGraph {
    pub fn new() -> Self {
        Self {
            signals: SlotMap::with_key(),
            effects: SlotMap::with_key(),
            pending_effects: RefCell::new(VecDeque::new()),
            tracking: RefCell::new(None),
            global_version: Cell::new(0),
        }
    }

    /// Create a graph wrapped for sharing
    pub fn new_shared() -> SharedReactiveGraph {
        Arc::new(Mutex::new(Self::new()))
    }

    // =========================================================================
    // SIGNALS
    // =========================================================================

    /// Create a new signal with an initial value
    pub fn create_signal<T: Send + 'static>(&mut self, initial: T) -> Signal<T> {
        let id = self.signals.insert(SignalNode {
            value: Box::new(initial),
            version: 0,
            subscribers: SmallVec::new(),
        });
        Signal {
            id,
            _marker: PhantomData,
        }
    }

    /// Get the current value of a signal
    ///
    /// Inside a running effect the signal is recorded as a dependency.
    pub fn get<T: Clone + 'static>(&self, signal: Signal<T>) -> Option<T> {
        if let Some(ref mut deps) = *self.tracking.borrow_mut() {
            if !deps.contains(&signal.id) {
                deps.push(signal.id);
            }
        }
        self.get_untracked(signal)
    }

    /// Get the current value without tracking it as a dependency
    pub fn get_untracked<T: Clone + 'static>(&self, signal: Signal<T>) -> Option<T> {
        self.signals
            .get(signal.id)
            .and_then(|node| node.value.downcast_ref::<T>().cloned())
    }

    /// Set the value of a signal, scheduling its subscribers
    ///
    /// Returns `false` if the signal has been disposed.
    pub fn set<T: Send + 'static>(&mut self, signal: Signal<T>, value: T) -> bool {
        let Some(node) = self.signals.get_mut(signal.id) else {
            return false;
        };
        node.value = Box::new(value);
        node.version += 1;
        self.global_version.set(self.global_version.get() + 1);

        let subscribers = node.subscribers.clone();
        for effect in subscribers {
            self.mark_dirty(effect);
        }

        self.flush_effects();
        true
    }

    /// Update a signal using a function
    pub fn update<T, F>(&mut self, signal: Signal<T>, f: F) -> bool
    where
        T: Clone + Send + 'static,
        F: FnOnce(T) -> T,
    {
        match self.get_untracked(signal) {
            Some(current) => self.set(signal, f(current)),
            None => false,
        }
    }

    /// Get the version of a signal (for change detection)
    pub fn signal_version(&self, id: SignalId) -> Option<u64> {
        self.signals.get(id).map(|n| n.version)
    }

    /// Remove a signal; effects that read it stop being notified
    pub fn dispose_signal<T>(&mut self, signal: Signal<T>) -> bool {
        self.signals.remove(signal.id).is_some()
    }

    // =========================================================================
    // EFFECTS
    // =========================================================================

    /// Create an effect that runs now and again whenever its dependencies change
    pub fn create_effect<F>(&mut self, run: F) -> Effect
    where
        F: FnMut(&ReactiveGraph) + Send + 'static,
    {
        let id = self.effects.insert(EffectNode {
            run: Some(Box::new(run)),
            dependencies: SmallVec::new(),
            dirty: Cell::new(true),
        });

        self.pending_effects.borrow_mut().push_back(id);
        self.flush_effects();

        Effect { id }
    }

    /// Watch a single signal, calling `on_change` after each write
    ///
    /// The priming run only registers the dependency; `on_change` never
    /// sees the value the signal held when the watch was created.
    pub fn watch<T, F>(&mut self, signal: Signal<T>, mut on_change: F) -> Effect
    where
        T: Clone + 'static,
        F: FnMut(&T) + Send + 'static,
    {
        let mut primed = false;
        self.create_effect(move |graph| {
            let Some(value) = graph.get(signal) else {
                return;
            };
            if primed {
                on_change(&value);
            } else {
                primed = true;
            }
        })
    }

    /// Dispose of an effect, removing it from the graph
    pub fn dispose_effect(&mut self, effect: Effect) -> bool {
        let Some(node) = self.effects.remove(effect.id) else {
            return false;
        };
        for dep_id in node.dependencies {
            if let Some(sig) = self.signals.get_mut(dep_id) {
                sig.subscribers.retain(|s| *s != effect.id);
            }
        }
        true
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    fn mark_dirty(&mut self, effect: EffectId) {
        if let Some(node) = self.effects.get(effect) {
            if !node.dirty.get() {
                node.dirty.set(true);
                self.pending_effects.borrow_mut().push_back(effect);
            }
        }
    }

    fn flush_effects(&mut self) {
        loop {
            let next = self.pending_effects.borrow_mut().pop_front();
            match next {
                Some(effect) => self.run_effect(effect),
                None => break,
            }
        }
    }

    fn run_effect(&mut self, effect_id: EffectId) {
        // Take the closure out so the effect can observe the graph immutably
        let run = match self.effects.get_mut(effect_id) {
            Some(node) if node.dirty.get() => {
                node.dirty.set(false);
                node.run.take()
            }
            _ => None,
        };
        let Some(mut run) = run else {
            return;
        };

        self.tracking.replace(Some(Vec::new()));
        run(&*self);
        let deps = self.tracking.take().unwrap_or_default();

        let Some(node) = self.effects.get_mut(effect_id) else {
            return;
        };
        node.run = Some(run);

        for &dep_id in &node.dependencies {
            if let Some(sig) = self.signals.get_mut(dep_id) {
                sig.subscribers.retain(|s| *s != effect_id);
            }
        }
        for &dep_id in &deps {
            if let Some(sig) = self.signals.get_mut(dep_id) {
                if !sig.subscribers.contains(&effect_id) {
                    sig.subscribers.push(effect_id);
                }
            }
        }
        node.dependencies = deps.into_iter().collect();
    }

    /// Get statistics about the reactive graph
    pub fn stats(&self) -> ReactiveStats {
        ReactiveStats {
            signal_count: self.signals.len(),
            effect_count: self.effects.len(),
            pending_effects: self.pending_effects.borrow().len(),
            global_version: self.global_version.get(),
        }
    }
}

impl Default for ReactiveGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the reactive graph
#[derive(Debug, Clone)]
pub struct ReactiveStats {
    pub signal_count: usize,
    pub effect_count: usize,
    pub pending_effects: usize,
    pub global_version: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_create_get_set() {
        let mut graph = ReactiveGraph::new();

        let count = graph.create_signal(0i32);
        assert_eq!(graph.get(count), Some(0));

        assert!(graph.set(count, 42));
        assert_eq!(graph.get(count), Some(42));
        assert_eq!(graph.signal_version(count.id()), Some(1));
    }

    #[test]
    fn test_signal_update() {
        let mut graph = ReactiveGraph::new();

        let items = graph.create_signal(vec!["a".to_string()]);
        graph.update(items, |mut v| {
            v.push("b".into());
            v
        });
        assert_eq!(graph.get(items).map(|v| v.len()), Some(2));
    }

    #[test]
    fn test_effect_runs_on_change() {
        let mut graph = ReactiveGraph::new();
        let runs = Arc::new(Mutex::new(Vec::new()));

        let count = graph.create_signal(0i32);
        let runs_clone = runs.clone();
        let _effect = graph.create_effect(move |g| {
            runs_clone.lock().unwrap().push(g.get(count).unwrap_or(0));
        });

        assert_eq!(*runs.lock().unwrap(), vec![0]);

        graph.set(count, 1);
        graph.set(count, 2);
        assert_eq!(*runs.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_watch_skips_priming_run() {
        let mut graph = ReactiveGraph::new();
        let calls = Arc::new(Mutex::new(0));

        let text = graph.create_signal(String::from("hello"));
        let calls_clone = calls.clone();
        graph.watch(text, move |_: &String| *calls_clone.lock().unwrap() += 1);

        assert_eq!(*calls.lock().unwrap(), 0);

        graph.set(text, "world".into());
        assert_eq!(*calls.lock().unwrap(), 1);

        // Writing an identical value still counts as a change
        graph.set(text, "world".into());
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[test]
    fn test_each_write_flushes() {
        let mut graph = ReactiveGraph::new();
        let runs = Arc::new(Mutex::new(0));

        let a = graph.create_signal(1i32);
        let b = graph.create_signal(2i32);
        let runs_clone = runs.clone();
        let _effect = graph.create_effect(move |g| {
            let _a = g.get(a);
            let _b = g.get(b);
            *runs_clone.lock().unwrap() += 1;
        });
        assert_eq!(*runs.lock().unwrap(), 1);

        graph.set(a, 100);
        assert_eq!(*runs.lock().unwrap(), 2);
        graph.set(b, 200);
        assert_eq!(*runs.lock().unwrap(), 3);
    }

    #[test]
    fn test_dispose_effect() {
        let mut graph = ReactiveGraph::new();
        let calls = Arc::new(Mutex::new(0));

        let count = graph.create_signal(0i32);
        let calls_clone = calls.clone();
        let effect = graph.watch(count, move |_: &i32| *calls_clone.lock().unwrap() += 1);

        graph.set(count, 1);
        assert_eq!(*calls.lock().unwrap(), 1);

        assert!(graph.dispose_effect(effect));
        assert!(!graph.dispose_effect(effect));

        graph.set(count, 2);
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_dispose_signal() {
        let mut graph = ReactiveGraph::new();

        let count = graph.create_signal(3.5f64);
        assert!(graph.dispose_signal(count));
        assert_eq!(graph.get(count), None);
        assert!(!graph.set(count, 1.0));
    }

    #[test]
    fn test_stats() {
        let mut graph = ReactiveGraph::new();

        let s1 = graph.create_signal(1);
        let _s2 = graph.create_signal(2);
        graph.watch(s1, |_: &i32| {});

        let stats = graph.stats();
        assert_eq!(stats.signal_count, 2);
        assert_eq!(stats.effect_count, 1);
        assert_eq!(stats.pending_effects, 0);
    }
}
