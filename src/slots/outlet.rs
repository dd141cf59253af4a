//! Outlet - Reactive mounting of slot fragments.
//!
//! - [`show`] - mount a fragment while a condition holds
//! - [`each`] - keyed list mounting with fine-grained updates
//! - [`mount_slots`] - the root outlet over a [`SlotRegistry`]
//!
//! All three follow the same EffectScope pattern:
//! 1. Create an EffectScope that owns the effect
//! 2. Run the effect inside `scope.run()`
//! 3. Register teardown with `on_scope_dispose()`
//! 4. Return `Box::new(move || scope.stop())` as the Cleanup
//!
//! Fragments are mounted and unmounted with no `RefCell` borrow held, so a
//! fragment may itself touch the registry. Each fragment is mounted as its own
//! reactive root, so the outlet effect re-running never tears down what a
//! fragment built.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::rc::{Rc, Weak};

use spark_signals::{
    effect, effect_scope, on_scope_dispose, signal, with_context, AnyReaction, Signal,
};
use tracing::{trace, warn};

use super::registry::{SlotEntry, SlotRegistry};
use crate::types::{Cleanup, Getter, SlotId};

// =============================================================================
// Fragment Roots
// =============================================================================

/// Clears the active reaction and effect for its lifetime.
///
/// Unlike `untrack`, effects created meanwhile get no parent effect, and
/// effects that run on creation still track their own reads.
struct RootGuard {
    reaction: Option<Weak<dyn AnyReaction>>,
    effect: Option<Weak<dyn AnyReaction>>,
}

impl RootGuard {
    fn enter() -> Self {
        with_context(|ctx| Self {
            reaction: ctx.set_active_reaction(None),
            effect: ctx.set_active_effect(None),
        })
    }
}

impl Drop for RootGuard {
    fn drop(&mut self) {
        let reaction = self.reaction.take();
        let effect = self.effect.take();
        with_context(|ctx| {
            ctx.set_active_reaction(reaction);
            ctx.set_active_effect(effect);
        });
    }
}

/// Run `render` as an independent reactive root.
///
/// Its reads subscribe nothing outside it, and the effects it creates belong
/// to a detached scope. The returned cleanup runs the fragment's own cleanup,
/// then stops that scope.
fn mount_root(render: impl FnOnce() -> Cleanup) -> Cleanup {
    let scope = effect_scope(true);
    let fragment = {
        let _root = RootGuard::enter();
        scope.run(render)
    };

    match fragment {
        Some(fragment) => Box::new(move || {
            fragment();
            scope.stop();
        }),
        None => Box::new(|| {}),
    }
}

/// Mount `render_fn` while `condition` is true.
///
/// The fragment is created when the condition turns true and cleaned up when
/// it turns false. Re-reading the same value does not remount.
pub fn show(
    condition: impl Fn() -> bool + 'static,
    render_fn: impl Fn() -> Cleanup + 'static,
) -> Cleanup {
    let current: Rc<RefCell<Option<Cleanup>>> = Rc::new(RefCell::new(None));
    let was_true: Rc<Cell<Option<bool>>> = Rc::new(Cell::new(None));

    let scope = effect_scope(false);

    let current_for_update = current.clone();
    let current_for_dispose = current;

    scope.run(move || {
        let _effect_cleanup = effect(move || {
            let now = condition();
            if was_true.get() == Some(now) {
                return;
            }
            was_true.set(Some(now));

            let previous = current_for_update.borrow_mut().take();
            if let Some(previous) = previous {
                previous();
            }

            if now {
                let cleanup = mount_root(&render_fn);
                *current_for_update.borrow_mut() = Some(cleanup);
            }
        });

        on_scope_dispose(move || {
            let cleanup = current_for_dispose.borrow_mut().take();
            if let Some(cleanup) = cleanup {
                cleanup();
            }
        });
    });

    Box::new(move || {
        scope.stop();
    })
}

// =============================================================================
// each() - Keyed list mounting
// =============================================================================

/// Mount one fragment per item, tracked by key.
///
/// - New keys: create an item signal and mount
/// - Existing keys: update the item signal (NO remount)
/// - Removed keys: run that fragment's cleanup
///
/// Duplicate keys are logged and skipped.
pub fn each<T, K, RenderF>(
    items_getter: impl Fn() -> Vec<T> + 'static,
    render_fn: RenderF,
    key_fn: impl Fn(&T) -> K + 'static,
) -> Cleanup
where
    T: Clone + PartialEq + std::fmt::Debug + 'static,
    K: Clone + Eq + Hash + std::fmt::Debug + 'static,
    RenderF: Fn(Getter<T>, K) -> Cleanup + 'static,
{
    let scope = effect_scope(false);

    let cleanups: Rc<RefCell<HashMap<K, Cleanup>>> = Rc::new(RefCell::new(HashMap::new()));
    let item_signals: Rc<RefCell<HashMap<K, Signal<T>>>> = Rc::new(RefCell::new(HashMap::new()));

    let cleanups_effect = cleanups.clone();
    let item_signals_effect = item_signals.clone();
    let cleanups_dispose = cleanups;
    let item_signals_dispose = item_signals;

    scope.run(move || {
        let _effect_cleanup = effect(move || {
            let items = items_getter();
            let mut current_keys = HashSet::new();

            for item in items.iter() {
                let key = key_fn(item);
                if !current_keys.insert(key.clone()) {
                    warn!(key = ?key, "duplicate key in each(); skipping");
                    continue;
                }

                let existing = item_signals_effect.borrow().get(&key).cloned();
                match existing {
                    Some(sig) => {
                        sig.set(item.clone());
                    }
                    None => {
                        let item_signal = signal(item.clone());
                        item_signals_effect
                            .borrow_mut()
                            .insert(key.clone(), item_signal.clone());

                        let getter: Getter<T> = Rc::new(move || item_signal.get());
                        let cleanup = mount_root(|| render_fn(getter, key.clone()));
                        cleanups_effect.borrow_mut().insert(key, cleanup);
                    }
                }
            }

            let removed: Vec<(K, Cleanup)> = {
                let mut cleanup_map = cleanups_effect.borrow_mut();
                let stale: Vec<K> = cleanup_map
                    .keys()
                    .filter(|k| !current_keys.contains(*k))
                    .cloned()
                    .collect();
                stale
                    .into_iter()
                    .filter_map(|k| cleanup_map.remove(&k).map(|c| (k, c)))
                    .collect()
            };
            for (key, cleanup) in removed {
                item_signals_effect.borrow_mut().remove(&key);
                cleanup();
            }
        });

        on_scope_dispose(move || {
            let drained: Vec<Cleanup> = cleanups_dispose
                .borrow_mut()
                .drain()
                .map(|(_, c)| c)
                .collect();
            for cleanup in drained {
                cleanup();
            }
            item_signals_dispose.borrow_mut().clear();
        });
    });

    Box::new(move || {
        scope.stop();
    })
}

// =============================================================================
// Root Outlet
// =============================================================================

/// Mount every registry entry, keyed by slot identity.
///
/// Entries appear and disappear as factory adapters register and unregister;
/// an entry that stays registered is never remounted.
pub fn mount_slots(registry: &SlotRegistry) -> Cleanup {
    let registry = registry.clone();
    trace!(entries = registry.len(), "slot outlet mounted");
    each(
        move || registry.entries(),
        |entry: Getter<SlotEntry>, _id: SlotId| entry().render(),
        |entry: &SlotEntry| entry.id(),
    )
}
