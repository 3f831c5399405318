//! DialogueExplorer: JS-facing facade
//!
//! Owns the DatasetStore and the Navigator behind one `Rc<RefCell<_>>` so
//! async loads can commit their result when they resolve. Every operation
//! returns the new `ExplorerSnapshot` and publishes it to the subscriber.

use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::config::{ExplorerConfig, TaskVariant};
use crate::dataset::{self, strategy_slug, DatasetStore, MoralsTable, TraitLevel};
use crate::navigator::{Navigator, SearchOutcome};
use crate::view::ExplorerSnapshot;

struct ExplorerState {
    config: ExplorerConfig,
    store: DatasetStore,
    navigator: Navigator,
    listener: Option<js_sys::Function>,
}

/// Plain JS objects rather than `Map`s for the render layer
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Serialize the current snapshot and hand it to the subscriber.
/// The borrow is released before the callback runs so it may call back in.
fn publish(state: &RefCell<ExplorerState>) -> Result<JsValue, JsValue> {
    let (value, listener) = {
        let state = state.borrow();
        let snapshot = ExplorerSnapshot::capture(&state.store, &state.navigator);
        (to_js(&snapshot)?, state.listener.clone())
    };
    if let Some(listener) = listener {
        listener.call1(&JsValue::NULL, &value)?;
    }
    Ok(value)
}

#[derive(Serialize)]
struct SeekReply {
    accepted: bool,
    requested: Option<i64>,
    /// Position to (re)display
    current_position: Option<usize>,
}

#[wasm_bindgen]
pub struct DialogueExplorer {
    state: Rc<RefCell<ExplorerState>>,
}

#[wasm_bindgen]
impl DialogueExplorer {
    /// `config` is an optional `{ image_source, story_source, morals_source }` object
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<DialogueExplorer, JsValue> {
        let config: ExplorerConfig = if config.is_undefined() || config.is_null() {
            ExplorerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?
        };
        let store = DatasetStore::new();
        let navigator = Navigator::new(store.collection());
        Ok(DialogueExplorer {
            state: Rc::new(RefCell::new(ExplorerState {
                config,
                store,
                navigator,
                listener: None,
            })),
        })
    }

    /// Receive every new snapshot
    #[wasm_bindgen]
    pub fn subscribe(&self, callback: js_sys::Function) {
        self.state.borrow_mut().listener = Some(callback);
    }

    #[wasm_bindgen]
    pub fn unsubscribe(&self) {
        self.state.borrow_mut().listener = None;
    }

    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let state = self.state.borrow();
        to_js(&ExplorerSnapshot::capture(&state.store, &state.navigator))
    }

    /// Sorted strategy labels of the current collection
    #[wasm_bindgen]
    pub fn vocabulary(&self) -> Vec<String> {
        self.state.borrow().navigator.collection().sorted_vocabulary()
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Switch task variant: clears all filter and navigation state, then loads.
    /// Resolves with the new snapshot, or `null` if a later switch superseded it.
    #[wasm_bindgen(js_name = selectTask)]
    pub fn select_task(&self, task: &str) -> Result<js_sys::Promise, JsValue> {
        let variant: TaskVariant = task.parse().map_err(js_error)?;

        let (ticket, config) = {
            let mut state = self.state.borrow_mut();
            let ticket = state.store.begin_load(variant);
            let empty = state.store.collection();
            state.navigator.replace_collection(empty);
            (ticket, state.config.clone())
        };
        // The load must start even if the subscriber throws
        if let Err(e) = publish(&self.state) {
            web_sys::console::error_1(&format!("[DialogueExplorer] Subscriber failed: {:?}", e).into());
        }

        web_sys::console::log_1(&format!(
            "[DialogueExplorer] Loading data from {} for task: {}",
            config.source_for(variant),
            variant
        ).into());

        let state = Rc::clone(&self.state);
        Ok(future_to_promise(async move {
            let started = instant::Instant::now();
            let outcome = dataset::load(&config, ticket.variant()).await;
            let installed = state.borrow_mut().store.complete_load(ticket, outcome);

            match installed {
                None => {
                    web_sys::console::log_1(&format!(
                        "[DialogueExplorer] Discarding superseded {} load",
                        variant
                    ).into());
                    Ok(JsValue::NULL)
                }
                Some(Ok(collection)) => {
                    web_sys::console::log_1(&format!(
                        "[DialogueExplorer] Loaded {} dialogues with {} unique strategies ({} ms)",
                        collection.len(),
                        collection.vocabulary().len(),
                        started.elapsed().as_millis()
                    ).into());
                    {
                        let mut state = state.borrow_mut();
                        state.navigator.replace_collection(collection);
                        if state.navigator.pick_random().is_none() {
                            web_sys::console::error_1(&"[DialogueExplorer] No data found".into());
                        }
                    }
                    publish(&state)
                }
                Some(Err(e)) => {
                    web_sys::console::error_1(&format!("[DialogueExplorer] Error loading data: {}", e).into());
                    {
                        let mut state = state.borrow_mut();
                        let empty = state.store.collection();
                        state.navigator.replace_collection(empty);
                    }
                    publish(&state)?;
                    Err(js_error(e))
                }
            }
        }))
    }

    /// Load the story morals. Never rejects: a failed load leaves the table empty.
    #[wasm_bindgen(js_name = loadMorals)]
    pub fn load_morals(&self) -> js_sys::Promise {
        let config = self.state.borrow().config.clone();
        let state = Rc::clone(&self.state);

        future_to_promise(async move {
            let morals = match dataset::load_morals(&config).await {
                Ok(morals) => {
                    web_sys::console::log_1(&format!(
                        "[DialogueExplorer] Loaded {} morals",
                        morals.len()
                    ).into());
                    morals
                }
                Err(e) => {
                    web_sys::console::warn_1(&format!("[DialogueExplorer] Error loading morals: {}", e).into());
                    MoralsTable::default()
                }
            };
            state.borrow_mut().store.set_morals(morals);
            publish(&state)
        })
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// `level` is "high", "low", or null/undefined to lift the constraint
    #[wasm_bindgen(js_name = setTrait)]
    pub fn set_trait(&self, trait_name: &str, level: Option<String>) -> Result<JsValue, JsValue> {
        let level = level
            .map(|l| l.parse::<TraitLevel>())
            .transpose()
            .map_err(js_error)?;
        self.state.borrow_mut().navigator.set_trait_filter(trait_name, level);
        publish(&self.state)
    }

    #[wasm_bindgen(js_name = toggleTrait)]
    pub fn toggle_trait(&self, trait_name: &str, level: &str) -> Result<JsValue, JsValue> {
        let level: TraitLevel = level.parse().map_err(js_error)?;
        self.state.borrow_mut().navigator.toggle_trait_filter(trait_name, level);
        publish(&self.state)
    }

    #[wasm_bindgen(js_name = toggleStrategy)]
    pub fn toggle_strategy(&self, label: &str, included: bool) -> Result<JsValue, JsValue> {
        self.state.borrow_mut().navigator.toggle_strategy_filter(label, included);
        publish(&self.state)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    #[wasm_bindgen]
    pub fn search(&self) -> Result<JsValue, JsValue> {
        {
            let mut state = self.state.borrow_mut();
            match state.navigator.search() {
                SearchOutcome::Match(selection) => {
                    web_sys::console::log_1(&format!(
                        "[DialogueExplorer] Found {} matching dialogues",
                        selection.total
                    ).into());
                }
                SearchOutcome::NoMatch => {
                    web_sys::console::log_1(&"[DialogueExplorer] No matching dialogs for the selected filters".into());
                }
            }
        }
        publish(&self.state)
    }

    #[wasm_bindgen(js_name = pickRandom)]
    pub fn pick_random(&self) -> Result<JsValue, JsValue> {
        self.state.borrow_mut().navigator.pick_random();
        publish(&self.state)
    }

    #[wasm_bindgen]
    pub fn reset(&self) -> Result<JsValue, JsValue> {
        if self.state.borrow_mut().navigator.reset().is_none() {
            web_sys::console::log_1(&"[DialogueExplorer] No data available yet".into());
        }
        publish(&self.state)
    }

    #[wasm_bindgen]
    pub fn previous(&self) -> Result<JsValue, JsValue> {
        self.state.borrow_mut().navigator.step_previous();
        publish(&self.state)
    }

    #[wasm_bindgen]
    pub fn next(&self) -> Result<JsValue, JsValue> {
        self.state.borrow_mut().navigator.step_next();
        publish(&self.state)
    }

    /// Jump to a 1-based position in the active space.
    /// Returns `{ accepted, requested, current_position }`.
    #[wasm_bindgen]
    pub fn seek(&self, position: i32) -> Result<JsValue, JsValue> {
        self.seek_to(Some(i64::from(position)))
    }

    /// Seek from raw text input; non-numeric text is rejected like an out-of-range number
    #[wasm_bindgen(js_name = seekInput)]
    pub fn seek_input(&self, text: &str) -> Result<JsValue, JsValue> {
        self.seek_to(text.trim().parse::<i64>().ok())
    }
}

impl DialogueExplorer {
    fn seek_to(&self, requested: Option<i64>) -> Result<JsValue, JsValue> {
        let reply = {
            let mut state = self.state.borrow_mut();
            let current_position = state.navigator.active_index().map(|index| index + 1);
            match requested {
                Some(position) => match state.navigator.seek(position) {
                    Ok(selection) => SeekReply {
                        accepted: true,
                        requested,
                        current_position: Some(selection.position),
                    },
                    Err(invalid) => SeekReply {
                        accepted: false,
                        requested,
                        current_position: invalid.current_position,
                    },
                },
                None => SeekReply {
                    accepted: false,
                    requested,
                    current_position,
                },
            }
        };
        if reply.accepted {
            publish(&self.state)?;
        }
        to_js(&reply)
    }
}

/// DOM id for a strategy checkbox
#[wasm_bindgen(js_name = strategySlug)]
pub fn js_strategy_slug(label: &str) -> String {
    strategy_slug(label)
}
