//! Dialogue Explorer: Personality/Strategy Filtering + Navigation Core
//!
//! A Rust/WASM implementation of the dialogue dataset explorer.
//!
//! # Architecture
//!
//! ## Dataset Store
//! - `config.rs` - Data source configuration and task variants
//! - `dataset/record.rs` - DialogueRecord wire format (image and story variants)
//! - `dataset/strategy.rs` - Strategy annotation splitting + label normalization
//! - `dataset/store.rs` - Collection, MoralsTable, load tickets (stale-load discard)
//! - `dataset/fetch.rs` - Browser `fetch` loaders
//!
//! ## Filter & Navigation Engine
//! - `navigator/filter.rs` - Trait predicates + required strategy set
//! - `navigator/engine.rs` - Navigator: search, random pick, step, seek
//! - `view.rs` - Render payloads handed to the presentation layer
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { DialogueExplorer } from 'dialogue-explorer';
//!
//! await init();
//!
//! const explorer = new DialogueExplorer();
//! explorer.subscribe(snapshot => render(snapshot));
//!
//! await explorer.loadMorals();
//! await explorer.selectTask('story');
//!
//! explorer.setTrait('assertive', 'high');
//! explorer.toggleStrategy('Empathy', true);
//! const result = explorer.search();   // snapshot, or empty state on no match
//! explorer.next();
//! explorer.seekInput('3');
//! ```

pub mod config;
pub mod dataset;
pub mod navigator;
pub mod view;
pub mod wasm;

pub use config::*;
pub use dataset::*;
pub use navigator::*;
pub use view::*;
pub use wasm::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("dialogue-explorer v{}", env!("CARGO_PKG_VERSION"))
}
