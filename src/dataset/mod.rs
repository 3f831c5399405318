pub mod record;
pub mod strategy;
pub mod store;
pub mod fetch;

pub use record::*;
pub use strategy::*;
pub use store::*;
pub use fetch::*;
