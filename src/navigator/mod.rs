pub mod engine;
pub mod filter;

pub use engine::*;
pub use filter::*;

#[cfg(test)]
mod tests;
