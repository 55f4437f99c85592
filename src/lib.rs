pub mod completion;
pub mod error;
pub mod generation;
mod macros;
pub mod time;
pub mod types;
