pub mod conform;
pub mod diagnostics;
pub mod env;
pub mod field;
pub mod mapping;
pub mod run;
pub mod state;
pub mod stats;
pub mod types;
pub mod validate;
