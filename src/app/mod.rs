pub mod checks;
pub mod commands;
pub mod deploy;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod samples;
pub mod steps;
pub mod transformer;

mod context;

pub use context::AppContext;
