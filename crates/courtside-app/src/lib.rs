// Library root: data access, configuration, and the analysis pipeline that
// feeds the courtside-core engine.

pub mod config;
pub mod dataset;
pub mod pipeline;
pub mod provider;
