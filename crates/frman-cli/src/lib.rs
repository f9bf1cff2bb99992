//! Pipeline driver and reporting for the `frman` command.

pub mod export;
pub mod logging;
pub mod pipeline;
pub mod stores;
pub mod summary;
pub mod types;
