//! Infrastructure configuration modules.

pub mod journal;
pub mod logging;
pub mod scoring;
pub mod settings;
pub mod telegram;
