//! CLI module graph.

pub mod banner;
pub mod check;
pub mod command;
pub mod diagnostic;
pub mod movers;
pub mod output;
pub mod paths;
pub mod report;
pub mod run;
