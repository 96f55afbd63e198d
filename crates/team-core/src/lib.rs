pub mod applicability;
pub mod chain;
pub mod config;
pub mod contains;
pub mod error;
pub mod event;
pub mod freshness;
pub mod gates;
pub mod gitignore;
pub mod io;
pub mod markdown;
pub mod paths;
pub mod runner;
pub mod settings;
pub mod verdict;

pub use error::{Result, TeamError};
pub use verdict::{Decision, HookKind, Verdict};
