//! # Declaration Tables
//!
//! Categories and environments are the two kinds of named abbreviation a rule
//! file can declare. Both are plain tables filled while the rule file is read
//! and consulted by the pattern compiler. Nothing here is looked at again once
//! the pipeline is built.
//!
//! - [`CategoryTable`]: named sets of literal alternatives, plus inline
//!   `[...]` nonce categories.
//! - [`EnvironmentTable`]: named literal context fragments.

pub mod category;
pub mod environment;
pub(crate) mod segments;

pub use category::{Category, CategoryTable};
pub use environment::EnvironmentTable;

/// Both declaration tables, as the compiler sees them.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub categories: CategoryTable,
    pub environments: EnvironmentTable,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }
}
