//! Compiler settings, read with the `config` crate from built-in defaults, an
//! optional `domaincover.toml` and `DOMAINCOVER_*` environment variables.

use std::path::Path;

use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_MAX_DECISION_CELLS: usize = 65_536;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Upper bound on the number of attribute value combinations the
    /// simplifier enumerates when deciding a predicate.
    pub max_decision_cells: usize,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_decision_cells: DEFAULT_MAX_DECISION_CELLS,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl Settings {
    /// Loads `domaincover.toml` from the working directory if there is one.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Loads the given file, which then has to exist.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let builder = Config::builder()
            .set_default("max_decision_cells", DEFAULT_MAX_DECISION_CELLS as i64)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?;
        let builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("domaincover").required(false)),
        };
        let settings = builder
            .add_source(Environment::with_prefix("DOMAINCOVER"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
