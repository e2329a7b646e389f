// config lets settings come from a file, the environment, or a string
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How `Equals` treats a queried instant that was given with reduced precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EqualsMode {
    /// A stored period equals "2020" when it lies within that year.
    #[default]
    Containment,
    /// A stored period equals "2020" only when it spans exactly that year.
    Exact,
}

/// Engine settings, passed explicitly to [`crate::restriction::Restriction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub reduced_precision_equals: EqualsMode,
    /// Prepended to every generated placeholder name.
    pub placeholder_prefix: String,
}

impl Settings {
    /// Reads an optional settings file, then `TEMPORA_*` environment variables
    /// on top of it (e.g. `TEMPORA_REDUCED_PRECISION_EQUALS=exact`).
    pub fn load(path: Option<&str>) -> Result<Settings> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        let settings = builder
            .add_source(Environment::with_prefix("TEMPORA"))
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> Result<Settings> {
        let settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }
}
