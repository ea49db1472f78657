use crate::error::Result;
use crate::fiscal::{FiscalYearEnd, DEFAULT_FISCAL_YEAR_END};
use log::debug;

/// Environment variable overriding the default fiscal year end.
pub const FISCAL_YEAR_END_ENV: &str = "FISCAL_YEAR_END";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrimConfig {
    pub fiscal_year_end: FiscalYearEnd,
}

impl TrimConfig {
    pub fn new(fiscal_year_end: FiscalYearEnd) -> Self {
        Self { fiscal_year_end }
    }

    /// Precedence: the input document's value, then the environment, then `0930`.
    /// Blank values count as unset; anything else must be a valid `MMDD`.
    pub fn resolve(document_value: Option<&str>, env_value: Option<&str>) -> Result<Self> {
        let document_value = document_value.map(str::trim).filter(|v| !v.is_empty());
        let env_value = env_value.map(str::trim).filter(|v| !v.is_empty());

        let (raw, origin) = match (document_value, env_value) {
            (Some(v), _) => (v, "input document"),
            (None, Some(v)) => (v, FISCAL_YEAR_END_ENV),
            (None, None) => (DEFAULT_FISCAL_YEAR_END, "default"),
        };

        let fiscal_year_end = raw.parse()?;
        debug!("Using fiscal year end {} ({})", fiscal_year_end, origin);
        Ok(Self { fiscal_year_end })
    }

    /// Resolves against the `FISCAL_YEAR_END` environment variable.
    pub fn from_env(document_value: Option<&str>) -> Result<Self> {
        let env_value = std::env::var(FISCAL_YEAR_END_ENV).ok();
        Self::resolve(document_value, env_value.as_deref())
    }
}
