//! # Fiscal Frame Builder
//!
//! Turns a raw inventory of standardized financial-statement facts (concept-tagged
//! values keyed by reporting frame) into a clean, fiscal-quarter-aligned series of
//! income statement, balance sheet and cash flow records.
//!
//! ## Core Concepts
//!
//! - **Instant frames**: point-in-time snapshots (`CY2024Q1I`) that feed the balance sheet
//! - **Duration frames**: period figures (`CY2024Q1`, `CY2024`) that feed the income and cash flow statements
//! - **Fiscal frames**: canonical labels (`FY2024`, `FY2024Q3`) derived from period dates and the fiscal year end
//! - **Derived deltas**: quarters reconstructed by subtracting cumulative figures
//!
//! ## Pipeline
//!
//! 1. Resolve concept aliases into canonical statement fields
//! 2. Merge instant and duration variants of each base frame
//! 3. Derive missing fourth quarters (`annual - nine months`)
//! 4. Backfill interim quarters reported only year-to-date
//! 5. Consolidate everything into one record per fiscal frame
//!
//! ## Example
//!
//! ```rust,ignore
//! use fiscal_frame_builder::*;
//!
//! let inventory = parse_inventory(r#"{
//!     "ticker": "ACME",
//!     "fiscalYearEnd": "1231",
//!     "factsIndex": [
//!         { "frame": "CY2024", "start": "2024-01-01", "end": "2024-12-31", "tags": { "Revenues": 400 } },
//!         { "frame": "CY2024Q3YTD", "start": "2024-01-01", "end": "2024-09-30", "tags": { "Revenues": 280 } }
//!     ]
//! }"#).unwrap();
//!
//! let output = process_facts_inventory(&inventory).unwrap();
//! let q4 = output.frame("FY2024Q4").unwrap();
//! assert_eq!(q4.pl.as_ref().unwrap().revenue, Some(120.0));
//! ```

pub mod concepts;
pub mod config;
pub mod consolidate;
pub mod derive;
pub mod error;
pub mod fiscal;
pub mod frame;
pub mod io;
pub mod merger;
pub mod schema;
pub mod statements;
pub mod utils;

pub use concepts::resolve_concept;
pub use config::{TrimConfig, FISCAL_YEAR_END_ENV};
pub use consolidate::consolidate;
pub use derive::{backfill_year_to_date, derive_fourth_quarters};
pub use error::{FiscalFrameError, Result};
pub use fiscal::{base_frame_id, classify, FiscalInfo, FiscalYearEnd, FrameKind};
pub use frame::{FrameSource, TrimmedFrame};
pub use io::{
    output_path_for, parse_inventory, read_inventory, validate_inventory, write_output,
};
pub use merger::{merge_base_frames, order_by_recency};
pub use schema::*;
pub use statements::{BalanceSheet, CashFlow, IncomeStatement, StatementSection};

use log::{debug, info};
use std::path::{Path, PathBuf};

pub struct FiscalFrameProcessor;

impl FiscalFrameProcessor {
    pub fn process(inventory: &FactsInventory, config: &TrimConfig) -> Result<TrimmedOutput> {
        validate_inventory(inventory)?;

        info!(
            "Trimming {} raw frames for {} (fiscal year end {})",
            inventory.facts_index.len(),
            inventory.ticker,
            config.fiscal_year_end
        );

        let fiscal_year_end = &config.fiscal_year_end;
        let ordered = order_by_recency(&inventory.facts_index);
        let merged = merge_base_frames(ordered, fiscal_year_end);

        let mut derived = derive_fourth_quarters(&merged, fiscal_year_end);
        let fourth_quarters = derived.len();
        derived.extend(backfill_year_to_date(&merged, fiscal_year_end));
        debug!(
            "Derived {} fourth quarters and {} year-to-date backfills",
            fourth_quarters,
            derived.len() - fourth_quarters
        );

        let frames = consolidate(&merged, &derived);

        info!(
            "Consolidated {} fiscal frames for {}",
            frames.len(),
            inventory.ticker
        );

        Ok(TrimmedOutput {
            ticker: inventory.ticker.clone(),
            frames,
        })
    }

    /// Reads `input`, trims it and writes `<input-basename>-trimmed.json` beside it.
    /// Returns the output path.
    pub fn process_file(input: &Path) -> Result<PathBuf> {
        let inventory = read_inventory(input)?;
        let config = TrimConfig::from_env(inventory.fiscal_year_end.as_deref())?;
        let output = Self::process(&inventory, &config)?;

        let output_path = output_path_for(input);
        write_output(&output_path, &output)?;
        info!("Wrote {}", output_path.display());

        Ok(output_path)
    }
}

/// Trims an inventory, resolving the fiscal year end from the document, then the
/// `FISCAL_YEAR_END` environment variable, then the `0930` default.
pub fn process_facts_inventory(inventory: &FactsInventory) -> Result<TrimmedOutput> {
    let config = TrimConfig::from_env(inventory.fiscal_year_end.as_deref())?;
    FiscalFrameProcessor::process(inventory, &config)
}

pub fn process_with_config(
    inventory: &FactsInventory,
    config: &TrimConfig,
) -> Result<TrimmedOutput> {
    FiscalFrameProcessor::process(inventory, config)
}
