//! Solar declination lookup: one row per day, one column per month, each cell
//! a DMS angle or empty when no observation exists.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::Month;
use tracing::debug;

use crate::angle::Dms;
use crate::calendar::{abbr_of, month_from_abbr};
use crate::config::SolarYieldConfig;
use crate::error::{Result, SolarYieldError};

pub type DeclinationRow = [Option<Dms>; 12];

/// Immutable declination table. Built once and shared by reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeclinationTable {
    rows: Vec<DeclinationRow>,
}

impl DeclinationTable {
    pub fn from_rows(rows: Vec<DeclinationRow>) -> Self {
        DeclinationTable { rows }
    }

    /// Table where every month has the same declination on each of `days` rows.
    pub fn uniform(days: usize, declination: Dms) -> Self {
        DeclinationTable {
            rows: vec![[Some(declination); 12]; days],
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let table = Self::from_reader(File::open(path)?)?;
        debug!(path = %path.display(), days = table.len(), "loaded declination table");
        Ok(table)
    }

    /// Load the table named by `declination_table` in the configuration.
    pub fn from_config(config: &SolarYieldConfig) -> Result<Self> {
        Self::load(&config.declination_table)
    }

    /// Read a CSV whose header names month abbreviations. Columns that are not
    /// months are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<(usize, Month)> = reader
            .headers()?
            .iter()
            .enumerate()
            .filter_map(|(index, header)| month_from_abbr(header).map(|month| (index, month)))
            .collect();

        let mut rows = Vec::new();
        for (row_index, record) in reader.records().enumerate() {
            let record = record?;
            let mut row: DeclinationRow = [None; 12];
            for &(column, month) in columns.iter() {
                let cell = record.get(column).unwrap_or("");
                if cell.is_empty() {
                    continue;
                }
                let dms = Dms::parse(cell).map_err(|e| SolarYieldError::DeclinationTable {
                    row: row_index + 1,
                    column: abbr_of(month).to_string(),
                    source: Box::new(e),
                })?;
                row[month.number_from_month() as usize - 1] = Some(dms);
            }
            rows.push(row);
        }
        Ok(DeclinationTable { rows })
    }

    /// Declination on the given day (1-based row) of the month.
    pub fn get(&self, day: u32, month: Month) -> Option<&Dms> {
        let row = self.rows.get((day as usize).checked_sub(1)?)?;
        row[month.number_from_month() as usize - 1].as_ref()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
