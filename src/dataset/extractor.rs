use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::calendar::month_name;
use crate::dataset::grid::{GridDataset, GridReader};
use crate::dataset::locator::GridFile;
use crate::error::{Result, SolarYieldError};
use crate::tools::{mean_of_present, nearest_index};

/// Measurement taken from one monthly file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExtractionRecord {
    /// Zero-based position of the file in the input sequence.
    pub order: usize,
    /// Month name derived from `order`, not from the file itself.
    pub month: String,
    #[serde(rename = "sdlr")]
    pub value: Option<f64>,
}

/// Payload describing the irradiance series of a year at one location.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SdlrReport {
    pub year: i32,
    pub sdlr: Vec<ExtractionRecord>,
}

/// Nearest-neighbor extraction of a single grid cell from a sequence of
/// monthly files.
///
/// The n-th file is labeled as the n-th month of the year, so files must be
/// passed in calendar order.
#[derive(Clone, Debug)]
pub struct NearestPointExtractor<R> {
    reader: R,
    extension: String,
    fill_missing: bool,
}

impl<R: GridReader> NearestPointExtractor<R> {
    pub fn new(reader: R, extension: impl Into<String>) -> Self {
        NearestPointExtractor {
            reader,
            extension: extension.into().trim_start_matches('.').to_string(),
            fill_missing: false,
        }
    }

    /// Replace missing values with the mean of the rest of the batch.
    pub fn with_fill_missing(mut self, fill_missing: bool) -> Self {
        self.fill_missing = fill_missing;
        self
    }

    pub fn extract<P: AsRef<Path>>(
        &self,
        files: &[P],
        lat: f64,
        lon: f64,
    ) -> Result<Vec<ExtractionRecord>> {
        self.check_extensions(files)?;

        let mut records = files
            .iter()
            .enumerate()
            .map(|(order, file)| -> Result<ExtractionRecord> {
                let value = self.extract_one(file.as_ref(), lat, lon)?;
                Ok(ExtractionRecord {
                    order,
                    month: month_name(order as u32 + 1)?.to_string(),
                    value,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if self.fill_missing {
            fill_missing(&mut records);
        }
        Ok(records)
    }

    pub fn extract_files(
        &self,
        files: &[GridFile],
        lat: f64,
        lon: f64,
    ) -> Result<Vec<ExtractionRecord>> {
        let paths: Vec<&Path> = files.iter().map(|file| file.path.as_path()).collect();
        self.extract(&paths, lat, lon)
    }

    /// Only the measured values, in file order.
    pub fn extract_values<P: AsRef<Path>>(
        &self,
        files: &[P],
        lat: f64,
        lon: f64,
    ) -> Result<Vec<Option<f64>>> {
        Ok(self
            .extract(files, lat, lon)?
            .into_iter()
            .map(|record| record.value)
            .collect())
    }

    fn check_extensions<P: AsRef<Path>>(&self, files: &[P]) -> Result<()> {
        let suffix = format!(".{}", self.extension);
        let all_match = files
            .iter()
            .all(|file| file.as_ref().to_string_lossy().ends_with(&suffix));
        if all_match {
            Ok(())
        } else {
            Err(SolarYieldError::UnexpectedExtension {
                extension: self.extension.clone(),
                files: files.iter().map(|f| f.as_ref().to_path_buf()).collect(),
            })
        }
    }

    // The dataset handle is dropped at the end of this call, closing the file
    // whether or not the read succeeded.
    fn extract_one(&self, path: &Path, lat: f64, lon: f64) -> Result<Option<f64>> {
        let dataset = self.reader.open(path)?;
        let (lat_index, lon_index) = nearest_cell(&dataset, path, lat, lon)?;
        let value = dataset.value_at(lat_index, lon_index).map_err(|e| match e {
            SolarYieldError::Dataset { message, .. } => SolarYieldError::dataset(path, message),
            other => other,
        })?;
        debug!(
            path = %path.display(),
            lat_index,
            lon_index,
            ?value,
            "extracted nearest grid cell"
        );
        Ok(value)
    }
}

/// Axis-aligned nearest cell: each axis is searched on its own.
pub fn nearest_cell<D: GridDataset>(
    dataset: &D,
    path: &Path,
    lat: f64,
    lon: f64,
) -> Result<(usize, usize)> {
    let lat_index = nearest_index(&dataset.latitudes()?, lat)
        .ok_or_else(|| SolarYieldError::dataset(path, "latitude axis is empty"))?;
    let lon_index = nearest_index(&dataset.longitudes()?, lon)
        .ok_or_else(|| SolarYieldError::dataset(path, "longitude axis is empty"))?;
    Ok((lat_index, lon_index))
}

/// Replace every missing value with the mean of the present values of the
/// same batch. A batch without any value is left untouched.
pub fn fill_missing(records: &mut [ExtractionRecord]) {
    let Some(mean) = mean_of_present(records.iter().map(|r| r.value)) else {
        warn!(records = records.len(), "no values to fill missing cells from");
        return;
    };
    for record in records.iter_mut().filter(|r| r.value.is_none()) {
        record.value = Some(mean);
    }
}

impl SdlrReport {
    pub fn new(year: i32, sdlr: Vec<ExtractionRecord>) -> Self {
        SdlrReport { year, sdlr }
    }
}
