//! Backend seam for gridded measurement files.
//!
//! A [`GridReader`] opens one file and hands out a [`GridDataset`] that stays
//! open until it is dropped. The extractor only ever needs the two coordinate
//! axes and a single cell of the first time step.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, SolarYieldError};

pub trait GridDataset {
    fn latitudes(&self) -> Result<Vec<f64>>;

    fn longitudes(&self) -> Result<Vec<f64>>;

    /// Measurement at the first time step. `None` for masked or fill cells.
    fn value_at(&self, lat_index: usize, lon_index: usize) -> Result<Option<f64>>;
}

pub trait GridReader {
    type Dataset: GridDataset;

    fn open(&self, path: &Path) -> Result<Self::Dataset>;
}

/// Regular lat/lon grid held in memory, values stored row-major by latitude.
#[derive(Clone, Debug, PartialEq)]
pub struct InMemoryGrid {
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
    pub values: Vec<Option<f64>>,
}

impl InMemoryGrid {
    pub fn new(latitudes: Vec<f64>, longitudes: Vec<f64>, values: Vec<Option<f64>>) -> Self {
        InMemoryGrid {
            latitudes,
            longitudes,
            values,
        }
    }

    /// Grid with the same value in every cell.
    pub fn uniform(latitudes: Vec<f64>, longitudes: Vec<f64>, value: f64) -> Self {
        let cells = latitudes.len() * longitudes.len();
        InMemoryGrid::new(latitudes, longitudes, vec![Some(value); cells])
    }

    /// Grid whose cells are computed from their (lat, lon) coordinates.
    pub fn from_fn<F>(latitudes: Vec<f64>, longitudes: Vec<f64>, mut f: F) -> Self
    where
        F: FnMut(f64, f64) -> Option<f64>,
    {
        let values = latitudes
            .iter()
            .flat_map(|&lat| longitudes.iter().map(move |&lon| (lat, lon)))
            .map(|(lat, lon)| f(lat, lon))
            .collect();
        InMemoryGrid::new(latitudes, longitudes, values)
    }
}

impl GridDataset for InMemoryGrid {
    fn latitudes(&self) -> Result<Vec<f64>> {
        Ok(self.latitudes.clone())
    }

    fn longitudes(&self) -> Result<Vec<f64>> {
        Ok(self.longitudes.clone())
    }

    fn value_at(&self, lat_index: usize, lon_index: usize) -> Result<Option<f64>> {
        if lat_index >= self.latitudes.len() || lon_index >= self.longitudes.len() {
            return Err(SolarYieldError::dataset(
                PathBuf::new(),
                format!("cell ({lat_index}, {lon_index}) is outside the grid"),
            ));
        }
        let index = lat_index * self.longitudes.len() + lon_index;
        Ok(self.values.get(index).copied().flatten())
    }
}

/// Serves grids registered under a path; used for synthetic datasets.
#[derive(Clone, Debug, Default)]
pub struct InMemoryGridReader {
    grids: HashMap<PathBuf, InMemoryGrid>,
}

impl InMemoryGridReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<P: Into<PathBuf>>(&mut self, path: P, grid: InMemoryGrid) {
        self.grids.insert(path.into(), grid);
    }

    pub fn with<P: Into<PathBuf>>(mut self, path: P, grid: InMemoryGrid) -> Self {
        self.insert(path, grid);
        self
    }
}

impl GridReader for InMemoryGridReader {
    type Dataset = InMemoryGrid;

    fn open(&self, path: &Path) -> Result<InMemoryGrid> {
        self.grids
            .get(path)
            .cloned()
            .ok_or_else(|| SolarYieldError::dataset(path, "no such grid"))
    }
}

impl<R: GridReader> GridReader for &R {
    type Dataset = R::Dataset;

    fn open(&self, path: &Path) -> Result<Self::Dataset> {
        (**self).open(path)
    }
}
