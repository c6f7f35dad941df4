pub mod extractor;
pub mod grid;
pub mod locator;
#[cfg(feature = "netcdf")]
pub mod netcdf;

pub use extractor::{fill_missing, nearest_cell, ExtractionRecord, NearestPointExtractor, SdlrReport};
pub use grid::{GridDataset, GridReader, InMemoryGrid, InMemoryGridReader};
pub use locator::{DatasetLocator, GridFile};
#[cfg(feature = "netcdf")]
pub use self::netcdf::{NetcdfDataset, NetcdfReader};
