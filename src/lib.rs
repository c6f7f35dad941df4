//! Solar panel energy yield estimates from gridded monthly surface
//! irradiance and tabulated solar declinations.

pub mod angle;
pub mod calendar;
pub mod config;
pub mod dataset;
pub mod daylight;
pub mod declination;
pub mod energy;
pub mod error;
pub mod tools;

pub use angle::{Dms, Hemisphere};
pub use config::SolarYieldConfig;
pub use daylight::{DaySelection, DaylightCalculator};
pub use declination::DeclinationTable;
pub use energy::{EnergyEstimator, EnergyRecord, Estimate};
pub use error::{Result, SolarYieldError};
