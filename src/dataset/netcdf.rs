//! NetCDF backend for the gridded dataset (`netcdf` feature).

use std::path::{Path, PathBuf};

use ::netcdf::AttributeValue;

use crate::config::VariableNames;
use crate::dataset::grid::{GridDataset, GridReader};
use crate::error::{Result, SolarYieldError};

#[derive(Clone, Debug, Default)]
pub struct NetcdfReader {
    variables: VariableNames,
}

impl NetcdfReader {
    pub fn new(variables: VariableNames) -> Self {
        NetcdfReader { variables }
    }
}

impl GridReader for NetcdfReader {
    type Dataset = NetcdfDataset;

    fn open(&self, path: &Path) -> Result<NetcdfDataset> {
        let file = ::netcdf::open(path).map_err(|e| SolarYieldError::dataset(path, e))?;
        Ok(NetcdfDataset {
            file,
            path: path.to_path_buf(),
            variables: self.variables.clone(),
        })
    }
}

/// An open NetCDF file; closed when dropped.
pub struct NetcdfDataset {
    file: ::netcdf::File,
    path: PathBuf,
    variables: VariableNames,
}

impl NetcdfDataset {
    fn variable(&self, name: &str) -> Result<::netcdf::Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| SolarYieldError::dataset(&self.path, format!("variable {name} not found")))
    }

    fn axis(&self, name: &str) -> Result<Vec<f64>> {
        self.variable(name)?
            .get_values::<f64, _>(..)
            .map_err(|e| SolarYieldError::dataset(&self.path, e))
    }
}

impl GridDataset for NetcdfDataset {
    fn latitudes(&self) -> Result<Vec<f64>> {
        self.axis(&self.variables.latitude)
    }

    fn longitudes(&self) -> Result<Vec<f64>> {
        self.axis(&self.variables.longitude)
    }

    fn value_at(&self, lat_index: usize, lon_index: usize) -> Result<Option<f64>> {
        let variable = self.variable(&self.variables.measurement)?;
        let raw = match variable.dimensions().len() {
            2 => variable.get_value::<f64, _>([lat_index, lon_index]),
            _ => variable.get_value::<f64, _>([0, lat_index, lon_index]),
        }
        .map_err(|e| SolarYieldError::dataset(&self.path, e))?;

        let is_fill = ["_FillValue", "missing_value"]
            .iter()
            .filter_map(|name| numeric_attribute(&variable, name))
            .any(|fill| fill == raw);
        if is_fill || raw.is_nan() {
            return Ok(None);
        }

        let scale = numeric_attribute(&variable, "scale_factor").unwrap_or(1.0);
        let offset = numeric_attribute(&variable, "add_offset").unwrap_or(0.0);
        Ok(Some(raw * scale + offset))
    }
}

fn numeric_attribute(variable: &::netcdf::Variable<'_>, name: &str) -> Option<f64> {
    match variable.attribute_value(name)?.ok()? {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Int(v) => Some(f64::from(v)),
        AttributeValue::Short(v) => Some(f64::from(v)),
        AttributeValue::Ushort(v) => Some(f64::from(v)),
        AttributeValue::Uchar(v) => Some(f64::from(v)),
        AttributeValue::Schar(v) => Some(f64::from(v)),
        _ => None,
    }
}
