use std::fs;
use std::path::{Path, PathBuf};

use crate::calendar::YearRange;

/// Layout of the gridded dataset files on disk.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetLayout {
    /// Fixed file name prefix, followed directly by the four digit year.
    pub file_prefix: String,
    /// File extension without the leading dot.
    pub extension: String,
    pub variables: VariableNames,
}

impl DatasetLayout {
    pub fn suffix(&self) -> String {
        format!(".{}", self.extension)
    }
}

impl Default for DatasetLayout {
    fn default() -> Self {
        DatasetLayout {
            file_prefix: "SDLmm".into(),
            extension: "nc".into(),
            variables: VariableNames::default(),
        }
    }
}

/// Names of the coordinate axes and of the measured quantity inside a file.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableNames {
    pub latitude: String,
    pub longitude: String,
    pub measurement: String,
}

impl Default for VariableNames {
    fn default() -> Self {
        VariableNames {
            latitude: "lat".into(),
            longitude: "lon".into(),
            measurement: "SDL".into(),
        }
    }
}

/// Constants of the energy formula.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EstimationSettings {
    /// Panel efficiency used when the caller does not give one.
    pub default_efficiency: f64,
    /// Fraction of daylight counted as peak sun hours.
    pub peak_sun_fraction: f64,
}

impl Default for EstimationSettings {
    fn default() -> Self {
        EstimationSettings {
            default_efficiency: 0.223,
            peak_sun_fraction: 0.6,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolarYieldConfig {
    pub data_directory: PathBuf,
    pub declination_table: PathBuf,
    pub layout: DatasetLayout,
    pub year_range: YearRange,
    pub estimation: EstimationSettings,
}

impl SolarYieldConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let string = fs::read_to_string(path)?;
        Self::from_json(&string)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let loaded: as_loaded::Config = json5::from_str(json)?;
        let converted = loaded.try_into()?;
        Ok(converted)
    }
}

impl TryFrom<as_loaded::Config> for SolarYieldConfig {
    type Error = anyhow::Error;

    fn try_from(value: as_loaded::Config) -> Result<Self, Self::Error> {
        let year_range = match value.year_range {
            Some([from, to]) if from > to => {
                anyhow::bail!("Year range [{}, {}] ends before it starts", from, to)
            }
            Some([from, to]) => YearRange::new(from, to),
            None => YearRange::default(),
        };

        let defaults = EstimationSettings::default();
        let estimation = EstimationSettings {
            default_efficiency: value
                .default_efficiency
                .unwrap_or(defaults.default_efficiency),
            peak_sun_fraction: value
                .peak_sun_fraction
                .unwrap_or(defaults.peak_sun_fraction),
        };
        for (label, fraction) in [
            ("default_efficiency", estimation.default_efficiency),
            ("peak_sun_fraction", estimation.peak_sun_fraction),
        ] {
            if !(fraction > 0.0 && fraction <= 1.0) {
                anyhow::bail!("{} must be in (0, 1], got {}", label, fraction)
            }
        }

        let dataset = value.dataset;
        let default_layout = DatasetLayout::default();
        let variables = dataset.variables.unwrap_or_default();
        let default_variables = default_layout.variables;
        let layout = DatasetLayout {
            file_prefix: dataset.file_prefix.unwrap_or(default_layout.file_prefix),
            extension: dataset
                .extension
                .map(|ext| ext.trim_start_matches('.').to_string())
                .unwrap_or(default_layout.extension),
            variables: VariableNames {
                latitude: variables.latitude.unwrap_or(default_variables.latitude),
                longitude: variables.longitude.unwrap_or(default_variables.longitude),
                measurement: variables.measurement.unwrap_or(default_variables.measurement),
            },
        };

        Ok(SolarYieldConfig {
            data_directory: dataset.directory,
            declination_table: value.declination_table,
            layout,
            year_range,
            estimation,
        })
    }
}

mod as_loaded {
    use std::path::PathBuf;

    use serde::Deserialize;

    #[derive(Clone, Debug, Deserialize)]
    pub struct Config {
        pub dataset: Dataset,
        pub declination_table: PathBuf,
        #[serde(default)]
        pub year_range: Option<[i32; 2]>,
        #[serde(default)]
        pub default_efficiency: Option<f64>,
        #[serde(default)]
        pub peak_sun_fraction: Option<f64>,
    }

    #[derive(Clone, Debug, Deserialize)]
    pub struct Dataset {
        pub directory: PathBuf,
        #[serde(default)]
        pub file_prefix: Option<String>,
        #[serde(default)]
        pub extension: Option<String>,
        #[serde(default)]
        pub variables: Option<Variables>,
    }

    #[derive(Clone, Debug, Default, Deserialize)]
    pub struct Variables {
        #[serde(default)]
        pub latitude: Option<String>,
        #[serde(default)]
        pub longitude: Option<String>,
        #[serde(default)]
        pub measurement: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = SolarYieldConfig::from_json(
            r#"{
                dataset: { directory: "static/nc" },
                declination_table: "static/csv/delta_table.csv",
            }"#,
        )
        .unwrap();

        assert_eq!(config.data_directory, PathBuf::from("static/nc"));
        assert_eq!(config.layout, DatasetLayout::default());
        assert_eq!(config.year_range, YearRange::new(1979, 2024));
        assert_eq!(config.estimation, EstimationSettings::default());
    }

    #[test]
    fn load_config() {
        let mut f = tempfile::NamedTempFile::new().unwrap();

        use std::io::Write;
        write!(f, "{}", sample_config_json()).unwrap();

        let config = SolarYieldConfig::load(f.path()).unwrap();

        check_sample_config(config);
    }

    #[test]
    fn config_from_json() {
        let config = SolarYieldConfig::from_json(sample_config_json()).unwrap();
        check_sample_config(config);
    }

    #[test]
    fn reversed_year_range() {
        let message = format!(
            "{}",
            SolarYieldConfig::from_json(
                r#"{
                    dataset: { directory: "nc" },
                    declination_table: "d.csv",
                    year_range: [2024, 1979],
                }"#
            )
            .unwrap_err()
        );

        message
            .find("2024")
            .expect("Error message should contain the offending range");
    }

    #[test]
    fn efficiency_out_of_bounds() {
        let message = format!(
            "{}",
            SolarYieldConfig::from_json(
                r#"{
                    dataset: { directory: "nc" },
                    declination_table: "d.csv",
                    default_efficiency: 22.3,
                }"#
            )
            .unwrap_err()
        );

        message
            .find("default_efficiency")
            .expect("Error message should name the setting");
    }

    #[test]
    fn missing_dataset_section() {
        assert!(SolarYieldConfig::from_json(r#"{ declination_table: "d.csv" }"#).is_err());
    }

    fn sample_config_json() -> &'static str {
        r#"{
            // monthly means, one file per month
            dataset: {
                directory: "/srv/sarah/nc",
                file_prefix: "SIDmm",
                extension: ".nc",
                variables: { measurement: "SIS" },
            },
            declination_table: "/srv/sarah/delta_table.csv",
            year_range: [1983, 2023],
            default_efficiency: 0.2,
            peak_sun_fraction: 0.5,
        }"#
    }

    fn check_sample_config(config: SolarYieldConfig) {
        assert_eq!(config.data_directory, PathBuf::from("/srv/sarah/nc"));
        assert_eq!(
            config.declination_table,
            PathBuf::from("/srv/sarah/delta_table.csv")
        );
        assert_eq!(config.layout.file_prefix, "SIDmm");
        assert_eq!(config.layout.extension, "nc");
        assert_eq!(config.layout.variables.measurement, "SIS");
        assert_eq!(config.layout.variables.latitude, "lat");
        assert_eq!(config.year_range, YearRange::new(1983, 2023));
        assert_eq!(config.estimation.default_efficiency, 0.2);
        assert_eq!(config.estimation.peak_sun_fraction, 0.5);
    }
}
