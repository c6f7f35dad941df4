use serde::Serialize;
use tracing::{info, warn};
use uom::si::{
    area::square_meter,
    energy::kilowatt_hour,
    f64::{Area, Energy, HeatFluxDensity, Time},
    heat_flux_density::watt_per_square_meter,
    time::hour,
};

use crate::calendar::{abbr_of, current_year, days_in_month, month_from_number};
use crate::config::{EstimationSettings, SolarYieldConfig};
use crate::daylight::{DaySelection, DaylightCalculator};
use crate::dataset::{DatasetLocator, GridReader, NearestPointExtractor};
use crate::declination::DeclinationTable;
use crate::error::{Result, SolarYieldError};

const MONTHS_PER_YEAR: usize = 12;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnergyRecord {
    pub order: usize,
    /// Three letter month code
    pub month: String,
    /// kWh
    pub energy: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Estimate {
    /// Energy of an average day of the month.
    Month(EnergyRecord),
    /// Energy of each whole month of the year.
    Year(Vec<EnergyRecord>),
}

/// Energy yield of a panel of `area` over `peak_hours` of sun at the given
/// irradiance, in kWh.
///
/// # Arguments
/// * `irradiance` - mean irradiance at the site
/// * `area` - panel area
/// * `peak_hours` - hours of sun counted at full irradiance
/// * `efficiency` - panel efficiency, 0..1
pub fn panel_energy(
    irradiance: HeatFluxDensity,
    area: Area,
    peak_hours: Time,
    efficiency: f64,
) -> Energy {
    irradiance * area * peak_hours * efficiency
}

/// Month number (1..=12) for a month given modulo 12; 0 is December.
pub fn normalize_month(month: i32) -> u32 {
    match month.rem_euclid(12) {
        0 => 12,
        m => m as u32,
    }
}

pub struct EnergyEstimator<'a, R> {
    locator: DatasetLocator,
    extractor: NearestPointExtractor<R>,
    daylight: DaylightCalculator<'a>,
    settings: EstimationSettings,
}

impl<'a, R: GridReader> EnergyEstimator<'a, R> {
    /// The extractor is switched to fill missing months with the yearly mean.
    pub fn new(
        locator: DatasetLocator,
        extractor: NearestPointExtractor<R>,
        table: &'a DeclinationTable,
        settings: EstimationSettings,
    ) -> Self {
        EnergyEstimator {
            locator,
            extractor: extractor.with_fill_missing(true),
            daylight: DaylightCalculator::new(table),
            settings,
        }
    }

    /// Scan the configured data directory and wire the pipeline together.
    pub fn from_config(
        config: &SolarYieldConfig,
        reader: R,
        table: &'a DeclinationTable,
    ) -> Result<Self> {
        let locator = DatasetLocator::scan(
            &config.data_directory,
            config.layout.clone(),
            config.year_range,
        )?;
        let extractor = NearestPointExtractor::new(reader, config.layout.extension.clone());
        Ok(Self::new(locator, extractor, table, config.estimation))
    }

    /// Estimate from the last complete year of data.
    pub fn estimate(
        &self,
        lat: f64,
        lon: f64,
        area: f64,
        efficiency: Option<f64>,
        month: Option<i32>,
    ) -> Result<Option<Estimate>> {
        self.estimate_for_year(current_year() - 1, lat, lon, area, efficiency, month)
    }

    /// With `month` set, the energy of an average day of that month; without
    /// it, the total energy of every month of `year`.
    ///
    /// `Ok(None)` means the data needed for the estimate is not available.
    pub fn estimate_for_year(
        &self,
        year: i32,
        lat: f64,
        lon: f64,
        area: f64,
        efficiency: Option<f64>,
        month: Option<i32>,
    ) -> Result<Option<Estimate>> {
        let efficiency = efficiency.unwrap_or(self.settings.default_efficiency);
        info!(year, lat, lon, area, efficiency, ?month, "estimating energy");

        let Some(irradiance) = self.monthly_irradiance(year, lat, lon)? else {
            return Ok(None);
        };
        let area = Area::new::<square_meter>(area);

        if let Some(month) = month {
            let month = normalize_month(month);
            let Some(energy) =
                self.daily_energy(year, lat, area, irradiance[month as usize - 1], efficiency, month)?
            else {
                return Ok(None);
            };
            return Ok(Some(Estimate::Month(EnergyRecord {
                order: 0,
                month: abbr_of(month_from_number(month)?).to_string(),
                energy: energy.get::<kilowatt_hour>(),
            })));
        }

        let mut records = Vec::with_capacity(MONTHS_PER_YEAR);
        for (order, irradiance) in irradiance.into_iter().enumerate() {
            let month = order as u32 + 1;
            let Some(energy) = self.daily_energy(year, lat, area, irradiance, efficiency, month)?
            else {
                return Ok(None);
            };
            let days = f64::from(days_in_month(month, year)?);
            records.push(EnergyRecord {
                order,
                month: abbr_of(month_from_number(month)?).to_string(),
                energy: energy.get::<kilowatt_hour>() * days,
            });
        }
        Ok(Some(Estimate::Year(records)))
    }

    // Twelve irradiance values, or None when the year is not usable.
    fn monthly_irradiance(&self, year: i32, lat: f64, lon: f64) -> Result<Option<Vec<HeatFluxDensity>>> {
        let files = match self.locator.retrieve(year) {
            Ok(files) => files,
            Err(SolarYieldError::InvalidYear(year)) => {
                warn!(year, "The data is not up-to-date");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        if files.len() != MONTHS_PER_YEAR {
            warn!(year, files = files.len(), "expected one dataset file per month");
            return Ok(None);
        }

        let records = self.extractor.extract_files(&files, lat, lon)?;
        let values: Option<Vec<HeatFluxDensity>> = records
            .iter()
            .map(|record| record.value.map(HeatFluxDensity::new::<watt_per_square_meter>))
            .collect();
        if values.is_none() {
            warn!(year, lat, lon, "no irradiance at location");
        }
        Ok(values)
    }

    fn daily_energy(
        &self,
        year: i32,
        lat: f64,
        area: Area,
        irradiance: HeatFluxDensity,
        efficiency: f64,
        month: u32,
    ) -> Result<Option<Energy>> {
        let selection = DaySelection::MonthAverage {
            reference_year: year,
        };
        let Some(hours) = self.daylight.hours(lat, selection, month_from_number(month)?) else {
            warn!(month, "no declination data for month");
            return Ok(None);
        };
        let peak_hours = Time::new::<hour>(hours * self.settings.peak_sun_fraction);
        Ok(Some(panel_energy(irradiance, area, peak_hours, efficiency)))
    }
}
