use chrono::Month;
use uom::si::{angle::degree, f64::Angle, time::hour};

use crate::calendar::days_in_month;
use crate::declination::DeclinationTable;
use crate::tools::sun::{daylight_duration, sunset_hour_angle};

/// Which days of a month to compute daylight for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DaySelection {
    /// A single day of the month, 1-based.
    Day(u32),
    /// Mean over the month column of the declination table.
    MonthAverage { reference_year: i32 },
}

impl DaySelection {
    /// `-1` selects the month average, any other value a single day. Other
    /// negative values select day 0, which has no declination.
    pub fn from_day_of_month(day: i32, reference_year: i32) -> Self {
        match day {
            -1 => DaySelection::MonthAverage { reference_year },
            day => DaySelection::Day(u32::try_from(day).unwrap_or(0)),
        }
    }
}

/// Daylight duration from tabulated solar declinations.
#[derive(Clone, Copy, Debug)]
pub struct DaylightCalculator<'a> {
    table: &'a DeclinationTable,
}

impl<'a> DaylightCalculator<'a> {
    pub fn new(table: &'a DeclinationTable) -> Self {
        DaylightCalculator { table }
    }

    /// Hours of daylight at `latitude` (degrees) for the selected day(s) of
    /// `month`, or `None` when the table has no declination to use.
    pub fn hours(&self, latitude: f64, selection: DaySelection, month: Month) -> Option<f64> {
        let latitude = Angle::new::<degree>(latitude);
        match selection {
            DaySelection::Day(day) => self.hours_on(latitude, day, month),
            DaySelection::MonthAverage { reference_year } => {
                self.month_average(latitude, month, reference_year)
            }
        }
    }

    fn hours_on(&self, latitude: Angle, day: u32, month: Month) -> Option<f64> {
        let declination = self.table.get(day, month)?.to_angle();
        Some(
            daylight_duration(sunset_hour_angle(declination, latitude)).get::<hour>(),
        )
    }

    // Every month of the reference year contributes its own span of days
    // (1..=28 for February, 1..=31 for January, ...) from the requested
    // column, so the first days of the column carry more weight than the
    // last ones. Empty cells are skipped.
    fn month_average(&self, latitude: Angle, month: Month, reference_year: i32) -> Option<f64> {
        let (sum, count) = (1..=12)
            .filter_map(|m| days_in_month(m, reference_year).ok())
            .flat_map(|days| 1..=days)
            .filter_map(|day| self.hours_on(latitude, day, month))
            .fold((0.0, 0usize), |(sum, count), hours| (sum + hours, count + 1));
        (count > 0).then(|| sum / count as f64)
    }
}
