//! Degrees-minutes-seconds angles as they appear in the declination table,
//! e.g. `S 23° 4'` or `0° 12' 30"`.

use std::fmt;
use std::str::FromStr;

use uom::si::{angle::degree, f64::Angle};

use crate::error::{Result, SolarYieldError};

const DEGREE_SIGN: char = '°';
const MINUTE_SIGNS: [char; 2] = ['\'', '′'];
const SECOND_SIGNS: [char; 3] = ['"', '″', '\''];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'N' => Some(Hemisphere::North),
            'S' => Some(Hemisphere::South),
            'E' => Some(Hemisphere::East),
            'W' => Some(Hemisphere::West),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
            Hemisphere::East => 'E',
            Hemisphere::West => 'W',
        }
    }

    /// South and west count as negative.
    pub fn is_negative(&self) -> bool {
        matches!(self, Hemisphere::South | Hemisphere::West)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dms {
    pub degrees: i32,
    pub minutes: i32,
    pub seconds: i32,
    pub hemisphere: Hemisphere,
}

impl Dms {
    pub fn new(degrees: i32, minutes: i32, seconds: i32, hemisphere: Hemisphere) -> Self {
        Dms {
            degrees,
            minutes,
            seconds,
            hemisphere,
        }
    }

    /// Parse a DMS string.
    ///
    /// A leading hemisphere letter is optional; a string starting with a digit
    /// is read as northern. Seconds may be omitted.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || SolarYieldError::InvalidDms(input.to_string());

        let trimmed = input.trim();
        let first = trimmed.chars().next().ok_or_else(invalid)?;
        let (hemisphere, rest) = if first.is_ascii_digit() || first == '-' || first == '+' {
            (Hemisphere::North, trimmed)
        } else {
            let hemisphere = Hemisphere::from_letter(first).ok_or_else(invalid)?;
            (hemisphere, trimmed[first.len_utf8()..].trim_start())
        };

        let (degrees, rest) = rest.split_once(DEGREE_SIGN).ok_or_else(invalid)?;
        let degrees = parse_component(degrees).ok_or_else(invalid)?;

        let (minutes, seconds) = match rest.split_once(MINUTE_SIGNS) {
            Some((minutes, seconds)) => (minutes, seconds.trim_end_matches(SECOND_SIGNS)),
            None => (rest, ""),
        };
        let minutes = if minutes.trim().is_empty() {
            0
        } else {
            parse_component(minutes).ok_or_else(invalid)?
        };
        let seconds = if seconds.trim().is_empty() {
            0
        } else {
            parse_component(seconds).ok_or_else(invalid)?
        };

        Ok(Dms::new(degrees, minutes, seconds, hemisphere))
    }

    /// Signed decimal degrees.
    pub fn to_decimal(&self) -> f64 {
        dms_to_decimal(self.degrees, self.minutes, self.seconds, self.hemisphere)
    }

    pub fn to_angle(&self) -> Angle {
        Angle::new::<degree>(self.to_decimal())
    }
}

impl FromStr for Dms {
    type Err = SolarYieldError;

    fn from_str(s: &str) -> Result<Self> {
        Dms::parse(s)
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}° {}' {}\"",
            self.hemisphere.letter(),
            self.degrees,
            self.minutes,
            self.seconds
        )
    }
}

/// `|degrees| + minutes/60 + seconds/3600`, negated for south and west.
pub fn dms_to_decimal(degrees: i32, minutes: i32, seconds: i32, hemisphere: Hemisphere) -> f64 {
    let decimal =
        f64::from(degrees).abs() + f64::from(minutes) / 60.0 + f64::from(seconds) / 3600.0;
    if hemisphere.is_negative() {
        -decimal
    } else {
        decimal
    }
}

// Tables copied from documents carry stray non-ASCII marks around numbers.
fn parse_component(raw: &str) -> Option<i32> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_whitespace())
        .collect();
    cleaned.parse().ok()
}
