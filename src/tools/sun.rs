use std::f64::consts::PI;

use uom::si::{
    angle::radian,
    f64::{Angle, Time},
    ratio::ratio,
    time::hour,
};

/// Sunset hour angle for a given solar declination and observer latitude.
///
/// `omega = acos(-tan(declination) * tan(latitude))`. The cosine is clamped to
/// [-1, 1] so the result is defined for polar day (omega = pi) and polar
/// night (omega = 0).
///
/// # Arguments
/// * `declination` - solar declination
/// * `latitude` - latitude of the observer
///
/// # Returns
/// * `Angle` - half of the daylight arc, between 0 and pi radians
pub fn sunset_hour_angle(declination: Angle, latitude: Angle) -> Angle {
    let cos_omega = -declination.tan().get::<ratio>() * latitude.tan().get::<ratio>();
    Angle::new::<radian>(cos_omega.clamp(-1.0, 1.0).acos())
}

/// Length of the day spanned by a sunset hour angle: `omega * 24 / pi` hours.
pub fn daylight_duration(sunset_hour_angle: Angle) -> Time {
    Time::new::<hour>(sunset_hour_angle.get::<radian>() * 24.0 / PI)
}
