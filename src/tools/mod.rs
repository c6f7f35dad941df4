pub mod sun;

use itertools::Itertools;

/// Index of the axis value closest to `target`.
/// Ties resolve to the first such index; an empty axis has no nearest value.
pub fn nearest_index(axis: &[f64], target: f64) -> Option<usize> {
    axis.iter()
        .position_min_by(|a, b| (*a - target).abs().total_cmp(&(*b - target).abs()))
}

/// Arithmetic mean of the values that are present.
pub fn mean_of_present<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_ulps_eq;
    use proptest::prelude::prop;
    use test_case::test_case;
    use test_strategy::proptest;

    #[test_case(&[-90.0, -45.0, 0.0, 45.0, 90.0], 30.0, Some(3); "interior")]
    #[test_case(&[-90.0, -45.0, 0.0, 45.0, 90.0], 120.0, Some(4); "beyond upper edge")]
    #[test_case(&[-90.0, -45.0, 0.0, 45.0, 90.0], -200.0, Some(0); "beyond lower edge")]
    #[test_case(&[0.0, 10.0, 20.0], 5.0, Some(0); "tie picks first")]
    #[test_case(&[90.0, 45.0, 0.0, -45.0, -90.0], 40.0, Some(1); "descending axis")]
    #[test_case(&[], 5.0, None; "empty axis")]
    fn nearest(axis: &[f64], target: f64, expected: Option<usize>) {
        assert_eq!(nearest_index(axis, target), expected);
    }

    #[proptest]
    fn nearest_is_minimal(
        #[strategy(prop::collection::vec(-180f64..180f64, 1..200))] axis: Vec<f64>,
        #[strategy(-200f64..200f64)] target: f64,
    ) {
        let index = nearest_index(&axis, target).unwrap();
        let best = (axis[index] - target).abs();
        assert!(axis.iter().all(|v| (v - target).abs() >= best));
        // repeated calls select the same cell
        assert_eq!(nearest_index(&axis, target), Some(index));
    }

    #[test]
    fn mean_skips_missing() {
        assert_ulps_eq!(
            mean_of_present([Some(1.0), None, Some(3.0)]).unwrap(),
            2.0
        );
        assert_eq!(mean_of_present([None, None]), None);
        assert_eq!(mean_of_present(Vec::new()), None);
    }
}
