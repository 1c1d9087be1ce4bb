use egui::{Color32, Rgba};

use crate::data::record::Record;

/// Two-color linear scale over the `max` values of a slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorScale {
    Linear {
        min: f64,
        max: f64,
        low: Rgba,
        high: Rgba,
    },
    /// Every value in the slice is equal; all cells get the low color.
    Degenerate { value: f64, color: Rgba },
}

impl ColorScale {
    /// `None` when there are no finite values.
    pub fn from_values<I>(values: I, low: Color32, high: Color32) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })?;

        let low = Rgba::from(low);
        let high = Rgba::from(high);
        if min == max {
            Some(ColorScale::Degenerate { value: min, color: low })
        } else {
            Some(ColorScale::Linear { min, max, low, high })
        }
    }

    pub fn from_slice(slice: &[Record], low: Color32, high: Color32) -> Option<Self> {
        Self::from_values(slice.iter().map(|r| r.max), low, high)
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, ColorScale::Degenerate { .. })
    }

    /// `(min, max)` of the mapped values.
    pub fn range(&self) -> (f64, f64) {
        match *self {
            ColorScale::Linear { min, max, .. } => (min, max),
            ColorScale::Degenerate { value, .. } => (value, value),
        }
    }

    /// Position of `value` in the range, clamped to `[0, 1]`.
    pub fn normalized(&self, value: f64) -> f64 {
        match *self {
            ColorScale::Linear { min, max, .. } => ((value - min) / (max - min)).clamp(0.0, 1.0),
            ColorScale::Degenerate { .. } => 0.0,
        }
    }

    pub fn color(&self, value: f64) -> Rgba {
        match *self {
            ColorScale::Linear { low, high, .. } => {
                let t = self.normalized(value) as f32;
                low * (1.0 - t) + high * t
            }
            ColorScale::Degenerate { color, .. } => color,
        }
    }

    pub fn color32(&self, value: f64) -> Color32 {
        Color32::from(self.color(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blue_red() -> (Color32, Color32) {
        (Color32::from_rgb(0, 0, 255), Color32::from_rgb(255, 0, 0))
    }

    #[test]
    fn endpoints_map_to_endpoint_colors() {
        let (low, high) = blue_red();
        let scale = ColorScale::from_values([1.0, 3.0, 2.0], low, high).unwrap();
        assert_eq!(scale.range(), (1.0, 3.0));
        assert_eq!(scale.color32(1.0), low);
        assert_eq!(scale.color32(3.0), high);
        assert_eq!(scale.normalized(2.0), 0.5);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let (low, high) = blue_red();
        let scale = ColorScale::from_values([1.0, 3.0], low, high).unwrap();
        assert_eq!(scale.color32(-10.0), low);
        assert_eq!(scale.color32(10.0), high);
    }

    #[test]
    fn distinct_values_get_distinct_colors() {
        let (low, high) = blue_red();
        let values = [0.8, 1.05, 1.2, 1.9, 2.0];
        let scale = ColorScale::from_values(values, low, high).unwrap();
        for pair in values.windows(2) {
            assert_ne!(scale.color(pair[0]), scale.color(pair[1]));
            assert!(scale.normalized(pair[0]) < scale.normalized(pair[1]));
        }
    }

    #[test]
    fn single_value_falls_back_to_low_color() {
        let (low, high) = blue_red();
        let slice = [Record::new(0.5, 0.5, 0.0, 0.0, 1.5)];
        let scale = ColorScale::from_slice(&slice, low, high).unwrap();
        assert!(scale.is_degenerate());
        let c = scale.color(1.5);
        assert!(!c.r().is_nan() && !c.g().is_nan() && !c.b().is_nan());
        assert_eq!(scale.color32(1.5), low);
        assert_eq!(scale.normalized(1.5), 0.0);
    }

    #[test]
    fn empty_slice_has_no_scale() {
        let (low, high) = blue_red();
        assert!(ColorScale::from_slice(&[], low, high).is_none());
        assert!(ColorScale::from_values([f64::NAN], low, high).is_none());
    }
}
