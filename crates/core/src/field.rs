//! Two-dimensional scalar field with toroidal wrapping and clamped values.
//!
//! A `Field` stores `width * height` f64 values in the range [0, 1] using
//! row-major layout. Two things are stored this way: grain textures (which
//! tile, so integer access wraps) and glyph alpha masks (sampled at
//! arbitrary canvas positions through [`Field::sample`], which does not wrap).

use crate::error::MotifError;

/// A 2D scalar field with values clamped to [0, 1] and toroidal coordinate wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

fn checked_len(width: usize, height: usize) -> Result<usize, MotifError> {
    if width == 0 || height == 0 {
        return Err(MotifError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(MotifError::InvalidDimensions)
}

impl Field {
    /// Creates a zero-filled field of the given dimensions.
    ///
    /// Returns `MotifError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, MotifError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
        })
    }

    /// Creates a field filled with `value`, clamped to [0, 1].
    pub fn filled(width: usize, height: usize, value: f64) -> Result<Self, MotifError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value.clamp(0.0, 1.0); len],
        })
    }

    /// Creates a field from a pre-built data vector, validating that
    /// `data.len() == width * height`. Values are clamped to [0, 1].
    pub fn from_data(width: usize, height: usize, mut data: Vec<f64>) -> Result<Self, MotifError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(MotifError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len(),
                rhs_h: 1,
            });
        }
        data.iter_mut().for_each(|v| *v = v.clamp(0.0, 1.0));
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Field width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    fn index(&self, x: isize, y: isize) -> usize {
        let xi = x.rem_euclid(self.width as isize) as usize;
        let yi = y.rem_euclid(self.height as isize) as usize;
        yi * self.width + xi
    }

    /// Gets the value at `(x, y)` with toroidal wrapping.
    pub fn get(&self, x: isize, y: isize) -> f64 {
        self.data[self.index(x, y)]
    }

    /// Sets the value at `(x, y)` with toroidal wrapping. The value is clamped to [0, 1].
    pub fn set(&mut self, x: isize, y: isize, value: f64) {
        let idx = self.index(x, y);
        self.data[idx] = value.clamp(0.0, 1.0);
    }

    /// Nearest-cell lookup at a continuous position; 0 outside the field.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        if !(x >= 0.0 && y >= 0.0) {
            return 0.0;
        }
        let (xi, yi) = (x as usize, y as usize);
        if xi >= self.width || yi >= self.height {
            return 0.0;
        }
        self.data[yi * self.width + xi]
    }

    /// Arithmetic mean of all cells.
    pub fn mean(&self) -> f64 {
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Constructors --

    #[test]
    fn new_creates_zero_filled_field() {
        let field = Field::new(4, 3).unwrap();
        assert_eq!(field.width(), 4);
        assert_eq!(field.height(), 3);
        assert_eq!(field.data().len(), 12);
        assert!(field.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_or_overflowing_dimensions_are_rejected() {
        assert!(matches!(Field::new(0, 5), Err(MotifError::InvalidDimensions)));
        assert!(matches!(Field::new(5, 0), Err(MotifError::InvalidDimensions)));
        assert!(matches!(
            Field::new(usize::MAX, 2),
            Err(MotifError::InvalidDimensions)
        ));
    }

    #[test]
    fn filled_clamps_value() {
        let field = Field::filled(2, 2, 1.5).unwrap();
        assert!(field.data().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn from_data_checks_length_and_clamps() {
        assert!(matches!(
            Field::from_data(2, 2, vec![0.0; 3]),
            Err(MotifError::DimensionMismatch { .. })
        ));
        let f = Field::from_data(2, 1, vec![-1.0, 2.0]).unwrap();
        assert_eq!(f.data(), &[0.0, 1.0]);
    }

    // -- Access --

    #[test]
    fn get_wraps_toroidally() {
        let mut field = Field::new(4, 3).unwrap();
        field.set(0, 0, 0.5);
        assert_eq!(field.get(4, 3), 0.5);
        assert_eq!(field.get(-4, -3), 0.5);
        field.set(-1, -1, 0.25);
        assert_eq!(field.get(3, 2), 0.25);
    }

    #[test]
    fn sample_is_zero_outside() {
        let field = Field::filled(3, 3, 1.0).unwrap();
        assert_eq!(field.sample(1.5, 2.9), 1.0);
        assert_eq!(field.sample(-0.1, 1.0), 0.0);
        assert_eq!(field.sample(3.0, 1.0), 0.0);
        assert_eq!(field.sample(f64::NAN, 1.0), 0.0);
    }

    #[test]
    fn mean_of_cells() {
        let f = Field::from_data(4, 1, vec![0.0, 0.2, 0.6, 1.0]).unwrap();
        assert!((f.mean() - 0.45).abs() < 1e-12);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn set_get_round_trip_any_coordinate(
                x in -1000_isize..1000,
                y in -1000_isize..1000,
                v in 0.0_f64..=1.0,
            ) {
                let mut f = Field::new(7, 5).unwrap();
                f.set(x, y, v);
                prop_assert_eq!(f.get(x + 7, y - 5), v);
            }
        }
    }
}
