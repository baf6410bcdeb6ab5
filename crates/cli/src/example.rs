//! Example cluster generation

use anyhow::{bail, Result};
use cluster_composition::Coordinate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;

/// Bounding box of the MNI152 2mm template, in millimetres
pub const MNI_BOUNDS: [(f64, f64); 3] = [(-90.0, 90.0), (-126.0, 90.0), (-72.0, 108.0)];

#[derive(Debug, Clone)]
pub struct ExampleOptions {
    pub count: usize,
    pub seed: u64,
    /// Sample inside a sphere around this point instead of the whole box
    pub center: Option<Coordinate>,
    pub radius: f64,
}

impl Default for ExampleOptions {
    fn default() -> Self {
        Self {
            count: 20,
            seed: 42,
            center: None,
            radius: 10.0,
        }
    }
}

/// Deterministic pseudo-random cluster for `options`.
///
/// Points are rounded to whole millimetres, like reported peak tables.
///
/// # Errors
/// Fails on a non-finite radius or center.
pub fn generate_example(options: &ExampleOptions) -> Result<Vec<Coordinate>> {
    if !options.radius.is_finite() {
        bail!("Radius must be a finite number, got {}", options.radius);
    }
    if let Some(center) = options.center {
        if center.to_array().iter().any(|v| !v.is_finite()) {
            bail!(
                "Center must have finite coordinates, got {},{},{}",
                center.x,
                center.y,
                center.z
            );
        }
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut coordinates = Vec::with_capacity(options.count);

    while coordinates.len() < options.count {
        let point = match options.center {
            Some(center) => {
                let r = options.radius.abs();
                let offset = [
                    rng.random_range(-r..=r),
                    rng.random_range(-r..=r),
                    rng.random_range(-r..=r),
                ];
                // Rejection sampling keeps the distribution uniform in the sphere
                if offset.iter().map(|v| v * v).sum::<f64>() > r * r {
                    continue;
                }
                [center.x + offset[0], center.y + offset[1], center.z + offset[2]]
            }
            None => [
                rng.random_range(MNI_BOUNDS[0].0..=MNI_BOUNDS[0].1),
                rng.random_range(MNI_BOUNDS[1].0..=MNI_BOUNDS[1].1),
                rng.random_range(MNI_BOUNDS[2].0..=MNI_BOUNDS[2].1),
            ],
        };
        coordinates.push(Coordinate::new(
            point[0].round(),
            point[1].round(),
            point[2].round(),
        ));
    }

    Ok(coordinates)
}

/// Write coordinates as CSV with an `x,y,z` header
pub fn write_csv(coordinates: &[Coordinate], writer: impl Write) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["x", "y", "z"])?;
    for c in coordinates {
        csv_writer.write_record([c.x.to_string(), c.y.to_string(), c.z.to_string()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_coordinates;

    #[test]
    fn test_same_seed_same_cluster() {
        let options = ExampleOptions::default();
        assert_eq!(generate_example(&options).unwrap(), generate_example(&options).unwrap());
        assert_eq!(generate_example(&options).unwrap().len(), 20);

        let other = ExampleOptions {
            seed: 7,
            ..Default::default()
        };
        assert_ne!(generate_example(&options).unwrap(), generate_example(&other).unwrap());
    }

    #[test]
    fn test_points_stay_in_bounds() {
        let options = ExampleOptions {
            count: 500,
            ..Default::default()
        };
        for c in generate_example(&options).unwrap() {
            for (value, (lo, hi)) in c.to_array().iter().zip(MNI_BOUNDS) {
                assert!(*value >= lo && *value <= hi);
            }
        }
    }

    #[test]
    fn test_sphere_sampling() {
        let center = Coordinate::new(-40.0, 20.0, 30.0);
        let options = ExampleOptions {
            count: 200,
            seed: 3,
            center: Some(center),
            radius: 6.0,
        };
        for c in generate_example(&options).unwrap() {
            let d2 = (c.x - center.x).powi(2) + (c.y - center.y).powi(2) + (c.z - center.z).powi(2);
            // Whole-millimetre rounding can push a point at most sqrt(3)/2 outward
            assert!(d2.sqrt() <= 6.0 + 0.87);
        }
    }

    #[test]
    fn test_non_finite_sphere_rejected() {
        for radius in [f64::NAN, f64::INFINITY] {
            let options = ExampleOptions {
                center: Some(Coordinate::new(0.0, 0.0, 0.0)),
                radius,
                ..Default::default()
            };
            let err = generate_example(&options).unwrap_err();
            assert!(err.to_string().contains("Radius must be a finite number"));
        }

        let options = ExampleOptions {
            center: Some(Coordinate::new(f64::NAN, 0.0, 0.0)),
            ..Default::default()
        };
        assert!(generate_example(&options).is_err());
    }

    #[test]
    fn test_csv_round_trip_through_reader() {
        let coordinates = generate_example(&ExampleOptions::default()).unwrap();
        let mut buffer = Vec::new();
        write_csv(&coordinates, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("x,y,z\n"));
        assert_eq!(parse_coordinates(text.as_bytes(), b',').unwrap(), coordinates);
    }
}
