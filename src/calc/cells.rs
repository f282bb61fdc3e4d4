//! Cell counting calculations
//!
//! Hemocytometer density and seeding volume.

use serde::{Deserialize, Serialize};

use crate::error::{require_finite_result, require_non_negative, require_positive, CalcResult};

/// Large squares counted on a Neubauer hemocytometer
pub const SQUARES_COUNTED: f64 = 4.0;
/// One large square holds 0.1 µL, so cells per square x 10^4 = cells per mL
pub const CHAMBER_VOLUME_FACTOR: f64 = 1e4;

/// Raw hemocytometer count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HemocytometerCount {
    /// Sum of cells counted over the four large corner squares
    pub total_cells_in_4_squares: f64,
    /// Dilution applied before counting (2.0 for a 1:1 mix with Trypan Blue)
    pub dilution_factor: f64,
}

impl HemocytometerCount {
    pub fn new(total_cells_in_4_squares: f64, dilution_factor: f64) -> Self {
        Self {
            total_cells_in_4_squares,
            dilution_factor,
        }
    }

    /// Average cells per large square
    pub fn average_per_square(&self) -> f64 {
        self.total_cells_in_4_squares / SQUARES_COUNTED
    }
}

/// Cell density of the original sample in cells/mL
pub fn cell_density(count: &HemocytometerCount) -> CalcResult<f64> {
    require_non_negative("cells counted", count.total_cells_in_4_squares)?;
    require_positive("dilution factor", count.dilution_factor)?;
    require_finite_result(
        "cell density",
        count.average_per_square() * count.dilution_factor * CHAMBER_VOLUME_FACTOR,
    )
}

/// Volume of cell suspension (mL) that holds `desired_cells`
pub fn seeding_volume(desired_cells: f64, stock_cells_per_ml: f64) -> CalcResult<f64> {
    let desired_cells = require_positive("desired cells", desired_cells)?;
    let stock = require_positive("stock concentration", stock_cells_per_ml)?;
    require_finite_result("seeding volume", desired_cells / stock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalcError;

    #[test]
    fn test_cell_density_example() {
        // 240 cells over 4 squares, 1:2 Trypan Blue
        let density = cell_density(&HemocytometerCount::new(240.0, 2.0)).unwrap();
        assert!((density - 1.2e6).abs() < 1e-6);
    }

    #[test]
    fn test_zero_cells_is_valid() {
        assert_eq!(cell_density(&HemocytometerCount::new(0.0, 2.0)), Ok(0.0));
    }

    #[test]
    fn test_invalid_counts_rejected() {
        for count in [
            HemocytometerCount::new(-1.0, 2.0),
            HemocytometerCount::new(100.0, 0.0),
            HemocytometerCount::new(100.0, -2.0),
            HemocytometerCount::new(f64::NAN, 2.0),
            HemocytometerCount::new(100.0, f64::INFINITY),
        ] {
            assert!(
                matches!(cell_density(&count), Err(CalcError::InvalidInput { .. })),
                "{:?}",
                count
            );
        }
    }

    #[test]
    fn test_seeding_volume_plating_problem() {
        // 2 x 10^5 cells from a 1 x 10^6 cells/mL stock = 0.2 mL
        let ml = seeding_volume(2e5, 1e6).unwrap();
        assert!((ml - 0.2).abs() < 1e-12);
        assert!(seeding_volume(2e5, 0.0).is_err());
    }

    #[test]
    fn test_overflowing_results_rejected() {
        assert!(matches!(
            cell_density(&HemocytometerCount::new(1e305, 1e5)),
            Err(CalcError::InvalidInput { .. })
        ));
        assert!(matches!(seeding_volume(1e300, 1e-300), Err(CalcError::InvalidInput { .. })));
    }
}
