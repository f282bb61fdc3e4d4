//! Transfection calculations
//!
//! Plasmid stock volume and pipetting checks for small volumes.

use crate::error::{require_finite_result, require_positive, CalcResult};

/// Nanograms per microgram
pub const NG_PER_UG: f64 = 1_000.0;

/// Smallest volume treated as accurately pipettable with standard pipettes
pub const DEFAULT_MIN_PIPETTE_UL: f64 = 1.0;

/// Volume of plasmid stock (µL) holding `desired_mass_ug` of DNA
///
/// `stock_ng_per_ul` is the stock concentration as read from the
/// spectrophotometer.
pub fn required_stock_volume(desired_mass_ug: f64, stock_ng_per_ul: f64) -> CalcResult<f64> {
    let mass = require_positive("desired mass", desired_mass_ug)?;
    let conc = require_positive("stock concentration", stock_ng_per_ul)?;
    require_finite_result("stock volume", mass * NG_PER_UG / conc)
}

/// Advice for volumes below `min_ul`, otherwise `None`
pub fn pipetting_note(volume_ul: f64, min_ul: f64) -> Option<String> {
    if volume_ul.is_finite() && volume_ul < min_ul {
        Some(format!(
            "{:.3} µL is below {} µL and too small to pipette accurately; \
             prepare a working dilution or a master mix instead.",
            volume_ul, min_ul
        ))
    } else {
        None
    }
}
