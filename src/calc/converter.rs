//! Unit conversion functions
//!
//! Same-category conversions between the units defined in [`super::units`].

use super::units::{ConcentrationUnit, VolumeUnit};
use crate::error::{require_finite, require_finite_result, CalcError, CalcResult};

/// Convert a volume between liters, milliliters and microliters
///
/// Examples:
/// - 1 mL -> 1000 µL
/// - 250 µL -> 0.25 mL
pub fn convert_volume(value: f64, from: VolumeUnit, to: VolumeUnit) -> CalcResult<f64> {
    let value = require_finite("volume", value)?;
    if from == to {
        return Ok(value);
    }
    require_finite_result("volume", value * to.per_liter() / from.per_liter())
}

/// Convert a concentration within its unit family
///
/// Molar units convert among themselves, as do mass-per-volume units.
/// `%` and `X` only convert to themselves.
pub fn convert_concentration(
    value: f64,
    from: ConcentrationUnit,
    to: ConcentrationUnit,
) -> CalcResult<f64> {
    let value = require_finite("concentration", value)?;
    if from.family() != to.family() {
        return Err(CalcError::invalid(
            "concentration unit",
            format!("cannot convert {} to {}", from, to),
        ));
    }
    if from == to {
        return Ok(value);
    }
    require_finite_result("concentration", value * from.to_family_base() / to.to_family_base())
}

/// Parse a volume unit symbol, reporting the offending field on failure
pub fn parse_volume_unit(field: &str, symbol: &str) -> CalcResult<VolumeUnit> {
    VolumeUnit::from_symbol(symbol)
        .ok_or_else(|| CalcError::invalid(field, format!("unknown volume unit '{}'", symbol)))
}

/// Parse a concentration unit symbol, reporting the offending field on failure
pub fn parse_concentration_unit(field: &str, symbol: &str) -> CalcResult<ConcentrationUnit> {
    ConcentrationUnit::from_symbol(symbol).ok_or_else(|| {
        CalcError::invalid(field, format!("unknown concentration unit '{}'", symbol))
    })
}
