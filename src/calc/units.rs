//! Unit types and conversion constants
//!
//! Volume and concentration units used by the lab calculators, with the fixed
//! scale factors between units of the same category.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{require_finite, CalcError, CalcResult};

// ============================================================================
// Volume Conversion Constants (per liter)
// ============================================================================

/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1_000.0;
/// Microliters per liter
pub const UL_PER_LITER: f64 = 1_000_000.0;

// ============================================================================
// Concentration Conversion Constants (to family base unit)
// ============================================================================

/// Molar per millimolar
pub const M_PER_MM: f64 = 1e-3;
/// Molar per micromolar
pub const M_PER_UM: f64 = 1e-6;
/// µg/mL per mg/mL
pub const UG_ML_PER_MG_ML: f64 = 1_000.0;
/// µg/mL per ng/µL (the two are the same ratio)
pub const UG_ML_PER_NG_UL: f64 = 1.0;

/// Category of a measurement unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Volume,
    Concentration,
}

/// Volume unit; liter is the base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeUnit {
    #[serde(rename = "L")]
    Liter,
    #[serde(rename = "mL")]
    Milliliter,
    #[serde(rename = "µL", alias = "uL", alias = "μL")]
    Microliter,
}

impl VolumeUnit {
    pub const ALL: [VolumeUnit; 3] = [
        VolumeUnit::Milliliter,
        VolumeUnit::Microliter,
        VolumeUnit::Liter,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            VolumeUnit::Liter => "L",
            VolumeUnit::Milliliter => "mL",
            VolumeUnit::Microliter => "µL",
        }
    }

    /// How many of this unit make up one liter
    pub fn per_liter(&self) -> f64 {
        match self {
            VolumeUnit::Liter => 1.0,
            VolumeUnit::Milliliter => ML_PER_LITER,
            VolumeUnit::Microliter => UL_PER_LITER,
        }
    }

    /// Parse a volume symbol or name (case-insensitive)
    pub fn from_symbol(s: &str) -> Option<Self> {
        let normalized = normalize_micro(s).to_lowercase();
        match normalized.trim() {
            "l" | "liter" | "liters" | "litre" | "litres" => Some(VolumeUnit::Liter),
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
                Some(VolumeUnit::Milliliter)
            }
            "µl" | "ul" | "microliter" | "microliters" | "microlitre" | "microlitres" => {
                Some(VolumeUnit::Microliter)
            }
            _ => None,
        }
    }
}

impl fmt::Display for VolumeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Concentration units convertible into each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationFamily {
    /// M, mM, µM
    Molar,
    /// mg/mL, µg/mL, ng/µL
    MassPerVolume,
    /// %
    Percent,
    /// X (fold)
    Fold,
}

/// Concentration unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcentrationUnit {
    #[serde(rename = "M")]
    Molar,
    #[serde(rename = "mM")]
    Millimolar,
    #[serde(rename = "µM", alias = "uM", alias = "μM")]
    Micromolar,
    #[serde(rename = "mg/mL")]
    MgPerMl,
    #[serde(rename = "µg/mL", alias = "ug/mL", alias = "μg/mL")]
    UgPerMl,
    #[serde(rename = "ng/µL", alias = "ng/uL", alias = "ng/μL")]
    NgPerUl,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "X")]
    Fold,
}

impl ConcentrationUnit {
    pub const ALL: [ConcentrationUnit; 8] = [
        ConcentrationUnit::Molar,
        ConcentrationUnit::Millimolar,
        ConcentrationUnit::Micromolar,
        ConcentrationUnit::MgPerMl,
        ConcentrationUnit::UgPerMl,
        ConcentrationUnit::NgPerUl,
        ConcentrationUnit::Percent,
        ConcentrationUnit::Fold,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            ConcentrationUnit::Molar => "M",
            ConcentrationUnit::Millimolar => "mM",
            ConcentrationUnit::Micromolar => "µM",
            ConcentrationUnit::MgPerMl => "mg/mL",
            ConcentrationUnit::UgPerMl => "µg/mL",
            ConcentrationUnit::NgPerUl => "ng/µL",
            ConcentrationUnit::Percent => "%",
            ConcentrationUnit::Fold => "X",
        }
    }

    pub fn family(&self) -> ConcentrationFamily {
        match self {
            ConcentrationUnit::Molar
            | ConcentrationUnit::Millimolar
            | ConcentrationUnit::Micromolar => ConcentrationFamily::Molar,
            ConcentrationUnit::MgPerMl
            | ConcentrationUnit::UgPerMl
            | ConcentrationUnit::NgPerUl => ConcentrationFamily::MassPerVolume,
            ConcentrationUnit::Percent => ConcentrationFamily::Percent,
            ConcentrationUnit::Fold => ConcentrationFamily::Fold,
        }
    }

    /// Scale factor to the family base unit (M for molar, µg/mL for mass per volume)
    pub fn to_family_base(&self) -> f64 {
        match self {
            ConcentrationUnit::Molar => 1.0,
            ConcentrationUnit::Millimolar => M_PER_MM,
            ConcentrationUnit::Micromolar => M_PER_UM,
            ConcentrationUnit::MgPerMl => UG_ML_PER_MG_ML,
            ConcentrationUnit::UgPerMl => 1.0,
            ConcentrationUnit::NgPerUl => UG_ML_PER_NG_UL,
            ConcentrationUnit::Percent | ConcentrationUnit::Fold => 1.0,
        }
    }

    /// Parse a concentration symbol.
    ///
    /// Molar symbols are case-sensitive (`mM` is millimolar, `M` is molar);
    /// mass-per-volume symbols accept any case.
    pub fn from_symbol(s: &str) -> Option<Self> {
        let normalized = normalize_micro(s);
        let trimmed = normalized.trim();

        match trimmed {
            "M" | "molar" => return Some(ConcentrationUnit::Molar),
            "mM" | "millimolar" => return Some(ConcentrationUnit::Millimolar),
            "µM" | "uM" | "micromolar" => return Some(ConcentrationUnit::Micromolar),
            "%" | "percent" => return Some(ConcentrationUnit::Percent),
            "X" | "x" | "fold" => return Some(ConcentrationUnit::Fold),
            _ => {}
        }

        match trimmed.to_lowercase().as_str() {
            "mg/ml" => Some(ConcentrationUnit::MgPerMl),
            "µg/ml" | "ug/ml" => Some(ConcentrationUnit::UgPerMl),
            "ng/µl" | "ng/ul" => Some(ConcentrationUnit::NgPerUl),
            _ => None,
        }
    }
}

impl fmt::Display for ConcentrationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Any supported unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Unit {
    Volume(VolumeUnit),
    Concentration(ConcentrationUnit),
}

impl Unit {
    pub fn category(&self) -> UnitCategory {
        match self {
            Unit::Volume(_) => UnitCategory::Volume,
            Unit::Concentration(_) => UnitCategory::Concentration,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Volume(u) => u.symbol(),
            Unit::Concentration(u) => u.symbol(),
        }
    }

    /// Parse any supported unit symbol, volume first
    pub fn from_symbol(s: &str) -> Option<Self> {
        VolumeUnit::from_symbol(s)
            .map(Unit::Volume)
            .or_else(|| ConcentrationUnit::from_symbol(s).map(Unit::Concentration))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A value tagged with its unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quantity {
    value: f64,
    unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> CalcResult<Self> {
        let value = require_finite("value", value)?;
        Ok(Self { value, unit })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn category(&self) -> UnitCategory {
        self.unit.category()
    }

    /// Express this quantity in another unit of the same category
    pub fn convert_to(&self, target: Unit) -> CalcResult<Quantity> {
        let value = match (self.unit, target) {
            (Unit::Volume(from), Unit::Volume(to)) => {
                super::converter::convert_volume(self.value, from, to)?
            }
            (Unit::Concentration(from), Unit::Concentration(to)) => {
                super::converter::convert_concentration(self.value, from, to)?
            }
            (from, to) => {
                return Err(CalcError::invalid(
                    "unit",
                    format!("cannot convert {} ({:?}) to {} ({:?})", from, from.category(), to, to.category()),
                ))
            }
        };
        Ok(Quantity { value, unit: target })
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// Map Greek mu (U+03BC) onto the micro sign (U+00B5)
fn normalize_micro(s: &str) -> String {
    s.replace('\u{03BC}', "\u{00B5}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_symbols() {
        assert_eq!(VolumeUnit::from_symbol("mL"), Some(VolumeUnit::Milliliter));
        assert_eq!(VolumeUnit::from_symbol("ml"), Some(VolumeUnit::Milliliter));
        assert_eq!(VolumeUnit::from_symbol("µL"), Some(VolumeUnit::Microliter));
        assert_eq!(VolumeUnit::from_symbol("\u{03BC}L"), Some(VolumeUnit::Microliter));
        assert_eq!(VolumeUnit::from_symbol("uL"), Some(VolumeUnit::Microliter));
        assert_eq!(VolumeUnit::from_symbol(" L "), Some(VolumeUnit::Liter));
        assert_eq!(VolumeUnit::from_symbol("cup"), None);
    }

    #[test]
    fn test_concentration_symbols_are_case_sensitive_for_molarity() {
        assert_eq!(ConcentrationUnit::from_symbol("M"), Some(ConcentrationUnit::Molar));
        assert_eq!(ConcentrationUnit::from_symbol("mM"), Some(ConcentrationUnit::Millimolar));
        assert_eq!(ConcentrationUnit::from_symbol("uM"), Some(ConcentrationUnit::Micromolar));
        assert_eq!(ConcentrationUnit::from_symbol("mm"), None);
        assert_eq!(ConcentrationUnit::from_symbol("MG/ML"), Some(ConcentrationUnit::MgPerMl));
        assert_eq!(ConcentrationUnit::from_symbol("ng/µL"), Some(ConcentrationUnit::NgPerUl));
        assert_eq!(ConcentrationUnit::from_symbol("%"), Some(ConcentrationUnit::Percent));
        assert_eq!(ConcentrationUnit::from_symbol("x"), Some(ConcentrationUnit::Fold));
    }

    #[test]
    fn test_symbols_round_trip() {
        for unit in VolumeUnit::ALL {
            assert_eq!(VolumeUnit::from_symbol(unit.symbol()), Some(unit));
        }
        for unit in ConcentrationUnit::ALL {
            assert_eq!(ConcentrationUnit::from_symbol(unit.symbol()), Some(unit));
        }
    }

    #[test]
    fn test_unit_from_symbol_category() {
        assert_eq!(Unit::from_symbol("mL").map(|u| u.category()), Some(UnitCategory::Volume));
        assert_eq!(Unit::from_symbol("mM").map(|u| u.category()), Some(UnitCategory::Concentration));
        assert_eq!(Unit::from_symbol("%").map(|u| u.category()), Some(UnitCategory::Concentration));
        assert_eq!(Unit::from_symbol("tbsp"), None);
    }

    #[test]
    fn test_concentration_families() {
        assert_eq!(ConcentrationUnit::Micromolar.family(), ConcentrationFamily::Molar);
        assert_eq!(ConcentrationUnit::NgPerUl.family(), ConcentrationFamily::MassPerVolume);
        assert_eq!(ConcentrationUnit::Percent.family(), ConcentrationFamily::Percent);
    }

    #[test]
    fn test_quantity_rejects_non_finite() {
        assert!(Quantity::new(f64::NAN, Unit::Volume(VolumeUnit::Milliliter)).is_err());
    }

    #[test]
    fn test_quantity_convert_same_category() {
        let q = Quantity::new(0.05, Unit::Volume(VolumeUnit::Milliliter)).unwrap();
        let ul = q.convert_to(Unit::Volume(VolumeUnit::Microliter)).unwrap();
        assert!((ul.value() - 50.0).abs() < 1e-9);
        assert_eq!(ul.unit().symbol(), "µL");
    }

    #[test]
    fn test_quantity_rejects_cross_category() {
        let q = Quantity::new(1.0, Unit::Volume(VolumeUnit::Milliliter)).unwrap();
        let err = q.convert_to(Unit::Concentration(ConcentrationUnit::Molar)).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { .. }));
    }

    #[test]
    fn test_unit_serde_symbols() {
        let json = serde_json::to_string(&VolumeUnit::Microliter).unwrap();
        assert_eq!(json, "\"µL\"");
        let parsed: ConcentrationUnit = serde_json::from_str("\"uM\"").unwrap();
        assert_eq!(parsed, ConcentrationUnit::Micromolar);
    }
}
