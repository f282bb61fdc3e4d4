//! Lab calculation module
//!
//! Unit conversion, the dilution solver, cell counting and transfection
//! arithmetic. Every function is pure.

pub mod cells;
pub mod converter;
pub mod dilution;
pub mod transfection;
pub mod units;

pub use cells::{cell_density, seeding_volume, HemocytometerCount};
pub use converter::{
    convert_concentration, convert_volume, parse_concentration_unit, parse_volume_unit,
};
pub use dilution::{
    dilution_from_ratio, solve_dilution, DilutionField, DilutionProblem, DilutionSolution,
};
pub use transfection::{pipetting_note, required_stock_volume};
pub use units::{
    ConcentrationFamily, ConcentrationUnit, Quantity, Unit, UnitCategory,
    VolumeUnit,
};
