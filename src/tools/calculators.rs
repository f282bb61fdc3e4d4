//! Calculator MCP Tools
//!
//! Wrap the lab calculators with unit parsing and display strings.

use serde::Serialize;

use crate::calc::{
    self, parse_concentration_unit, parse_volume_unit, DilutionProblem, DilutionSolution,
    HemocytometerCount, Quantity, Unit, VolumeUnit,
};
use crate::error::CalcResult;

/// Response for convert_volume and convert_concentration
#[derive(Debug, Serialize)]
pub struct ConversionResponse {
    pub value: f64,
    pub from_unit: &'static str,
    pub result: f64,
    pub to_unit: &'static str,
    pub display: String,
}

/// Response for solve_dilution and dilution_from_ratio
#[derive(Debug, Serialize)]
pub struct DilutionResponse {
    #[serde(flatten)]
    pub solution: DilutionSolution,
    pub display: String,
}

/// Response for cell_density
#[derive(Debug, Serialize)]
pub struct CellDensityResponse {
    pub cells_per_ml: f64,
    pub average_per_square: f64,
    pub display: String,
}

/// Response for plasmid_volume
#[derive(Debug, Serialize)]
pub struct PlasmidVolumeResponse {
    pub volume_ul: f64,
    pub display: String,
    pub pipetting_note: Option<String>,
}

/// Response for seeding_volume
#[derive(Debug, Serialize)]
pub struct SeedingVolumeResponse {
    pub volume: f64,
    pub unit: &'static str,
    pub display: String,
    pub pipetting_note: Option<String>,
}

fn conversion_response(quantity: Quantity, target: Unit) -> CalcResult<ConversionResponse> {
    let converted = quantity.convert_to(target)?;
    Ok(ConversionResponse {
        value: quantity.value(),
        from_unit: quantity.unit().symbol(),
        result: converted.value(),
        to_unit: target.symbol(),
        display: format!("{} = {}", quantity, converted),
    })
}

pub fn convert_volume(value: f64, from: &str, to: &str) -> CalcResult<ConversionResponse> {
    let from_unit = parse_volume_unit("from_unit", from)?;
    let to_unit = parse_volume_unit("to_unit", to)?;
    let quantity = Quantity::new(value, Unit::Volume(from_unit))?;
    conversion_response(quantity, Unit::Volume(to_unit))
}

pub fn convert_concentration(value: f64, from: &str, to: &str) -> CalcResult<ConversionResponse> {
    let from_unit = parse_concentration_unit("from_unit", from)?;
    let to_unit = parse_concentration_unit("to_unit", to)?;
    let quantity = Quantity::new(value, Unit::Concentration(from_unit))?;
    conversion_response(quantity, Unit::Concentration(to_unit))
}

fn dilution_response(solution: DilutionSolution) -> DilutionResponse {
    let display = format!(
        "Calculated {} = {:.3} {}",
        solution.solved_field, solution.value, solution.unit
    );
    DilutionResponse { solution, display }
}

pub fn solve_dilution(
    c1: Option<f64>,
    v1: Option<f64>,
    c2: Option<f64>,
    v2: Option<f64>,
    concentration_unit: &str,
    volume_unit: &str,
) -> CalcResult<DilutionResponse> {
    let problem = DilutionProblem {
        c1,
        v1,
        c2,
        v2,
        concentration_unit: parse_concentration_unit("concentration_unit", concentration_unit)?,
        volume_unit: parse_volume_unit("volume_unit", volume_unit)?,
    };
    let solution = calc::solve_dilution(&problem)?;
    Ok(dilution_response(solution))
}

pub fn dilution_from_ratio(
    factor: f64,
    final_volume: f64,
    volume_unit: &str,
) -> CalcResult<DilutionResponse> {
    let unit = parse_volume_unit("volume_unit", volume_unit)?;
    let solution = calc::dilution_from_ratio(factor, final_volume, unit)?;
    Ok(dilution_response(solution))
}

pub fn cell_density(total_cells: f64, dilution_factor: f64) -> CalcResult<CellDensityResponse> {
    let count = HemocytometerCount::new(total_cells, dilution_factor);
    let cells_per_ml = calc::cell_density(&count)?;
    Ok(CellDensityResponse {
        cells_per_ml,
        average_per_square: count.average_per_square(),
        display: format!("Calculated Cell Density: {:.2e} cells/mL", cells_per_ml),
    })
}

pub fn plasmid_volume(
    desired_mass_ug: f64,
    stock_ng_per_ul: f64,
    min_pipette_ul: f64,
) -> CalcResult<PlasmidVolumeResponse> {
    let volume_ul = calc::required_stock_volume(desired_mass_ug, stock_ng_per_ul)?;
    Ok(PlasmidVolumeResponse {
        volume_ul,
        display: format!("Required Volume: {:.3} µL", volume_ul),
        pipetting_note: calc::pipetting_note(volume_ul, min_pipette_ul),
    })
}

pub fn seeding_volume(
    desired_cells: f64,
    stock_cells_per_ml: f64,
    unit: &str,
    min_pipette_ul: f64,
) -> CalcResult<SeedingVolumeResponse> {
    let unit = parse_volume_unit("unit", unit)?;
    let ml = calc::seeding_volume(desired_cells, stock_cells_per_ml)?;
    let volume = calc::convert_volume(ml, VolumeUnit::Milliliter, unit)?;
    let ul = calc::convert_volume(ml, VolumeUnit::Milliliter, VolumeUnit::Microliter)?;
    Ok(SeedingVolumeResponse {
        volume,
        unit: unit.symbol(),
        display: format!("Volume per well: {:.3} {}", volume, unit),
        pipetting_note: calc::pipetting_note(ul, min_pipette_ul),
    })
}
