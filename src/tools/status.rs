//! Lab Tutor Status Tool
//!
//! Runtime status and usage instructions for the Lab Tutor service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::config::Config;

/// Calculator usage instructions for AI assistants
pub const CALCULATOR_INSTRUCTIONS: &str = r#"
# Lab Tutor Calculator Instructions

## Units

| Category | Accepted symbols |
|----------|------------------|
| Volume | mL, µL (or uL), L |
| Concentration | M, mM, µM (or uM), mg/mL, µg/mL, ng/µL, %, X |

Molar symbols are case-sensitive: `mM` is millimolar, `M` is molar.

## solve_dilution (C1V1 = C2V2)

Provide exactly three of `c1`, `v1`, `c2`, `v2` and leave the unknown out.
C1/C2 share `concentration_unit`; V1/V2 share `volume_unit`. Convert first with
`convert_concentration` if the stock and target use different units
(10 mM = 10,000 µM).

**Example:** 500 mL of 0.5 M NaOH from a 10 M stock
→ `c1: 10, c2: 0.5, v2: 500, concentration_unit: "M", volume_unit: "mL"`
→ V1 = 25 mL of stock plus 475 mL of diluent.

A result whose stock volume exceeds the final volume comes back with a
`derived_note` starting with "Warning": the stock is weaker than the target.

## dilution_from_ratio

A 1:1000 antibody dilution for 1200 µL → `factor: 1000, final_volume: 1200, volume_unit: "µL"`.

## cell_density

`total_cells` is the sum over the four large squares; `dilution_factor` is 2
for a 1:1 mix with Trypan Blue. Result is cells/mL.

## plasmid_volume

`desired_mass_ug` in µg, `stock_ng_per_ul` in ng/µL. Volumes below the
pipetting threshold carry a `pipetting_note`.

## Quizzes and practice problems

1. `list_modules`, then `get_module` to see questions (answers are hidden).
2. `check_quiz_answer` / `check_scenario_answer` with the exact option text.
3. `check_practice_answer` with one entry per field, in field order, in the
   field's unit. Blank or non-numeric entries are graded as incorrect.
"#;

/// Status response for the labtutor_status tool
#[derive(Debug, Clone, Serialize)]
pub struct LabTutorStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
    pub grading_tolerance: f64,
    pub min_pipette_ul: f64,
    pub catalog_modules: usize,
    pub catalog_items: usize,
}

/// Tracks service start time for status reporting
pub struct StatusTracker {
    start_time: Instant,
    started_at: DateTime<Utc>,
    config: Config,
    catalog_modules: usize,
    catalog_items: usize,
}

impl StatusTracker {
    pub fn new(config: Config, catalog_modules: usize, catalog_items: usize) -> Self {
        Self {
            start_time: Instant::now(),
            started_at: Utc::now(),
            config,
            catalog_modules,
            catalog_items,
        }
    }

    pub fn get_status(&self) -> LabTutorStatus {
        let build_info = BuildInfo::current();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        LabTutorStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            started_at: self.started_at,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
            grading_tolerance: self.config.tolerance,
            min_pipette_ul: self.config.min_pipette_ul,
            catalog_modules: self.catalog_modules,
            catalog_items: self.catalog_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_config() {
        let tracker = StatusTracker::new(Config::default(), 3, 20);
        let status = tracker.get_status();
        assert_eq!(status.grading_tolerance, 0.011);
        assert_eq!(status.catalog_modules, 3);
        assert_eq!(status.process_id, std::process::id());
        assert!(status.started_at <= Utc::now());
    }

    #[test]
    fn test_instructions_cover_every_calculator() {
        for tool in ["solve_dilution", "dilution_from_ratio", "cell_density", "plasmid_volume"] {
            assert!(CALCULATOR_INSTRUCTIONS.contains(tool), "{}", tool);
        }
    }
}
