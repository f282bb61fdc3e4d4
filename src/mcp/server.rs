//! Lab Tutor MCP Server Implementation
//!
//! Exposes the calculators and the course quizzes as MCP tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::{CalcError, CalcResult};
use crate::grading::{AnswerEvaluator, ExpectedValue};
use crate::models::Catalog;
use crate::tools::status::StatusTracker;
use crate::tools::{calculators, quizzes, ToolError, ToolResult};

/// Lab Tutor MCP Service
#[derive(Clone)]
pub struct LabTutorService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    catalog: Arc<Catalog>,
    evaluator: AnswerEvaluator,
    config: Config,
    tool_router: ToolRouter<LabTutorService>,
}

impl LabTutorService {
    pub fn new(config: Config, catalog: Catalog) -> CalcResult<Self> {
        let evaluator = AnswerEvaluator::new(config.tolerance)?;
        let tracker = StatusTracker::new(config, catalog.modules().len(), catalog.item_count());
        Ok(Self {
            status_tracker: Arc::new(Mutex::new(tracker)),
            catalog: Arc::new(catalog),
            evaluator,
            config,
            tool_router: Self::tool_router(),
        })
    }
}

// ============================================================================
// Response Helpers
// ============================================================================

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Report a calculation failure to the caller as a tool-level error
fn calc_error(e: CalcError) -> Result<CallToolResult, McpError> {
    tracing::warn!("Rejected input: {}", e);
    let json = serde_json::to_string_pretty(&e.to_report())
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::error(vec![Content::text(json)]))
}

fn calc_result<T: Serialize>(result: CalcResult<T>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => json_result(&value),
        Err(e) => calc_error(e),
    }
}

fn tool_result<T: Serialize>(result: ToolResult<T>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => json_result(&value),
        Err(ToolError::NotFound(msg)) => Err(McpError::invalid_params(msg, None)),
        Err(ToolError::Calc(e)) => calc_error(e),
    }
}

// ============================================================================
// Calculator Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertVolumeParams {
    /// Volume to convert
    pub value: f64,
    /// Source unit: mL, µL (or uL), L
    pub from_unit: String,
    /// Target unit: mL, µL (or uL), L
    pub to_unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertConcentrationParams {
    /// Concentration to convert
    pub value: f64,
    /// Source unit: M, mM, µM, mg/mL, µg/mL, ng/µL, %, X
    pub from_unit: String,
    /// Target unit in the same family (molar or mass per volume)
    pub to_unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SolveDilutionParams {
    /// Stock concentration (omit if unknown)
    pub c1: Option<f64>,
    /// Stock volume (omit if unknown)
    pub v1: Option<f64>,
    /// Final concentration (omit if unknown)
    pub c2: Option<f64>,
    /// Final volume (omit if unknown)
    pub v2: Option<f64>,
    /// Unit shared by C1 and C2 (default M)
    #[serde(default = "default_concentration_unit")]
    pub concentration_unit: String,
    /// Unit shared by V1 and V2 (default mL)
    #[serde(default = "default_volume_unit")]
    pub volume_unit: String,
}

fn default_concentration_unit() -> String { "M".to_string() }
fn default_volume_unit() -> String { "mL".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DilutionFromRatioParams {
    /// Dilution factor, e.g. 1000 for a 1:1000 dilution
    pub factor: f64,
    /// Total volume of diluted solution to prepare
    pub final_volume: f64,
    /// Unit of final_volume (default µL)
    #[serde(default = "default_small_volume_unit")]
    pub volume_unit: String,
}

fn default_small_volume_unit() -> String { "µL".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CellDensityParams {
    /// Total cells counted across the four large squares
    pub total_cells: f64,
    /// Dilution factor before counting (2 for 1:1 Trypan Blue)
    pub dilution_factor: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PlasmidVolumeParams {
    /// DNA mass needed, in µg
    pub desired_mass_ug: f64,
    /// Plasmid stock concentration, in ng/µL
    pub stock_ng_per_ul: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SeedingVolumeParams {
    /// Number of cells to put in each well
    pub desired_cells: f64,
    /// Cell stock concentration in cells/mL
    pub stock_cells_per_ml: f64,
    /// Unit for the result (default µL)
    #[serde(default = "default_small_volume_unit")]
    pub unit: String,
}

// ============================================================================
// Quiz Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetModuleParams {
    /// Module ID (e.g., "module2")
    pub module_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CheckQuizAnswerParams {
    /// Module ID
    pub module_id: String,
    /// 1-based question number within the module quiz
    pub question_number: usize,
    /// Exact text of the chosen option
    pub answer: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CheckScenarioAnswerParams {
    /// Scenario quiz ID (e.g., "contamination-detective")
    pub scenario_id: String,
    /// 1-based question number within the scenario quiz
    pub question_number: usize,
    /// Exact text of the chosen option
    pub answer: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CheckPracticeAnswerParams {
    /// Practice problem ID (e.g., "bsa-dilution")
    pub problem_id: String,
    /// One entry per field in field order; numbers or numeric strings
    pub answers: Vec<Value>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExpectedValueParam {
    /// Reference value
    pub value: f64,
    /// Absolute tolerance (defaults to the configured tolerance)
    pub tolerance: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GradeNumericParams {
    /// Reference values in field order
    pub expected: Vec<ExpectedValueParam>,
    /// Submitted entries in the same order; numbers or numeric strings
    pub submitted: Vec<Value>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GradeChoiceParams {
    /// Canonical option text
    pub expected: String,
    /// Submitted option text
    pub submitted: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl LabTutorService {
    // --- Status ---

    #[tool(description = "Get the current status of the Lab Tutor service including build info, grading configuration and process information")]
    async fn labtutor_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status())
    }

    #[tool(description = "Get instructions for the lab calculators and quiz tools. Call this when unsure which units or parameters to use.")]
    fn calculator_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::CALCULATOR_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(CALCULATOR_INSTRUCTIONS)]))
    }

    // --- Calculators ---

    #[tool(description = "Convert a volume between L, mL and µL")]
    fn convert_volume(&self, Parameters(p): Parameters<ConvertVolumeParams>) -> Result<CallToolResult, McpError> {
        calc_result(calculators::convert_volume(p.value, &p.from_unit, &p.to_unit))
    }

    #[tool(description = "Convert a concentration within its family (M/mM/µM or mg/mL/µg/mL/ng/µL)")]
    fn convert_concentration(&self, Parameters(p): Parameters<ConvertConcentrationParams>) -> Result<CallToolResult, McpError> {
        calc_result(calculators::convert_concentration(p.value, &p.from_unit, &p.to_unit))
    }

    #[tool(description = "Solve C1V1 = C2V2 for the one missing value. Provide exactly three of c1, v1, c2, v2.")]
    fn solve_dilution(&self, Parameters(p): Parameters<SolveDilutionParams>) -> Result<CallToolResult, McpError> {
        calc_result(calculators::solve_dilution(
            p.c1, p.v1, p.c2, p.v2, &p.concentration_unit, &p.volume_unit,
        ))
    }

    #[tool(description = "Stock and diluent volumes for a 1:factor dilution (e.g., 1:1000 antibody dilution)")]
    fn dilution_from_ratio(&self, Parameters(p): Parameters<DilutionFromRatioParams>) -> Result<CallToolResult, McpError> {
        calc_result(calculators::dilution_from_ratio(p.factor, p.final_volume, &p.volume_unit))
    }

    #[tool(description = "Cell density (cells/mL) from a hemocytometer count over four large squares")]
    fn cell_density(&self, Parameters(p): Parameters<CellDensityParams>) -> Result<CallToolResult, McpError> {
        calc_result(calculators::cell_density(p.total_cells, p.dilution_factor))
    }

    #[tool(description = "Volume of plasmid stock (µL) needed for a given DNA mass, with a warning when the volume is too small to pipette")]
    fn plasmid_volume(&self, Parameters(p): Parameters<PlasmidVolumeParams>) -> Result<CallToolResult, McpError> {
        calc_result(calculators::plasmid_volume(
            p.desired_mass_ug, p.stock_ng_per_ul, self.config.min_pipette_ul,
        ))
    }

    #[tool(description = "Volume of cell stock needed to seed a given number of cells per well")]
    fn seeding_volume(&self, Parameters(p): Parameters<SeedingVolumeParams>) -> Result<CallToolResult, McpError> {
        calc_result(calculators::seeding_volume(
            p.desired_cells, p.stock_cells_per_ml, &p.unit, self.config.min_pipette_ul,
        ))
    }

    // --- Course Content ---

    #[tool(description = "List course modules with their quiz and practice problem counts")]
    fn list_modules(&self) -> Result<CallToolResult, McpError> {
        json_result(&quizzes::list_modules(&self.catalog))
    }

    #[tool(description = "Get a module's quiz questions, scenario quizzes and practice problems (answers hidden)")]
    fn get_module(&self, Parameters(p): Parameters<GetModuleParams>) -> Result<CallToolResult, McpError> {
        tool_result(quizzes::get_module(&self.catalog, &p.module_id))
    }

    // --- Grading ---

    #[tool(description = "Check an answer to an end-of-module quiz question. Returns the verdict, the correct answer and the explanation.")]
    fn check_quiz_answer(&self, Parameters(p): Parameters<CheckQuizAnswerParams>) -> Result<CallToolResult, McpError> {
        tool_result(quizzes::check_quiz_answer(
            &self.catalog, &self.evaluator, &p.module_id, p.question_number, &p.answer,
        ))
    }

    #[tool(description = "Check an answer to a scenario quiz question (contamination detective, method choice, troubleshooting, ...)")]
    fn check_scenario_answer(&self, Parameters(p): Parameters<CheckScenarioAnswerParams>) -> Result<CallToolResult, McpError> {
        tool_result(quizzes::check_scenario_answer(
            &self.catalog, &self.evaluator, &p.scenario_id, p.question_number, &p.answer,
        ))
    }

    #[tool(description = "Check numeric answers to a practice problem. Returns per-field correctness and the worked solution.")]
    fn check_practice_answer(&self, Parameters(p): Parameters<CheckPracticeAnswerParams>) -> Result<CallToolResult, McpError> {
        tool_result(quizzes::check_practice_answer(
            &self.catalog, &self.evaluator, &p.problem_id, &p.answers,
        ))
    }

    #[tool(description = "Grade arbitrary numeric answers against reference values with an absolute tolerance")]
    fn grade_numeric(&self, Parameters(p): Parameters<GradeNumericParams>) -> Result<CallToolResult, McpError> {
        let expected: Vec<ExpectedValue> = p
            .expected
            .iter()
            .map(|e| ExpectedValue { value: e.value, tolerance: e.tolerance })
            .collect();
        tool_result(quizzes::grade_numeric(&self.evaluator, &expected, &p.submitted))
    }

    #[tool(description = "Grade a multiple-choice or true/false pick by exact text match")]
    fn grade_choice(&self, Parameters(p): Parameters<GradeChoiceParams>) -> Result<CallToolResult, McpError> {
        json_result(&quizzes::grade_choice(&p.expected, &p.submitted))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for LabTutorService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "labtutor".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Lab Tutor".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Lab Tutor - biology lab calculators and course quizzes. \
                 Call calculator_instructions for units and parameters. \
                 Calculators: convert_volume, convert_concentration, solve_dilution, dilution_from_ratio, \
                 cell_density, plasmid_volume, seeding_volume. \
                 Course: list_modules, get_module. \
                 Grading: check_quiz_answer, check_scenario_answer, check_practice_answer, \
                 grade_numeric, grade_choice."
                    .into(),
            ),
        }
    }
}
