//! Lab Tutor
//!
//! An MCP server for biology lab calculations and course quizzes.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use labtutor::build_info;
use labtutor::config::Config;
use labtutor::mcp::LabTutorService;
use labtutor::models::Catalog;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("labtutor=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env()?;
    eprintln!(
        "Grading tolerance: {}, minimum pipette volume: {} µL",
        config.tolerance, config.min_pipette_ul
    );

    let catalog = Catalog::bundled();
    tracing::info!(
        "Loaded {} modules ({} items)",
        catalog.modules().len(),
        catalog.item_count()
    );

    // Create the Lab Tutor service
    let service = LabTutorService::new(config, catalog)?;

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
