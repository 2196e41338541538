//! Mortality CLI - Colombian mortality dashboard
//!
//! ```bash
//! mortality serve                         # Load the data and serve the dashboard (port 8050)
//! mortality summarize NoFetal2019_BD.xlsx # Print every summary as JSON
//! mortality columns NoFetal2019_BD.xlsx   # Show which column plays which role
//! ```

use clap::{Parser, Subcommand};
use mortality::{
    server::start_server, ColumnMapping, Dashboard, DashboardConfig, SummaryName,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "mortality")]
#[command(about = "Descriptive dashboard of mortality in Colombia (2019)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the source file and start the HTTP dashboard
    Serve {
        /// Spreadsheet or CSV file (default: $MORTALITY_DATA or NoFetal2019_BD.xlsx)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Interface to bind (default: $MORTALITY_HOST or 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (default: $MORTALITY_PORT or 8050)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Compute the summaries and print them as JSON
    Summarize {
        /// Spreadsheet or CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only this summary (geographic, homicides, monthly, low-mortality,
        /// causes, sex-by-department, age-groups)
        #[arg(long)]
        only: Option<SummaryName>,
    },

    /// Show the column role mapping detected in a file
    Columns {
        /// Spreadsheet or CSV file
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { data, host, port } => cmd_serve(data, host, port).await,
        Commands::Summarize { input, output, only } => cmd_summarize(&input, output.as_deref(), only),
        Commands::Columns { input } => cmd_columns(&input),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(
    data: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = DashboardConfig::from_env().with_overrides(data, host, port);
    let addr = config.socket_addr()?;

    let dashboard = Dashboard::load(&config.data_path)?;
    start_server(dashboard, addr).await?;
    Ok(())
}

fn cmd_summarize(
    input: &Path,
    output: Option<&Path>,
    only: Option<SummaryName>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dashboard = Dashboard::load(input)?;

    let json = match only {
        Some(name) => serde_json::to_string_pretty(&dashboard.summaries.to_json(name)?)?,
        None => serde_json::to_string_pretty(&dashboard.summaries)?,
    };
    write_output(&json, output)
}

fn cmd_columns(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let table = mortality::load_table(input)?;
    println!("Columns: {}", table.headers.join(", "));

    let mapping = ColumnMapping::detect(&table.headers);
    for (role, column) in mapping.entries() {
        let marker = if role.is_required() { "*" } else { " " };
        println!("  {} {:<18} {}", marker, role.as_str(), column.unwrap_or("<none>"));
    }

    // Same gate the dashboard applies
    ColumnMapping::resolve(&table.headers)?;
    println!("All required columns found.");
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            info!("output written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
