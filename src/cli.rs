use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use kontent_csv::config::Overrides;
use kontent_csv::schema::SchemaVariant;

/// Export filtered Delivery API items to CSV
#[derive(Parser)]
#[command(name = "kontent-csv")]
#[command(about = "Fetch content items, filter them by text length and export them to CSV", long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch, filter and write the CSV file
    Export {
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Fetch, filter and print mapped rows without writing a file
    Preview {
        #[command(flatten)]
        opts: RunOpts,
        /// Number of rows to print
        #[arg(long, default_value_t = 10)]
        rows: usize,
    },
    /// Print the output columns for the current configuration
    Schema {
        /// Config file (defaults to ./kontent-csv.toml, then the user config dir)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Column set to export
        #[arg(long, value_enum)]
        variant: Option<SchemaVariant>,
    },
}

#[derive(Args)]
pub struct RunOpts {
    /// Config file (defaults to ./kontent-csv.toml, then the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Project identifier (overrides KONTENT_PROJECT_ID)
    #[arg(long)]
    pub project_id: Option<String>,
    /// Output CSV path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Maximum plain-text length of the filter element
    #[arg(long)]
    pub max_chars: Option<usize>,
    /// Column set to export
    #[arg(long, value_enum)]
    pub variant: Option<SchemaVariant>,
}

impl RunOpts {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            project_id: self.project_id.clone(),
            output: self.output.clone(),
            max_chars: self.max_chars,
            variant: self.variant,
        }
    }
}
