mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, RunOpts};
use kontent_csv::config::{ExportConfig, Overrides};
use kontent_csv::pipeline::Exporter;

fn load_config(opts: &RunOpts) -> Result<ExportConfig> {
    let mut cfg = ExportConfig::load(opts.config.as_deref())?;
    cfg.apply_overrides(opts.overrides());
    Ok(cfg)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Export { opts } => {
            let exporter = Exporter::from_config(load_config(&opts)?)?;
            let summary = exporter.run().await?;
            println!(
                "{} of {} items written to {}",
                summary.retained,
                summary.fetched,
                summary.output.display()
            );
        }
        Commands::Preview { opts, rows } => {
            let exporter = Exporter::from_config(load_config(&opts)?)?;
            let preview = exporter.preview().await?;
            println!("{}", preview.schema.ids().collect::<Vec<_>>().join("\t"));
            for rec in preview.records.iter().take(rows) {
                println!("{}", rec.values().collect::<Vec<_>>().join("\t"));
            }
            println!("({} of {} fetched items retained)", preview.records.len(), preview.fetched);
        }
        Commands::Schema { config, variant } => {
            let mut cfg = ExportConfig::load(config.as_deref())?;
            cfg.apply_overrides(Overrides { variant, ..Default::default() });
            for col in cfg.schema()?.columns() {
                println!("{}\t{}", col.id, col.title);
            }
        }
    }
    Ok(())
}
