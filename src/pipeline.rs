use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use crate::config::ExportConfig;
use crate::delivery::{DeliveryClient, ItemSource, ItemsQuery};
use crate::export::write_csv_file;
use crate::mapping::{records_from_items, ExportRecord};
use crate::schema::OutputSchema;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub fetched: usize,
    pub retained: usize,
    pub output: PathBuf,
}

/// Mapped rows produced without touching the filesystem.
#[derive(Debug, Clone)]
pub struct Preview {
    pub schema: OutputSchema,
    pub fetched: usize,
    pub records: Vec<ExportRecord>,
}

/// Owns the configuration and an item source and runs fetch, filter, map and write.
pub struct Exporter<S: ItemSource> {
    config: ExportConfig,
    source: S,
}

impl Exporter<DeliveryClient> {
    /// Validate the configuration and connect to the Delivery API it names.
    pub fn from_config(config: ExportConfig) -> Result<Self> {
        config.validate()?;
        let source = DeliveryClient::new(&config.base_url, &config.project_id)?;
        Ok(Self { config, source })
    }
}

impl<S: ItemSource> Exporter<S> {
    pub fn with_source(config: ExportConfig, source: S) -> Self {
        Self { config, source }
    }

    fn query(&self) -> ItemsQuery {
        ItemsQuery {
            language: self.config.language.clone(),
            content_type: self.config.content_type.clone(),
            elements: self.config.requested_elements(),
            page_size: self.config.page_size,
        }
    }

    /// Fetch, filter and map. Nothing is written.
    pub async fn preview(&self) -> Result<Preview> {
        let schema = self.config.schema()?;
        let items = self.source.fetch_all(&self.query()).await?;
        let fetched = items.len();
        info!("Loaded '{}' {} items from Delivery API", fetched, self.config.content_type);

        let retained = self.config.filter.apply(items);
        info!("Filtered '{}' {} items matching given criteria", retained.len(), self.config.content_type);

        let records = records_from_items(&schema, &retained);
        Ok(Preview { schema, fetched, records })
    }

    pub async fn run(&self) -> Result<ExportSummary> {
        let Preview { schema, fetched, records } = self.preview().await?;
        let output = self.config.output.clone();
        info!("Saving filtered items to '{}'", output.display());
        let retained = write_csv_file(&output, &schema, &records)?;
        info!("File '{}' successfully created", output.display());
        Ok(ExportSummary { fetched, retained, output })
    }
}
