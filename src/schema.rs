use anyhow::{bail, Result};
use serde::Deserialize;
use std::collections::HashSet;

/// Which system fields are exported ahead of the configured elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// `id` and `name` only
    #[default]
    Basic,
    /// adds `codename` and `last_modified`
    Extended,
}

/// Source of a column's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    Id,
    Name,
    Codename,
    LastModified,
    Text(String),
    Length(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub id: String,
    pub title: String,
    pub kind: ColumnKind,
}

impl Column {
    fn new(id: &str, title: &str, kind: ColumnKind) -> Self {
        Self { id: id.to_string(), title: title.to_string(), kind }
    }
}

pub fn length_column_id(element: &str) -> String {
    format!("{element}_length")
}

/// Ordered output columns: base fields, then `(text, length)` pairs, then plain elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    columns: Vec<Column>,
}

impl OutputSchema {
    pub fn build(variant: SchemaVariant, with_length: &[String], plain: &[String]) -> Result<Self> {
        let mut columns = vec![
            Column::new("id", "Id", ColumnKind::Id),
            Column::new("name", "Name", ColumnKind::Name),
        ];
        if variant == SchemaVariant::Extended {
            columns.push(Column::new("codename", "Codename", ColumnKind::Codename));
            columns.push(Column::new("last_modified", "Last modified", ColumnKind::LastModified));
        }
        for el in with_length {
            let len_id = length_column_id(el);
            columns.push(Column::new(el, el, ColumnKind::Text(el.clone())));
            columns.push(Column::new(&len_id, &len_id, ColumnKind::Length(el.clone())));
        }
        for el in plain {
            columns.push(Column::new(el, el, ColumnKind::Text(el.clone())));
        }

        let mut seen = HashSet::new();
        for c in &columns {
            if c.id.trim().is_empty() {
                bail!("element codenames must not be empty");
            }
            if !seen.insert(c.id.as_str()) {
                bail!("duplicate output column '{}'", c.id);
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.id.as_str())
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
