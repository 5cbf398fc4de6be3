use crate::sanitize::{strip_tags, text_length};
use crate::schema::{length_column_id, ColumnKind, OutputSchema};
use crate::types::ContentItem;

/// A flattened, retained item. Keys follow the schema's column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    fields: Vec<(String, String)>,
}

impl ExportRecord {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Cells for one configured element: the stripped text and, when asked, its length.
pub fn project_element(item: &ContentItem, codename: &str, with_length: bool) -> Vec<(String, String)> {
    let text = item.raw_element(codename).map(|raw| strip_tags(&raw)).unwrap_or_default();
    let mut cells = Vec::with_capacity(2);
    if with_length {
        let len = text_length(&text).to_string();
        cells.push((codename.to_string(), text));
        cells.push((length_column_id(codename), len));
    } else {
        cells.push((codename.to_string(), text));
    }
    cells
}

pub fn record_from_item(schema: &OutputSchema, item: &ContentItem) -> ExportRecord {
    let mut fields = Vec::with_capacity(schema.len());
    for col in schema.columns() {
        match &col.kind {
            ColumnKind::Id => fields.push((col.id.clone(), item.system.id.clone())),
            ColumnKind::Name => fields.push((col.id.clone(), item.system.name.clone())),
            ColumnKind::Codename => fields.push((col.id.clone(), item.system.codename.clone())),
            ColumnKind::LastModified => fields.push((col.id.clone(), item.system.last_modified.clone())),
            // the length column comes right after its text column and is emitted with it
            ColumnKind::Text(el) => {
                let paired = schema
                    .columns()
                    .iter()
                    .any(|c| matches!(&c.kind, ColumnKind::Length(l) if l == el));
                fields.extend(project_element(item, el, paired));
            }
            ColumnKind::Length(_) => {}
        }
    }
    ExportRecord { fields }
}

pub fn records_from_items(schema: &OutputSchema, items: &[ContentItem]) -> Vec<ExportRecord> {
    items.iter().map(|i| record_from_item(schema, i)).collect()
}
