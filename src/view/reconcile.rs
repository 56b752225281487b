//! Reconciliation of a view model against the columns a query returned.

use crate::view::types::{ModelItem, ModelType, SqlColumn, ViewModel, VisualType};

const NUMBER_TYPES: &[&str] = &[
    "TINYINT",
    "SMALLINT",
    "MEDIUMINT",
    "INT",
    "INTEGER",
    "BIGINT",
    "FLOAT",
    "DOUBLE",
    "DOUBLE PRECISION",
    "REAL",
    "DECIMAL",
    "DEC",
    "NUMERIC",
    "NUMBER",
    "FIXED",
    "BIT",
    "SERIAL",
];

const DATE_TYPES: &[&str] = &["DATE", "DATETIME", "TIMESTAMP", "TIME", "YEAR"];

/// Strip length/precision and signedness, e.g. `decimal(10,2) unsigned` -> `DECIMAL`.
fn base_type(sql_type: &str) -> String {
    let head = sql_type.split('(').next().unwrap_or(sql_type);
    let upper = head.trim().to_ascii_uppercase();
    upper.trim_end_matches(" UNSIGNED").trim_end().to_string()
}

/// Model entry a freshly seen column starts with.
pub fn default_item(column: &SqlColumn) -> ModelItem {
    let base = base_type(&column.sql_type);
    let (visual_type, model_type) = if NUMBER_TYPES.contains(&base.as_str()) {
        (VisualType::Number, ModelType::Value)
    } else if DATE_TYPES.contains(&base.as_str()) {
        (VisualType::Date, ModelType::Category)
    } else {
        (VisualType::String, ModelType::Category)
    };
    ModelItem {
        sql_type: column.sql_type.clone(),
        visual_type,
        model_type,
        ..ModelItem::default()
    }
}

/// Align `model` with `columns`.
///
/// Exactly the returned columns end up in the model. Known columns keep
/// their visual and model types but take the reported SQL type; unknown
/// columns get [`default_item`]; entries for vanished columns are dropped.
pub fn reconcile(model: &ViewModel, columns: &[SqlColumn]) -> ViewModel {
    columns
        .iter()
        .map(|column| {
            let item = match model.get(&column.name) {
                Some(existing) => ModelItem {
                    sql_type: column.sql_type.clone(),
                    ..existing.clone()
                },
                None => default_item(column),
            };
            (column.name.clone(), item)
        })
        .collect()
}
