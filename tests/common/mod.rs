//! Shared test builders for view slice tests.

#![allow(dead_code, unused_imports)]

use std::path::PathBuf;

use tempfile::TempDir;
use viewstate::view::types::{
    EmbeddedView, SqlColumn, TableColumns, View, ViewRoleRaw, ViewSummary,
};

pub fn summary(id: i64, name: &str) -> ViewSummary {
    ViewSummary {
        id,
        name: name.to_string(),
        ..ViewSummary::default()
    }
}

pub fn raw_view(id: i64, model: &str, variable: &str, roles: Vec<ViewRoleRaw>) -> View {
    View {
        id: Some(id),
        name: format!("view-{id}"),
        sql: "select * from orders".to_string(),
        model: model.to_string(),
        variable: variable.to_string(),
        roles,
        ..View::default()
    }
}

pub fn embedded_view(id: i64, model: &str, variable: &str) -> EmbeddedView {
    EmbeddedView {
        id,
        name: format!("view-{id}"),
        model: model.to_string(),
        variable: variable.to_string(),
        ..EmbeddedView::default()
    }
}

pub fn table_columns(table: &str, columns: &[(&str, &str)]) -> TableColumns {
    TableColumns {
        table_name: table.to_string(),
        columns: columns
            .iter()
            .map(|(name, sql_type)| SqlColumn::new(*name, *sql_type))
            .collect(),
    }
}

/// Write `content` to a file in a fresh temp dir.
pub fn temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write temp file");
    (temp_dir, path)
}
