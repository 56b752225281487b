//! Snapshot of the view slice.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mvi::UiState;
use crate::view::types::{
    FormedView, Loading, SourceSummary, SourceTable, SqlDataSource, SqlValidation, TableColumns,
    View, ViewInfo, ViewSummary, DEFAULT_SQL_LIMIT,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    pub views: Vec<ViewSummary>,
    /// Decoded views keyed by view id.
    pub formed_views: BTreeMap<i64, FormedView>,
    /// View open in the editor, or the empty sentinel.
    pub editing_view: View,
    pub editing_view_info: ViewInfo,
    pub sources: Vec<SourceSummary>,
    pub tables: Vec<SourceTable>,
    /// Columns per table name, scoped to the current table list.
    pub map_table_columns: BTreeMap<String, TableColumns>,
    pub sql_validation: SqlValidation,
    pub sql_data_source: SqlDataSource,
    pub sql_limit: u32,
    pub loading: Loading,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            views: Vec::new(),
            formed_views: BTreeMap::new(),
            editing_view: View::default(),
            editing_view_info: ViewInfo::default(),
            sources: Vec::new(),
            tables: Vec::new(),
            map_table_columns: BTreeMap::new(),
            sql_validation: SqlValidation::default(),
            sql_data_source: SqlDataSource::default(),
            sql_limit: DEFAULT_SQL_LIMIT,
            loading: Loading::default(),
        }
    }
}

impl UiState for ViewState {}

impl ViewState {
    /// The snapshot a session starts from and a reset returns to.
    pub fn initial() -> Self {
        Self::default()
    }

    /// True while any request of this slice is in flight.
    pub fn is_busy(&self) -> bool {
        let Loading {
            view,
            table,
            modal,
            execute,
        } = self.loading;
        view || table || modal || execute
    }

    pub fn formed_view(&self, id: i64) -> Option<&FormedView> {
        self.formed_views.get(&id)
    }

    pub fn table_columns(&self, table_name: &str) -> Option<&TableColumns> {
        self.map_table_columns.get(table_name)
    }

    /// Whether the last execution or validation reported a failure.
    pub fn has_sql_error(&self) -> bool {
        matches!(self.sql_validation.code, Some(code) if code != 200)
    }
}
