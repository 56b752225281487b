//! Events the view slice reacts to.
//!
//! Events arrive as `{"type": <tag>, "payload": {...}}` envelopes. Tags
//! come from four feature domains; only the view domain's state lives
//! here, the others feed read-through caches or carry embedded views.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::mvi::Intent;
use crate::view::types::{
    EmbeddedView, SourceSummary, SourceTable, SqlDataSource, TableColumns, View, ViewInfo,
    ViewSummary,
};

/// Wire tags, matched by exact equality.
pub mod kind {
    pub const LOAD_VIEWS: &str = "davinci/View/LOAD_VIEWS";
    pub const LOAD_VIEWS_SUCCESS: &str = "davinci/View/LOAD_VIEWS_SUCCESS";
    pub const LOAD_VIEWS_FAILURE: &str = "davinci/View/LOAD_VIEWS_FAILURE";
    pub const LOAD_VIEW_DETAIL_SUCCESS: &str = "davinci/View/LOAD_VIEW_DETAIL_SUCCESS";
    pub const ADD_VIEW: &str = "davinci/View/ADD_VIEW";
    pub const ADD_VIEW_SUCCESS: &str = "davinci/View/ADD_VIEW_SUCCESS";
    pub const ADD_VIEW_FAILURE: &str = "davinci/View/ADD_VIEW_FAILURE";
    pub const EDIT_VIEW: &str = "davinci/View/EDIT_VIEW";
    pub const EDIT_VIEW_SUCCESS: &str = "davinci/View/EDIT_VIEW_SUCCESS";
    pub const EDIT_VIEW_FAILURE: &str = "davinci/View/EDIT_VIEW_FAILURE";
    pub const DELETE_VIEW: &str = "davinci/View/DELETE_VIEW";
    pub const DELETE_VIEW_SUCCESS: &str = "davinci/View/DELETE_VIEW_SUCCESS";
    pub const DELETE_VIEW_FAILURE: &str = "davinci/View/DELETE_VIEW_FAILURE";
    pub const EXECUTE_SQL: &str = "davinci/View/EXECUTE_SQL";
    pub const EXECUTE_SQL_SUCCESS: &str = "davinci/View/EXECUTE_SQL_SUCCESS";
    pub const EXECUTE_SQL_FAILURE: &str = "davinci/View/EXECUTE_SQL_FAILURE";
    pub const UPDATE_EDITING_VIEW: &str = "davinci/View/UPDATE_EDITING_VIEW";
    pub const UPDATE_EDITING_VIEW_INFO: &str = "davinci/View/UPDATE_EDITING_VIEW_INFO";
    pub const SET_SQL_LIMIT: &str = "davinci/View/SET_SQL_LIMIT";
    pub const RESET_VIEW_STATE: &str = "davinci/View/RESET_VIEW_STATE";

    pub const LOAD_SOURCES_SUCCESS: &str = "davinci/Source/LOAD_SOURCES_SUCCESS";
    pub const LOAD_SOURCE_TABLES: &str = "davinci/Source/LOAD_SOURCE_TABLES";
    pub const LOAD_SOURCE_TABLES_SUCCESS: &str = "davinci/Source/LOAD_SOURCE_TABLES_SUCCESS";
    pub const LOAD_SOURCE_TABLES_FAILURE: &str = "davinci/Source/LOAD_SOURCE_TABLES_FAILURE";
    pub const LOAD_SOURCE_TABLE_COLUMNS_SUCCESS: &str =
        "davinci/Source/LOAD_SOURCE_TABLE_COLUMNS_SUCCESS";

    pub const LOAD_WIDGET_DETAIL_SUCCESS: &str = "davinci/Widget/LOAD_WIDGET_DETAIL_SUCCESS";
    pub const LOAD_DASHBOARD_DETAIL_SUCCESS: &str =
        "davinci/Dashboard/LOAD_DASHBOARD_DETAIL_SUCCESS";
    pub const LOAD_DISPLAY_DETAIL_SUCCESS: &str = "davinci/Display/LOAD_DISPLAY_DETAIL_SUCCESS";
}

/// Code and message of a server response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseHeader {
    pub code: i64,
    pub msg: String,
}

/// Response to a SQL preview request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlResponse {
    pub header: ResponseHeader,
    pub payload: SqlDataSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    LoadViews,
    LoadViewsSuccess { views: Vec<ViewSummary> },
    LoadViewsFailure,
    LoadViewDetailSuccess { view: View },
    AddView,
    AddViewSuccess { view: View },
    AddViewFailure,
    EditView,
    EditViewSuccess { view: View },
    EditViewFailure,
    DeleteView,
    DeleteViewSuccess { id: i64 },
    DeleteViewFailure,
    ExecuteSql,
    ExecuteSqlSuccess { result: SqlResponse },
    ExecuteSqlFailure { err: ResponseHeader },
    UpdateEditingView { view: View },
    UpdateEditingViewInfo { view_info: ViewInfo },
    SetSqlLimit { limit: u32 },
    ResetViewState,

    LoadSourcesSuccess { sources: Vec<SourceSummary> },
    LoadSourceTables,
    LoadSourceTablesSuccess { tables: Vec<SourceTable> },
    LoadSourceTablesFailure,
    LoadSourceTableColumnsSuccess { table_columns: TableColumns },

    LoadWidgetDetailSuccess { view: EmbeddedView },
    LoadDashboardDetailSuccess { views: Vec<EmbeddedView> },
    LoadDisplayDetailSuccess { views: Vec<EmbeddedView> },

    /// Any tag this slice does not know. Leaves the state untouched.
    Unrecognized { kind: String },
}

impl Intent for ViewEvent {}

/// An envelope could not be turned into an event.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Malformed event envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("Malformed payload for '{kind}': {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw `{type, payload}` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Deserialize)]
struct ViewPayload<T> {
    view: T,
}

#[derive(Deserialize)]
struct ViewsPayload<T> {
    views: Vec<T>,
}

#[derive(Deserialize)]
struct IdPayload {
    id: i64,
}

#[derive(Deserialize)]
struct ResultPayload {
    result: SqlResponse,
}

#[derive(Deserialize)]
struct ErrPayload {
    err: ResponseHeader,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewInfoPayload {
    view_info: ViewInfo,
}

#[derive(Deserialize)]
struct LimitPayload {
    limit: u32,
}

#[derive(Deserialize)]
struct SourcesPayload {
    sources: Vec<SourceSummary>,
}

#[derive(Deserialize)]
struct TablesPayload {
    tables: Vec<SourceTable>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableColumnsPayload {
    table_columns: TableColumns,
}

fn payload<T: DeserializeOwned>(kind: &str, value: Value) -> Result<T, EventError> {
    serde_json::from_value(value).map_err(|source| EventError::Payload {
        kind: kind.to_string(),
        source,
    })
}

impl ViewEvent {
    /// Wire tag of this event.
    pub fn kind(&self) -> &str {
        match self {
            ViewEvent::LoadViews => kind::LOAD_VIEWS,
            ViewEvent::LoadViewsSuccess { .. } => kind::LOAD_VIEWS_SUCCESS,
            ViewEvent::LoadViewsFailure => kind::LOAD_VIEWS_FAILURE,
            ViewEvent::LoadViewDetailSuccess { .. } => kind::LOAD_VIEW_DETAIL_SUCCESS,
            ViewEvent::AddView => kind::ADD_VIEW,
            ViewEvent::AddViewSuccess { .. } => kind::ADD_VIEW_SUCCESS,
            ViewEvent::AddViewFailure => kind::ADD_VIEW_FAILURE,
            ViewEvent::EditView => kind::EDIT_VIEW,
            ViewEvent::EditViewSuccess { .. } => kind::EDIT_VIEW_SUCCESS,
            ViewEvent::EditViewFailure => kind::EDIT_VIEW_FAILURE,
            ViewEvent::DeleteView => kind::DELETE_VIEW,
            ViewEvent::DeleteViewSuccess { .. } => kind::DELETE_VIEW_SUCCESS,
            ViewEvent::DeleteViewFailure => kind::DELETE_VIEW_FAILURE,
            ViewEvent::ExecuteSql => kind::EXECUTE_SQL,
            ViewEvent::ExecuteSqlSuccess { .. } => kind::EXECUTE_SQL_SUCCESS,
            ViewEvent::ExecuteSqlFailure { .. } => kind::EXECUTE_SQL_FAILURE,
            ViewEvent::UpdateEditingView { .. } => kind::UPDATE_EDITING_VIEW,
            ViewEvent::UpdateEditingViewInfo { .. } => kind::UPDATE_EDITING_VIEW_INFO,
            ViewEvent::SetSqlLimit { .. } => kind::SET_SQL_LIMIT,
            ViewEvent::ResetViewState => kind::RESET_VIEW_STATE,
            ViewEvent::LoadSourcesSuccess { .. } => kind::LOAD_SOURCES_SUCCESS,
            ViewEvent::LoadSourceTables => kind::LOAD_SOURCE_TABLES,
            ViewEvent::LoadSourceTablesSuccess { .. } => kind::LOAD_SOURCE_TABLES_SUCCESS,
            ViewEvent::LoadSourceTablesFailure => kind::LOAD_SOURCE_TABLES_FAILURE,
            ViewEvent::LoadSourceTableColumnsSuccess { .. } => {
                kind::LOAD_SOURCE_TABLE_COLUMNS_SUCCESS
            }
            ViewEvent::LoadWidgetDetailSuccess { .. } => kind::LOAD_WIDGET_DETAIL_SUCCESS,
            ViewEvent::LoadDashboardDetailSuccess { .. } => kind::LOAD_DASHBOARD_DETAIL_SUCCESS,
            ViewEvent::LoadDisplayDetailSuccess { .. } => kind::LOAD_DISPLAY_DETAIL_SUCCESS,
            ViewEvent::Unrecognized { kind } => kind,
        }
    }

    /// Build an event from an envelope.
    ///
    /// Payloads of start/failure events without data are ignored. An
    /// unknown tag yields [`ViewEvent::Unrecognized`].
    pub fn from_envelope(envelope: Envelope) -> Result<Self, EventError> {
        let Envelope { kind: tag, payload: value } = envelope;
        let tag = tag.as_str();

        let event = match tag {
            kind::LOAD_VIEWS => ViewEvent::LoadViews,
            kind::LOAD_VIEWS_SUCCESS => {
                let p: ViewsPayload<ViewSummary> = payload(tag, value)?;
                ViewEvent::LoadViewsSuccess { views: p.views }
            }
            kind::LOAD_VIEWS_FAILURE => ViewEvent::LoadViewsFailure,
            kind::LOAD_VIEW_DETAIL_SUCCESS => {
                let p: ViewPayload<View> = payload(tag, value)?;
                ViewEvent::LoadViewDetailSuccess { view: p.view }
            }
            kind::ADD_VIEW => ViewEvent::AddView,
            kind::ADD_VIEW_SUCCESS => {
                let p: ViewPayload<View> = payload(tag, value)?;
                ViewEvent::AddViewSuccess { view: p.view }
            }
            kind::ADD_VIEW_FAILURE => ViewEvent::AddViewFailure,
            kind::EDIT_VIEW => ViewEvent::EditView,
            kind::EDIT_VIEW_SUCCESS => {
                let p: ViewPayload<View> = payload(tag, value)?;
                ViewEvent::EditViewSuccess { view: p.view }
            }
            kind::EDIT_VIEW_FAILURE => ViewEvent::EditViewFailure,
            kind::DELETE_VIEW => ViewEvent::DeleteView,
            kind::DELETE_VIEW_SUCCESS => {
                let p: IdPayload = payload(tag, value)?;
                ViewEvent::DeleteViewSuccess { id: p.id }
            }
            kind::DELETE_VIEW_FAILURE => ViewEvent::DeleteViewFailure,
            kind::EXECUTE_SQL => ViewEvent::ExecuteSql,
            kind::EXECUTE_SQL_SUCCESS => {
                let p: ResultPayload = payload(tag, value)?;
                ViewEvent::ExecuteSqlSuccess { result: p.result }
            }
            kind::EXECUTE_SQL_FAILURE => {
                let p: ErrPayload = payload(tag, value)?;
                ViewEvent::ExecuteSqlFailure { err: p.err }
            }
            kind::UPDATE_EDITING_VIEW => {
                let p: ViewPayload<View> = payload(tag, value)?;
                ViewEvent::UpdateEditingView { view: p.view }
            }
            kind::UPDATE_EDITING_VIEW_INFO => {
                let p: ViewInfoPayload = payload(tag, value)?;
                ViewEvent::UpdateEditingViewInfo {
                    view_info: p.view_info,
                }
            }
            kind::SET_SQL_LIMIT => {
                let p: LimitPayload = payload(tag, value)?;
                ViewEvent::SetSqlLimit { limit: p.limit }
            }
            kind::RESET_VIEW_STATE => ViewEvent::ResetViewState,
            kind::LOAD_SOURCES_SUCCESS => {
                let p: SourcesPayload = payload(tag, value)?;
                ViewEvent::LoadSourcesSuccess { sources: p.sources }
            }
            kind::LOAD_SOURCE_TABLES => ViewEvent::LoadSourceTables,
            kind::LOAD_SOURCE_TABLES_SUCCESS => {
                let p: TablesPayload = payload(tag, value)?;
                ViewEvent::LoadSourceTablesSuccess { tables: p.tables }
            }
            kind::LOAD_SOURCE_TABLES_FAILURE => ViewEvent::LoadSourceTablesFailure,
            kind::LOAD_SOURCE_TABLE_COLUMNS_SUCCESS => {
                let p: TableColumnsPayload = payload(tag, value)?;
                ViewEvent::LoadSourceTableColumnsSuccess {
                    table_columns: p.table_columns,
                }
            }
            kind::LOAD_WIDGET_DETAIL_SUCCESS => {
                let p: ViewPayload<EmbeddedView> = payload(tag, value)?;
                ViewEvent::LoadWidgetDetailSuccess { view: p.view }
            }
            kind::LOAD_DASHBOARD_DETAIL_SUCCESS => {
                let p: ViewsPayload<EmbeddedView> = payload(tag, value)?;
                ViewEvent::LoadDashboardDetailSuccess { views: p.views }
            }
            kind::LOAD_DISPLAY_DETAIL_SUCCESS => {
                let p: ViewsPayload<EmbeddedView> = payload(tag, value)?;
                ViewEvent::LoadDisplayDetailSuccess { views: p.views }
            }
            other => ViewEvent::Unrecognized {
                kind: other.to_string(),
            },
        };
        Ok(event)
    }

    /// Parse one JSON envelope.
    pub fn from_json(json: &str) -> Result<Self, EventError> {
        let envelope: Envelope = serde_json::from_str(json).map_err(EventError::Envelope)?;
        Self::from_envelope(envelope)
    }
}
