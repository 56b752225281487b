//! Reducer for the view slice.

use std::collections::BTreeMap;

use crate::mvi::Reducer;
use crate::view::event::ViewEvent;
use crate::view::reconcile::reconcile;
use crate::view::state::ViewState;
use crate::view::types::{
    EmbeddedView, FormedView, Loading, SqlDataSource, SqlValidation, View, ViewInfo, ViewSummary,
};

/// Reducer for view slice state transitions.
pub struct ViewReducer;

impl Reducer for ViewReducer {
    type State = ViewState;
    type Intent = ViewEvent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        let loading = state.loading;

        match intent {
            ViewEvent::LoadViews | ViewEvent::DeleteView => ViewState {
                loading: Loading {
                    view: true,
                    ..loading
                },
                ..state
            },
            ViewEvent::LoadViewsFailure | ViewEvent::DeleteViewFailure => ViewState {
                loading: Loading {
                    view: false,
                    ..loading
                },
                ..state
            },
            ViewEvent::LoadViewsSuccess { views } => ViewState {
                views,
                loading: Loading {
                    view: false,
                    ..loading
                },
                ..state
            },

            ViewEvent::LoadViewDetailSuccess { view } => {
                let formed = FormedView::from_view_lenient(&view);
                let editing_view_info = formed.info();
                let mut formed_views = state.formed_views;
                if let Some(id) = view.id {
                    formed_views.insert(id, formed);
                }
                ViewState {
                    editing_view: view,
                    editing_view_info,
                    formed_views,
                    ..state
                }
            }

            ViewEvent::AddView | ViewEvent::EditView => ViewState {
                loading: Loading {
                    modal: true,
                    ..loading
                },
                ..state
            },
            ViewEvent::AddViewFailure | ViewEvent::EditViewFailure => ViewState {
                loading: Loading {
                    modal: false,
                    ..loading
                },
                ..state
            },
            ViewEvent::AddViewSuccess { view } | ViewEvent::EditViewSuccess { view } => {
                let (views, formed_views) = upsert_saved(state.views, state.formed_views, &view);
                ViewState {
                    views,
                    formed_views,
                    loading: Loading {
                        modal: false,
                        ..loading
                    },
                    ..state
                }
            }

            ViewEvent::DeleteViewSuccess { id } => {
                let mut views = state.views;
                views.retain(|summary| summary.id != id);
                let mut formed_views = state.formed_views;
                formed_views.remove(&id);
                ViewState {
                    views,
                    formed_views,
                    loading: Loading {
                        view: false,
                        ..loading
                    },
                    ..state
                }
            }

            ViewEvent::ExecuteSql => ViewState {
                loading: Loading {
                    execute: true,
                    ..loading
                },
                sql_validation: SqlValidation::default(),
                ..state
            },
            ViewEvent::ExecuteSqlSuccess { result } => {
                let model = reconcile(&state.editing_view_info.model, &result.payload.columns);
                ViewState {
                    editing_view_info: ViewInfo {
                        model,
                        ..state.editing_view_info
                    },
                    sql_data_source: result.payload,
                    sql_validation: SqlValidation {
                        code: Some(result.header.code),
                        message: Some(result.header.msg),
                    },
                    loading: Loading {
                        execute: false,
                        ..loading
                    },
                    ..state
                }
            }
            ViewEvent::ExecuteSqlFailure { err } => ViewState {
                sql_data_source: SqlDataSource {
                    columns: Vec::new(),
                    total_count: 0,
                    result_list: Vec::new(),
                },
                sql_validation: SqlValidation {
                    code: Some(err.code),
                    message: Some(err.msg),
                },
                loading: Loading {
                    execute: false,
                    ..loading
                },
                ..state
            },

            ViewEvent::UpdateEditingView { view } => ViewState {
                editing_view: view,
                ..state
            },
            ViewEvent::UpdateEditingViewInfo { view_info } => ViewState {
                editing_view_info: view_info,
                ..state
            },
            ViewEvent::SetSqlLimit { limit } => ViewState {
                sql_limit: limit,
                ..state
            },
            ViewEvent::ResetViewState => ViewState::initial(),

            ViewEvent::LoadSourcesSuccess { sources } => ViewState { sources, ..state },
            ViewEvent::LoadSourceTables => ViewState {
                loading: Loading {
                    table: true,
                    ..loading
                },
                ..state
            },
            ViewEvent::LoadSourceTablesSuccess { tables } => ViewState {
                tables,
                // Column cache only covers the current table set
                map_table_columns: Default::default(),
                loading: Loading {
                    table: false,
                    ..loading
                },
                ..state
            },
            ViewEvent::LoadSourceTablesFailure => ViewState {
                loading: Loading {
                    table: false,
                    ..loading
                },
                ..state
            },
            ViewEvent::LoadSourceTableColumnsSuccess { table_columns } => {
                let mut map_table_columns = state.map_table_columns;
                map_table_columns.insert(table_columns.table_name.clone(), table_columns);
                ViewState {
                    map_table_columns,
                    ..state
                }
            }

            ViewEvent::LoadWidgetDetailSuccess { view } => {
                let mut formed_views = state.formed_views;
                merge_embedded(&mut formed_views, std::slice::from_ref(&view));
                ViewState {
                    formed_views,
                    ..state
                }
            }
            ViewEvent::LoadDashboardDetailSuccess { views }
            | ViewEvent::LoadDisplayDetailSuccess { views } => {
                let mut formed_views = state.formed_views;
                merge_embedded(&mut formed_views, &views);
                ViewState {
                    formed_views,
                    ..state
                }
            }

            ViewEvent::Unrecognized { .. } => state,
        }
    }
}

fn merge_embedded(
    formed_views: &mut BTreeMap<i64, FormedView>,
    views: &[EmbeddedView],
) {
    for view in views {
        formed_views.insert(view.id, FormedView::from_embedded_lenient(view));
    }
}

/// Record a saved view in the list and the decoded cache.
fn upsert_saved(
    mut views: Vec<ViewSummary>,
    mut formed_views: BTreeMap<i64, FormedView>,
    view: &View,
) -> (Vec<ViewSummary>, BTreeMap<i64, FormedView>) {
    let Some(id) = view.id else {
        tracing::warn!(name = %view.name, "Saved view has no id, list not updated");
        return (views, formed_views);
    };

    let summary = ViewSummary::from(view);
    match views.iter_mut().find(|existing| existing.id == id) {
        Some(existing) => {
            existing.name = summary.name;
            existing.description = summary.description;
        }
        None => views.push(summary),
    }
    formed_views.insert(id, FormedView::from_view_lenient(view));
    (views, formed_views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::event::{ResponseHeader, SqlResponse};
    use crate::view::types::{SourceTable, SqlColumn, TableColumns, ViewRoleRaw};

    fn summary(id: i64, name: &str) -> ViewSummary {
        ViewSummary {
            id,
            name: name.into(),
            ..ViewSummary::default()
        }
    }

    fn saved_view(id: i64, name: &str) -> View {
        View {
            id: Some(id),
            name: name.into(),
            model: "{}".into(),
            variable: "[]".into(),
            ..View::default()
        }
    }

    #[test]
    fn load_views_sets_only_view_flag() {
        let state = ViewReducer::reduce(ViewState::initial(), ViewEvent::LoadViews);
        assert_eq!(
            state.loading,
            Loading {
                view: true,
                ..Loading::default()
            }
        );
    }

    #[test]
    fn load_views_success_replaces_list() {
        let state = ViewState {
            views: vec![summary(1, "old")],
            loading: Loading {
                view: true,
                ..Loading::default()
            },
            ..ViewState::initial()
        };
        let state = ViewReducer::reduce(
            state,
            ViewEvent::LoadViewsSuccess {
                views: vec![summary(2, "a"), summary(3, "b")],
            },
        );
        assert_eq!(state.views, vec![summary(2, "a"), summary(3, "b")]);
        assert!(!state.loading.view);
    }

    #[test]
    fn delete_failure_clears_view_flag() {
        let state = ViewReducer::reduce(ViewState::initial(), ViewEvent::DeleteView);
        assert!(state.loading.view);
        let state = ViewReducer::reduce(state, ViewEvent::DeleteViewFailure);
        assert!(!state.loading.view);
    }

    #[test]
    fn delete_success_drops_view_everywhere() {
        let state = ViewReducer::reduce(
            ViewState::initial(),
            ViewEvent::LoadViewDetailSuccess {
                view: saved_view(4, "doomed"),
            },
        );
        let state = ViewState {
            views: vec![summary(4, "doomed"), summary(5, "kept")],
            ..state
        };
        let state = ViewReducer::reduce(state, ViewEvent::DeleteView);
        let state = ViewReducer::reduce(state, ViewEvent::DeleteViewSuccess { id: 4 });
        assert_eq!(state.views, vec![summary(5, "kept")]);
        assert!(state.formed_view(4).is_none());
        assert!(!state.loading.view);
    }

    #[test]
    fn detail_without_id_only_sets_editing() {
        let view = View {
            name: "draft".into(),
            ..View::default()
        };
        let state = ViewReducer::reduce(
            ViewState::initial(),
            ViewEvent::LoadViewDetailSuccess { view: view.clone() },
        );
        assert_eq!(state.editing_view, view);
        assert!(state.formed_views.is_empty());
    }

    #[test]
    fn detail_with_malformed_model_falls_back() {
        let view = View {
            id: Some(2),
            model: "{not json".into(),
            variable: "[]".into(),
            roles: vec![ViewRoleRaw {
                role_id: 1,
                column_auth: String::new(),
                row_auth: "[]".into(),
            }],
            ..View::default()
        };
        let state = ViewReducer::reduce(
            ViewState::initial(),
            ViewEvent::LoadViewDetailSuccess { view },
        );
        assert!(state.editing_view_info.model.is_empty());
        assert_eq!(state.editing_view_info.roles.len(), 1);
        assert!(state.formed_view(2).is_some());
    }

    #[test]
    fn add_view_round_trip_toggles_modal() {
        let state = ViewReducer::reduce(ViewState::initial(), ViewEvent::AddView);
        assert!(state.loading.modal);
        let state = ViewReducer::reduce(
            state,
            ViewEvent::AddViewSuccess {
                view: saved_view(8, "new"),
            },
        );
        assert!(!state.loading.modal);
        assert_eq!(state.views, vec![summary(8, "new")]);
        assert!(state.formed_view(8).is_some());
    }

    #[test]
    fn edit_view_success_renames_in_place() {
        let state = ViewState {
            views: vec![summary(8, "old"), summary(9, "other")],
            ..ViewState::initial()
        };
        let state = ViewReducer::reduce(state, ViewEvent::EditView);
        let state = ViewReducer::reduce(
            state,
            ViewEvent::EditViewSuccess {
                view: saved_view(8, "renamed"),
            },
        );
        assert_eq!(state.views[0].name, "renamed");
        assert_eq!(state.views[1], summary(9, "other"));
        assert_eq!(state.formed_view(8).map(|v| v.name.as_str()), Some("renamed"));
    }

    #[test]
    fn edit_view_failure_clears_modal() {
        let state = ViewReducer::reduce(ViewState::initial(), ViewEvent::EditView);
        let state = ViewReducer::reduce(state, ViewEvent::EditViewFailure);
        assert!(!state.loading.modal);
    }

    #[test]
    fn execute_clears_previous_validation() {
        let state = ViewState {
            sql_validation: SqlValidation {
                code: Some(400),
                message: Some("old".into()),
            },
            ..ViewState::initial()
        };
        let state = ViewReducer::reduce(state, ViewEvent::ExecuteSql);
        assert!(state.loading.execute);
        assert_eq!(state.sql_validation, SqlValidation::default());
    }

    #[test]
    fn execute_success_stores_result_and_reconciles_model() {
        let mut editing_view_info = ViewInfo::default();
        editing_view_info
            .model
            .insert("gone".into(), Default::default());
        let state = ViewState {
            editing_view_info,
            loading: Loading {
                execute: true,
                ..Loading::default()
            },
            ..ViewState::initial()
        };

        let payload = SqlDataSource {
            columns: vec![SqlColumn::new("amount", "DECIMAL")],
            total_count: 1,
            result_list: vec![serde_json::from_str(r#"{"amount": 3.5}"#).unwrap()],
        };
        let state = ViewReducer::reduce(
            state,
            ViewEvent::ExecuteSqlSuccess {
                result: SqlResponse {
                    header: ResponseHeader {
                        code: 200,
                        msg: "success".into(),
                    },
                    payload: payload.clone(),
                },
            },
        );

        assert_eq!(state.sql_data_source, payload);
        assert_eq!(
            state.sql_validation,
            SqlValidation {
                code: Some(200),
                message: Some("success".into()),
            }
        );
        assert!(!state.loading.execute);
        assert!(state.editing_view_info.model.contains_key("amount"));
        assert!(!state.editing_view_info.model.contains_key("gone"));
    }

    #[test]
    fn set_sql_limit_replaces_value() {
        let state = ViewReducer::reduce(ViewState::initial(), ViewEvent::SetSqlLimit { limit: 25 });
        assert_eq!(state.sql_limit, 25);
    }

    #[test]
    fn table_flag_follows_table_loading() {
        let state = ViewReducer::reduce(ViewState::initial(), ViewEvent::LoadSourceTables);
        assert!(state.loading.table);
        let failed = ViewReducer::reduce(state.clone(), ViewEvent::LoadSourceTablesFailure);
        assert!(!failed.loading.table);
        let loaded = ViewReducer::reduce(
            state,
            ViewEvent::LoadSourceTablesSuccess {
                tables: vec![SourceTable {
                    name: "t".into(),
                    kind: None,
                }],
            },
        );
        assert!(!loaded.loading.table);
    }

    #[test]
    fn table_columns_merge_by_table_name() {
        let columns = |table: &str, column: &str| TableColumns {
            table_name: table.into(),
            columns: vec![SqlColumn::new(column, "INT")],
        };
        let state = ViewReducer::reduce(
            ViewState::initial(),
            ViewEvent::LoadSourceTableColumnsSuccess {
                table_columns: columns("t1", "a"),
            },
        );
        let state = ViewReducer::reduce(
            state,
            ViewEvent::LoadSourceTableColumnsSuccess {
                table_columns: columns("t2", "b"),
            },
        );
        let state = ViewReducer::reduce(
            state,
            ViewEvent::LoadSourceTableColumnsSuccess {
                table_columns: columns("t1", "c"),
            },
        );
        assert_eq!(state.map_table_columns.len(), 2);
        assert_eq!(state.table_columns("t1"), Some(&columns("t1", "c")));
    }

    #[test]
    fn unrecognized_event_is_identity() {
        let state = ViewState {
            sql_limit: 10,
            views: vec![summary(1, "v")],
            ..ViewState::initial()
        };
        let next = ViewReducer::reduce(
            state.clone(),
            ViewEvent::Unrecognized {
                kind: "davinci/Project/LOAD_PROJECTS".into(),
            },
        );
        assert_eq!(next, state);
    }
}
