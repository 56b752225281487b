//! Record shapes shared by the view slice.
//!
//! Field names follow the web application's JSON payloads (camelCase), so
//! every type here can be read straight out of an event envelope.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Row limit applied to SQL previews until the user picks another one.
pub const DEFAULT_SQL_LIMIT: u32 = 500;

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A saved SQL view as the server stores it.
///
/// `model`, `variable` and the role auth fields are JSON documents encoded
/// as strings. `View::default()` is the empty sentinel used while nothing
/// is being edited.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct View {
    pub id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sql: String,
    #[serde(deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(deserialize_with = "null_as_default")]
    pub variable: String,
    #[serde(deserialize_with = "null_as_default")]
    pub roles: Vec<ViewRoleRaw>,
    #[serde(deserialize_with = "null_as_default")]
    pub config: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub project_id: Option<i64>,
    pub source_id: Option<i64>,
}

/// Role restriction with its column and row rules still encoded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewRoleRaw {
    pub role_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub column_auth: String,
    #[serde(deserialize_with = "null_as_default")]
    pub row_auth: String,
}

/// Role restriction with decoded column and row rules.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewRole {
    pub role_id: i64,
    /// Columns hidden from members of the role.
    pub column_auth: Vec<String>,
    pub row_auth: Vec<RowAuth>,
}

/// Per-variable row filter attached to a role.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RowAuth {
    pub name: String,
    pub values: Vec<Value>,
    pub enable: bool,
    /// Keys this crate does not model, kept for the round trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// How a column participates in a chart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModelType {
    #[default]
    Category,
    Value,
    /// Written by a newer client; carried through unchanged.
    #[serde(untagged)]
    Other(String),
}

/// How a column is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisualType {
    #[default]
    String,
    Number,
    Date,
    GeoCountry,
    GeoProvince,
    GeoCity,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelItem {
    pub sql_type: String,
    pub visual_type: VisualType,
    pub model_type: ModelType,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Column name -> model entry.
pub type ViewModel = BTreeMap<String, ModelItem>;

/// Query or authorization variable referenced from the view SQL.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewVariable {
    pub key: String,
    pub name: String,
    pub alias: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value_type: String,
    pub udf: bool,
    pub default_values: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Structured decomposition of the view being edited.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewInfo {
    pub model: ViewModel,
    pub variable: Vec<ViewVariable>,
    pub roles: Vec<ViewRole>,
}

/// A view whose encoded sub-fields have been decoded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormedView {
    pub id: Option<i64>,
    pub name: String,
    pub sql: String,
    pub model: ViewModel,
    pub variable: Vec<ViewVariable>,
    pub roles: Vec<ViewRole>,
    pub config: String,
    pub description: String,
    pub project_id: Option<i64>,
    pub source_id: Option<i64>,
}

/// View shape embedded in widget, dashboard and display detail responses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbeddedView {
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sql: String,
    #[serde(deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(deserialize_with = "null_as_default")]
    pub variable: String,
    #[serde(deserialize_with = "null_as_default")]
    pub config: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub project_id: Option<i64>,
    pub source_id: Option<i64>,
}

/// Row of the view list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub source_name: Option<String>,
}

impl From<&View> for ViewSummary {
    fn from(view: &View) -> Self {
        Self {
            id: view.id.unwrap_or_default(),
            name: view.name.clone(),
            description: view.description.clone(),
            source_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceTable {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Column as reported by the database.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SqlColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub sql_type: String,
}

impl SqlColumn {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableColumns {
    pub table_name: String,
    pub columns: Vec<SqlColumn>,
}

/// Last validation or execution outcome reported by the server.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SqlValidation {
    pub code: Option<i64>,
    pub message: Option<String>,
}

/// Result set of the last SQL preview.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SqlDataSource {
    pub columns: Vec<SqlColumn>,
    pub total_count: u64,
    pub result_list: Vec<Map<String, Value>>,
}

/// Independent in-flight flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Loading {
    pub view: bool,
    pub table: bool,
    pub modal: bool,
    pub execute: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_parses_camel_case_payload() {
        let view: View = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "orders",
            "sql": "select * from orders",
            "model": "{}",
            "variable": "[]",
            "roles": [{"roleId": 1, "columnAuth": "[\"a\"]", "rowAuth": ""}],
            "projectId": 3,
            "sourceId": 4
        }))
        .unwrap();

        assert_eq!(view.id, Some(7));
        assert_eq!(view.project_id, Some(3));
        assert_eq!(view.roles[0].column_auth, "[\"a\"]");
        assert!(view.config.is_empty());
    }

    #[test]
    fn empty_sentinel_has_no_identity() {
        let view = View::default();
        assert_eq!(view.id, None);
        assert!(view.roles.is_empty());
        assert!(view.model.is_empty());
    }

    #[test]
    fn model_item_uses_web_enum_names() {
        let item = ModelItem {
            sql_type: "VARCHAR".into(),
            visual_type: VisualType::GeoProvince,
            model_type: ModelType::Category,
            ..ModelItem::default()
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["visualType"], "geoProvince");
        assert_eq!(json["modelType"], "category");
        assert_eq!(json["sqlType"], "VARCHAR");
    }

    #[test]
    fn null_encoded_fields_read_as_empty() {
        let view: View = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": null,
            "model": null,
            "variable": null,
            "config": null,
            "description": null,
            "roles": [{"roleId": 1, "columnAuth": null, "rowAuth": null}]
        }))
        .unwrap();

        assert!(view.model.is_empty());
        assert!(view.variable.is_empty());
        assert!(view.config.is_empty());
        assert!(view.description.is_empty());
        assert!(view.roles[0].column_auth.is_empty());
        assert!(view.roles[0].row_auth.is_empty());
    }

    #[test]
    fn null_roles_read_as_empty() {
        let view: View =
            serde_json::from_value(serde_json::json!({"id": 1, "roles": null})).unwrap();
        assert!(view.roles.is_empty());

        let embedded: EmbeddedView = serde_json::from_value(
            serde_json::json!({"id": 2, "model": null, "variable": null, "sql": null}),
        )
        .unwrap();
        assert_eq!(embedded.id, 2);
        assert!(embedded.model.is_empty());
    }

    #[test]
    fn unknown_visual_type_survives_round_trip() {
        let item: ModelItem = serde_json::from_value(serde_json::json!({
            "sqlType": "VARCHAR",
            "visualType": "geoArea",
            "modelType": "category",
            "alias": "Area"
        }))
        .unwrap();
        assert_eq!(item.visual_type, VisualType::Other("geoArea".into()));
        assert_eq!(item.extra["alias"], "Area");

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["visualType"], "geoArea");
        assert_eq!(json["alias"], "Area");
    }

    #[test]
    fn variable_keeps_unmodelled_keys() {
        let variable: ViewVariable = serde_json::from_value(serde_json::json!({
            "key": "k",
            "name": "region",
            "type": "query",
            "valueType": "string",
            "fromService": true,
            "channel": {"bizId": 3}
        }))
        .unwrap();
        assert_eq!(variable.kind, "query");

        let json = serde_json::to_value(&variable).unwrap();
        assert_eq!(json["fromService"], true);
        assert_eq!(json["channel"]["bizId"], 3);
        assert_eq!(json["valueType"], "string");
    }

    #[test]
    fn summary_from_view_keeps_identity() {
        let view = View {
            id: Some(9),
            name: "sales".into(),
            ..View::default()
        };
        let summary = ViewSummary::from(&view);
        assert_eq!(summary.id, 9);
        assert_eq!(summary.name, "sales");
    }
}
