//! Decoding of the JSON documents a view stores as strings.
//!
//! An empty document, or a literal `null`, decodes to the field's default
//! (`{}` for the model, `[]` for everything else). Documents are decoded
//! entry by entry: strict decoding reports the first malformed document or
//! entry, lenient decoding drops just that entry (or defaults a document
//! that is not JSON at all) and logs a warning.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::view::types::{EmbeddedView, FormedView, View, ViewInfo, ViewModel, ViewRole, ViewRoleRaw};

/// Encoded field of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodedField {
    Model,
    Variable,
    ColumnAuth { role_id: i64 },
    RowAuth { role_id: i64 },
}

impl fmt::Display for EncodedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodedField::Model => write!(f, "model"),
            EncodedField::Variable => write!(f, "variable"),
            EncodedField::ColumnAuth { role_id } => write!(f, "roles[{role_id}].columnAuth"),
            EncodedField::RowAuth { role_id } => write!(f, "roles[{role_id}].rowAuth"),
        }
    }
}

/// A stored document, or one entry of it, could not be decoded.
#[derive(Debug, Error)]
#[error(
    "Failed to decode {field}{} of view {}: {source}",
    entry_label(.entry),
    view_label(.view_id)
)]
pub struct DecodeError {
    pub view_id: Option<i64>,
    pub field: EncodedField,
    /// Model column name or array index; `None` when the whole document is bad.
    pub entry: Option<String>,
    #[source]
    pub source: serde_json::Error,
}

fn view_label(view_id: &Option<i64>) -> String {
    match view_id {
        Some(id) => id.to_string(),
        None => "<unsaved>".to_string(),
    }
}

fn entry_label(entry: &Option<String>) -> String {
    match entry {
        Some(entry) => format!(" entry '{entry}'"),
        None => String::new(),
    }
}

fn document_or_default<T: DeserializeOwned + Default>(raw: &str) -> serde_json::Result<T> {
    if raw.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str::<Option<T>>(raw)?.unwrap_or_default())
}

/// How malformed documents and entries are treated.
trait Policy {
    /// A document that is not valid JSON of the expected shape.
    fn document<T: Default>(
        view_id: Option<i64>,
        field: EncodedField,
        decoded: serde_json::Result<T>,
    ) -> Result<T, DecodeError>;

    /// One entry of a document. `Ok(None)` drops the entry.
    fn entry<T>(
        view_id: Option<i64>,
        field: EncodedField,
        entry: String,
        decoded: serde_json::Result<T>,
    ) -> Result<Option<T>, DecodeError>;
}

struct Strict;

impl Policy for Strict {
    fn document<T: Default>(
        view_id: Option<i64>,
        field: EncodedField,
        decoded: serde_json::Result<T>,
    ) -> Result<T, DecodeError> {
        decoded.map_err(|source| DecodeError {
            view_id,
            field,
            entry: None,
            source,
        })
    }

    fn entry<T>(
        view_id: Option<i64>,
        field: EncodedField,
        entry: String,
        decoded: serde_json::Result<T>,
    ) -> Result<Option<T>, DecodeError> {
        decoded.map(Some).map_err(|source| DecodeError {
            view_id,
            field,
            entry: Some(entry),
            source,
        })
    }
}

struct Lenient;

impl Policy for Lenient {
    fn document<T: Default>(
        view_id: Option<i64>,
        field: EncodedField,
        decoded: serde_json::Result<T>,
    ) -> Result<T, DecodeError> {
        Ok(decoded.unwrap_or_else(|source| {
            tracing::warn!(
                view_id = ?view_id,
                field = %field,
                error = %source,
                "Malformed view document, using default"
            );
            T::default()
        }))
    }

    fn entry<T>(
        view_id: Option<i64>,
        field: EncodedField,
        entry: String,
        decoded: serde_json::Result<T>,
    ) -> Result<Option<T>, DecodeError> {
        match decoded {
            Ok(value) => Ok(Some(value)),
            Err(source) => {
                tracing::warn!(
                    view_id = ?view_id,
                    field = %field,
                    entry = %entry,
                    error = %source,
                    "Malformed view document entry, dropping it"
                );
                Ok(None)
            }
        }
    }
}

fn model_with<P: Policy>(view_id: Option<i64>, raw: &str) -> Result<ViewModel, DecodeError> {
    let field = EncodedField::Model;
    let document: Map<String, Value> = P::document(view_id, field, document_or_default(raw))?;

    let mut model = ViewModel::new();
    for (column, value) in document {
        let decoded = serde_json::from_value(value);
        if let Some(item) = P::entry(view_id, field, column.clone(), decoded)? {
            model.insert(column, item);
        }
    }
    Ok(model)
}

fn list_with<P: Policy, T: DeserializeOwned>(
    view_id: Option<i64>,
    field: EncodedField,
    raw: &str,
) -> Result<Vec<T>, DecodeError> {
    let document: Vec<Value> = P::document(view_id, field, document_or_default(raw))?;

    let mut entries = Vec::with_capacity(document.len());
    for (index, value) in document.into_iter().enumerate() {
        let decoded = serde_json::from_value(value);
        if let Some(entry) = P::entry(view_id, field, index.to_string(), decoded)? {
            entries.push(entry);
        }
    }
    Ok(entries)
}

fn roles_with<P: Policy>(
    view_id: Option<i64>,
    roles: &[ViewRoleRaw],
) -> Result<Vec<ViewRole>, DecodeError> {
    roles
        .iter()
        .map(|role| {
            let role_id = role.role_id;
            Ok(ViewRole {
                role_id,
                column_auth: list_with::<P, _>(
                    view_id,
                    EncodedField::ColumnAuth { role_id },
                    &role.column_auth,
                )?,
                row_auth: list_with::<P, _>(
                    view_id,
                    EncodedField::RowAuth { role_id },
                    &role.row_auth,
                )?,
            })
        })
        .collect()
}

fn view_with<P: Policy>(view: &View) -> Result<FormedView, DecodeError> {
    Ok(FormedView {
        id: view.id,
        name: view.name.clone(),
        sql: view.sql.clone(),
        model: model_with::<P>(view.id, &view.model)?,
        variable: list_with::<P, _>(view.id, EncodedField::Variable, &view.variable)?,
        roles: roles_with::<P>(view.id, &view.roles)?,
        config: view.config.clone(),
        description: view.description.clone(),
        project_id: view.project_id,
        source_id: view.source_id,
    })
}

fn embedded_with<P: Policy>(view: &EmbeddedView) -> Result<FormedView, DecodeError> {
    let id = Some(view.id);
    Ok(FormedView {
        id,
        name: view.name.clone(),
        sql: view.sql.clone(),
        model: model_with::<P>(id, &view.model)?,
        variable: list_with::<P, _>(id, EncodedField::Variable, &view.variable)?,
        roles: Vec::new(),
        config: view.config.clone(),
        description: view.description.clone(),
        project_id: view.project_id,
        source_id: view.source_id,
    })
}

/// Collapse the result of a lenient decode, which never fails.
fn infallible(result: Result<FormedView, DecodeError>) -> FormedView {
    result.unwrap_or_default()
}

impl FormedView {
    /// Decode model, variables and role rules, failing on the first malformed
    /// document or entry.
    pub fn try_from_view(view: &View) -> Result<Self, DecodeError> {
        view_with::<Strict>(view)
    }

    /// Decode model, variables and role rules, dropping malformed entries.
    pub fn from_view_lenient(view: &View) -> Self {
        infallible(view_with::<Lenient>(view))
    }

    /// Decode model and variables of an embedded view. Roles are not
    /// carried by embedded views and stay empty.
    pub fn try_from_embedded(view: &EmbeddedView) -> Result<Self, DecodeError> {
        embedded_with::<Strict>(view)
    }

    pub fn from_embedded_lenient(view: &EmbeddedView) -> Self {
        infallible(embedded_with::<Lenient>(view))
    }

    /// The `{model, variable, roles}` triple.
    pub fn info(&self) -> ViewInfo {
        ViewInfo {
            model: self.model.clone(),
            variable: self.variable.clone(),
            roles: self.roles.clone(),
        }
    }
}
