//! Field registry: the ordered set of fields a table exposes to the host, and its
//! serialized schema descriptor.

use crate::types::{FieldRole, ScalarType};
use loopstudio_error::{find_closest_match, ErrorContext, Result, StudioError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Position-derived key, `"1"` for the first column.
    pub id: String,
    pub name: String,
    pub role: FieldRole,
    pub scalar_type: ScalarType,
}

/// Ordered field collection. Ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    fields: Vec<Field>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_dimension(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        scalar_type: ScalarType,
    ) -> Result<&Field> {
        self.push(Field {
            id: id.into(),
            name: name.into(),
            role: FieldRole::Dimension,
            scalar_type,
        })
    }

    pub fn new_metric(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        scalar_type: ScalarType,
    ) -> Result<&Field> {
        self.push(Field {
            id: id.into(),
            name: name.into(),
            role: FieldRole::Metric,
            scalar_type,
        })
    }

    pub fn push(&mut self, field: Field) -> Result<&Field> {
        if self.get(&field.id).is_some() {
            return Err(StudioError::debug(format!(
                "Field id '{}' declared twice",
                field.id
            )));
        }
        self.fields.push(field);
        Ok(&self.fields[self.fields.len() - 1])
    }

    pub fn get(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.id.clone()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The requested subset, in request order.
    ///
    /// Fails with a user error when an id is not declared, suggesting the closest one, or when
    /// an id is requested twice.
    pub fn for_ids<S: AsRef<str>>(&self, ids: &[S]) -> Result<Fields> {
        let mut selected = Fields::new();
        for id in ids {
            let id = id.as_ref();
            let field = self.get(id).ok_or_else(|| self.unknown_field(id))?;
            if selected.get(id).is_some() {
                return Err(StudioError::user(format!(
                    "Field '{}' is requested more than once",
                    id
                ))
                .with_hint("List each field id once"));
            }
            selected.push(field.clone())?;
        }
        Ok(selected)
    }

    fn unknown_field(&self, id: &str) -> StudioError {
        let available = self.ids();
        let hint = find_closest_match(id, &available);
        let err = StudioError::user(format!("Field '{}' is not defined for this table", id))
            .with_context(ErrorContext::UnknownField {
                field: id.to_string(),
                available_fields: available,
            });
        match hint {
            Some(closest) => err.with_hint(format!("Did you mean '{}'?", closest)),
            None => err.with_hint("Refresh the data source fields"),
        }
    }

    /// Schema descriptor in the host's format.
    pub fn build(&self) -> Vec<FieldDescriptor> {
        self.fields.iter().map(FieldDescriptor::from).collect()
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Field id; the host calls it `name`.
    pub name: String,
    /// Column name shown to the report author.
    pub label: String,
    pub data_type: String,
    pub semantics: Semantics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semantics {
    pub concept_type: String,
    pub semantic_type: String,
}

impl From<&Field> for FieldDescriptor {
    fn from(field: &Field) -> Self {
        Self {
            name: field.id.clone(),
            label: field.name.clone(),
            data_type: field.scalar_type.data_type().to_string(),
            semantics: Semantics {
                concept_type: field.role.concept_type().to_string(),
                semantic_type: field.scalar_type.semantic_type().to_string(),
            },
        }
    }
}
