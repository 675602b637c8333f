//! Mapping from remote column types to the host's field vocabulary.
//!
//! | Declared type | Role | Scalar type |
//! |---------------|------|-------------|
//! | `number` | Metric | Number |
//! | `string` | Dimension | Text |
//! | `boolean` | Dimension | Boolean |
//! | `date` | Dimension | DateTimeSecondPrecision |
//! | `null` | Dimension | Text |
//!
//! Only numbers aggregate. Anything else is rejected rather than defaulted, since a silently
//! mistyped field corrupts aggregation in the host.

use crate::remote::ColumnType;
use loopstudio_error::{Result, StudioError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldRole {
    Dimension,
    Metric,
}

impl FieldRole {
    /// The host's `conceptType`.
    pub fn concept_type(&self) -> &'static str {
        match self {
            FieldRole::Dimension => "DIMENSION",
            FieldRole::Metric => "METRIC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    Number,
    Text,
    Boolean,
    /// `YYYYMMDDHHMMSS` in UTC.
    DateTimeSecondPrecision,
}

impl ScalarType {
    /// The host's `semanticType`.
    pub fn semantic_type(&self) -> &'static str {
        match self {
            ScalarType::Number => "NUMBER",
            ScalarType::Text => "TEXT",
            ScalarType::Boolean => "BOOLEAN",
            ScalarType::DateTimeSecondPrecision => "YEAR_MONTH_DAY_SECOND",
        }
    }

    /// The host's wire `dataType`. Date-times travel as strings.
    pub fn data_type(&self) -> &'static str {
        match self {
            ScalarType::Number => "NUMBER",
            ScalarType::Text | ScalarType::DateTimeSecondPrecision => "STRING",
            ScalarType::Boolean => "BOOLEAN",
        }
    }

    pub fn is_date(&self) -> bool {
        matches!(self, ScalarType::DateTimeSecondPrecision)
    }
}

pub fn map_column_type(column_name: &str, declared: &ColumnType) -> Result<(FieldRole, ScalarType)> {
    match declared {
        ColumnType::Number => Ok((FieldRole::Metric, ScalarType::Number)),
        ColumnType::String => Ok((FieldRole::Dimension, ScalarType::Text)),
        ColumnType::Boolean => Ok((FieldRole::Dimension, ScalarType::Boolean)),
        ColumnType::Date => Ok((FieldRole::Dimension, ScalarType::DateTimeSecondPrecision)),
        ColumnType::Null => Ok((FieldRole::Dimension, ScalarType::Text)),
        ColumnType::Other(tag) => Err(StudioError::unsupported_column_type(column_name, tag.as_str())),
    }
}
