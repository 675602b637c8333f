//! Schema discovery: turns a remote table's column list into host fields.

use crate::fields::{Field, Fields};
use crate::remote::{Column, RemoteApi};
use crate::types::map_column_type;
use loopstudio_error::Result;

/// Fetch the table's columns and derive one field per column.
///
/// The column at index `i` becomes field `"{i+1}"`: remote rows reserve key `"0"` for the
/// internal row id. Ids only stay stable while the remote column order does.
pub async fn build_fields(api: &RemoteApi, workspace: &str, table: &str) -> Result<Fields> {
    let schema = api.table_schema(workspace, table).await?;
    let fields = fields_from_columns(&schema.columns)?;

    tracing::debug!(
        workspace,
        table,
        fields = fields.len(),
        "Built field collection"
    );
    Ok(fields)
}

pub fn fields_from_columns(columns: &[Column]) -> Result<Fields> {
    let mut fields = Fields::new();
    for (idx, column) in columns.iter().enumerate() {
        let (role, scalar_type) = map_column_type(&column.name, &column.tpe)?;
        fields.push(Field {
            id: (idx + 1).to_string(),
            name: column.name.clone(),
            role,
            scalar_type,
        })?;
    }
    Ok(fields)
}
