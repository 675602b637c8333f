//! Table commands: `tables`, `schema` and `data`.

use super::helpers::{display_value, TablesResult};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use loopstudio_connectors::{Connector, TableRef};
use owo_colors::OwoColorize;

/// List every `workspace/table` the credential can see.
pub async fn tables(connector: &Connector, format: OutputFormat) -> Result<()> {
    let options = connector.table_options().await?;
    let tables: Vec<String> = options.iter().map(ToString::to_string).collect();

    if format.is_machine_readable() {
        return output::print_success(format, TablesResult { tables });
    }

    if tables.is_empty() {
        println!("{}", "No tables found.".yellow());
    }
    for table in &tables {
        println!("{}", table);
    }
    Ok(())
}

pub async fn schema(connector: &Connector, table: &str, format: OutputFormat) -> Result<()> {
    let table = TableRef::parse(table)?;
    let response = connector.get_schema(&table).await?;

    if format.is_machine_readable() {
        return output::print_success(format, response);
    }

    println!("{} {}", "Schema of".bold().cyan(), table.to_string().bold());
    println!(
        "{:<6} {:<32} {:<10} {}",
        "ID".dimmed(),
        "LABEL".dimmed(),
        "CONCEPT".dimmed(),
        "TYPE".dimmed()
    );
    for field in &response.schema {
        println!(
            "{:<6} {:<32} {:<10} {}",
            field.name, field.label, field.semantics.concept_type, field.semantics.semantic_type
        );
    }
    Ok(())
}

/// Print all rows of `table`. An empty `fields` list selects every field.
pub async fn data(
    connector: &Connector,
    table: &str,
    fields: &[String],
    format: OutputFormat,
) -> Result<()> {
    let table = TableRef::parse(table)?;
    let response = connector.get_data(&table, fields).await?;

    if format.is_machine_readable() {
        return output::print_success(format, response);
    }

    let header: Vec<&str> = response.schema.iter().map(|f| f.label.as_str()).collect();
    println!("{}", header.join("\t").bold());
    for row in &response.rows {
        let cells: Vec<String> = row.values.iter().map(display_value).collect();
        println!("{}", cells.join("\t"));
    }
    eprintln!("{} {} rows", "Fetched".green(), response.rows.len());
    Ok(())
}
