//! SQLite table writer.
//!
//! The target table is dropped and recreated inside one transaction, so a
//! failed write leaves the previous table intact.

use super::{ensure_parent, Destination, RecordSet};
use crate::error::{GleanerError, Result};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use serde_json::{Number, Value};
use tracing::debug;

/// Quote an SQL identifier.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Convert a JSON cell to an SQLite value.
pub(crate) fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map_or(SqlValue::Null, SqlValue::Real),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

/// Convert an SQLite value back to JSON.
pub(crate) fn from_sql_value(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::from(i),
        SqlValue::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        SqlValue::Text(s) => Value::String(s),
        SqlValue::Blob(bytes) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

/// Column type inferred from every non-null value in the column.
fn column_type(set: &RecordSet, index: usize) -> &'static str {
    let values = set
        .rows()
        .iter()
        .filter_map(|row| row.get(index))
        .filter(|v| !v.is_null());
    let mut integer = true;
    let mut numeric = true;
    let mut any = false;

    for value in values {
        any = true;
        match value {
            Value::Bool(_) => {}
            Value::Number(n) if n.is_i64() || n.is_u64() => {}
            Value::Number(_) => integer = false,
            _ => {
                integer = false;
                numeric = false;
            }
        }
    }

    match (any, integer, numeric) {
        (false, _, _) => "TEXT",
        (true, true, _) => "INTEGER",
        (true, false, true) => "REAL",
        _ => "TEXT",
    }
}

/// Replace `table_name` in the database with the record set.
pub fn write_table(set: &RecordSet, destination: &Destination) -> Result<String> {
    let table = destination.table_name.as_str();
    if table.trim().is_empty() {
        return Err(GleanerError::InvalidInput("table name is empty".to_string()));
    }
    if set.columns().is_empty() {
        return Err(GleanerError::InvalidInput(
            "records have no fields to store".to_string(),
        ));
    }

    ensure_parent(&destination.db_path)?;
    let mut conn = Connection::open(&destination.db_path)?;

    let columns = set
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{} {}", quote_ident(name), column_type(set, i)))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=set.columns().len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");

    let tx = conn.transaction()?;
    tx.execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)))?;
    tx.execute_batch(&format!("CREATE TABLE {} ({})", quote_ident(table), columns))?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {} VALUES ({})",
            quote_ident(table),
            placeholders
        ))?;
        for row in set.rows() {
            stmt.execute(params_from_iter(row.iter().map(to_sql_value)))?;
        }
    }
    tx.commit()?;

    debug!("Replaced table {} with {} rows", table, set.len());
    Ok(format!(
        "table '{}' in '{}'",
        table,
        destination.db_path.display()
    ))
}
