use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, params_from_iter};
use serde_json::{Value, json};

use crate::models::StatementRow;
use crate::query::error::QueryError;
use crate::query::projection::ProjectionEntry;

// One optional filter: a SQL fragment with `?` placeholders and the values
// bound to them, in placeholder order. Fragments come from query-layer
// constants only; caller data always rides in `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    fragment: String,
    values: Vec<SqlValue>,
}

impl Predicate {
    #[must_use]
    pub fn new(fragment: impl Into<String>, values: Vec<SqlValue>) -> Self {
        Self {
            fragment: fragment.into(),
            values,
        }
    }

    // Set membership expands to one placeholder per element.
    #[must_use]
    pub fn in_set(column: &str, values: &[String]) -> Self {
        let placeholders = vec!["?"; values.len()].join(", ");
        Self {
            fragment: format!("{column} IN ({placeholders})"),
            values: values
                .iter()
                .map(|value| SqlValue::Text(value.clone()))
                .collect(),
        }
    }

    #[must_use]
    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

#[derive(Debug, Clone)]
pub struct SelectBuilder {
    projection: Vec<ProjectionEntry>,
    table: String,
    predicates: Vec<Predicate>,
    group_by: Option<String>,
    order_by: Option<String>,
}

impl SelectBuilder {
    #[must_use]
    pub fn new(table: impl Into<String>, projection: Vec<ProjectionEntry>) -> Self {
        Self {
            projection,
            table: table.into(),
            predicates: Vec::new(),
            group_by: None,
            order_by: None,
        }
    }

    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    #[must_use]
    pub fn group_by(mut self, expr: impl Into<String>) -> Self {
        self.group_by = Some(expr.into());
        self
    }

    #[must_use]
    pub fn order_by(mut self, expr: impl Into<String>) -> Self {
        self.order_by = Some(expr.into());
        self
    }

    // Fragments are joined only here; bound values stay separate and are
    // handed to the driver in fragment order.
    #[must_use]
    pub fn render(&self) -> (String, Vec<SqlValue>) {
        let select_list = self
            .projection
            .iter()
            .map(ProjectionEntry::render)
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("SELECT {select_list} FROM {}", self.table);

        let mut bound = Vec::new();
        if !self.predicates.is_empty() {
            let clauses = self
                .predicates
                .iter()
                .map(|predicate| format!("({})", predicate.fragment))
                .collect::<Vec<_>>()
                .join(" AND ");
            sql.push_str(" WHERE ");
            sql.push_str(&clauses);
            for predicate in &self.predicates {
                bound.extend(predicate.values.iter().cloned());
            }
        }

        if let Some(group) = &self.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(group);
        }
        if let Some(order) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        (sql, bound)
    }

    pub fn fetch_all(&self, connection: &Connection) -> Result<Vec<StatementRow>, QueryError> {
        let (sql, bound) = self.render();
        let mut statement = connection.prepare(&sql).map_err(QueryError::store_read)?;
        let column_names: Vec<String> = statement
            .column_names()
            .iter()
            .map(ToString::to_string)
            .collect();

        let mut rows = statement
            .query(params_from_iter(bound.iter()))
            .map_err(QueryError::store_read)?;
        let mut result = Vec::new();
        while let Some(row) = rows.next().map_err(QueryError::store_read)? {
            result.push(materialize_row(row, &column_names)?);
        }
        Ok(result)
    }

    // First matching row only; no match materializes as an empty row.
    pub fn fetch_first(&self, connection: &Connection) -> Result<StatementRow, QueryError> {
        let (sql, bound) = self.render();
        let mut statement = connection.prepare(&sql).map_err(QueryError::store_read)?;
        let column_names: Vec<String> = statement
            .column_names()
            .iter()
            .map(ToString::to_string)
            .collect();

        let mut rows = statement
            .query(params_from_iter(bound.iter()))
            .map_err(QueryError::store_read)?;
        match rows.next().map_err(QueryError::store_read)? {
            Some(row) => materialize_row(row, &column_names),
            None => Ok(StatementRow::new()),
        }
    }
}

fn materialize_row(
    row: &rusqlite::Row<'_>,
    column_names: &[String],
) -> Result<StatementRow, QueryError> {
    let mut record = StatementRow::new();
    for (index, column_name) in column_names.iter().enumerate() {
        let value = row
            .get::<usize, SqlValue>(index)
            .map_err(QueryError::store_read)?;
        record.insert(column_name.clone(), json_value_from_sql(value));
    }
    Ok(record)
}

fn json_value_from_sql(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(value) => json!(value),
        SqlValue::Real(value) => json!(value),
        SqlValue::Text(value) => json!(value),
        SqlValue::Blob(value) => json!(encode_blob_hex(&value)),
    }
}

fn encode_blob_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        output.push(HEX[(byte >> 4) as usize] as char);
        output.push(HEX[(byte & 0x0f) as usize] as char);
    }
    output
}
