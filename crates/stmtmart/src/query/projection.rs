use std::collections::BTreeSet;

use crate::query::error::QueryError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionEntry {
    pub name: String,
    pub expr: String,
}

impl ProjectionEntry {
    #[must_use]
    pub fn render(&self) -> String {
        if self.expr == self.name {
            self.name.clone()
        } else {
            format!("{} AS {}", self.expr, self.name)
        }
    }
}

// Validation happens before any predicate or SQL text exists: a bad field
// list must never reach the store. An empty request projects every live
// column. Caller order is preserved for the fields that were requested.
pub fn resolve_projection(
    columns: &BTreeSet<String>,
    requested: &[String],
    group_keys: &[&str],
) -> Result<Vec<ProjectionEntry>, QueryError> {
    let fields: Vec<String> = if requested.is_empty() {
        columns.iter().cloned().collect()
    } else {
        requested.to_vec()
    };

    let mut entries = Vec::with_capacity(fields.len());
    for field in &fields {
        if !columns.contains(field.as_str()) {
            return Err(QueryError::UnknownField(field.clone()));
        }
        entries.push(ProjectionEntry {
            name: field.clone(),
            expr: field_expr(field, group_keys),
        });
    }
    Ok(entries)
}

// Grouped queries fold each non-key column deterministically by its name
// prefix; MAX is the stable representative for anything without a better
// aggregate. Ungrouped queries project bare columns.
fn field_expr(field: &str, group_keys: &[&str]) -> String {
    if group_keys.is_empty() || group_keys.contains(&field) {
        return field.to_string();
    }

    if field.starts_with("sum_") || field == "exec_count" {
        format!("SUM({field})")
    } else if field.starts_with("max_") {
        format!("MAX({field})")
    } else if field.starts_with("min_") {
        format!("MIN({field})")
    } else if field.starts_with("avg_") {
        format!("AVG({field})")
    } else {
        format!("MAX({field})")
    }
}
