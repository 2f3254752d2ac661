//! CSV rendering of the employee directory.

use std::collections::HashMap;

use entity::employee;
use uuid::Uuid;

pub const CSV_COLUMNS: [&str; 9] = [
    "Name",
    "Title",
    "Department",
    "Email",
    "Phone",
    "Hire Date",
    "Salary",
    "Status",
    "Manager",
];

/// Render the directory as CSV, header row first, one row per
/// employee in input order. Text fields are always double-quoted with
/// embedded quotes doubled; salary stays bare. The manager column is
/// the manager's name resolved from the same slice, empty when the
/// employee has none.
pub fn employees_csv(employees: &[employee::Model]) -> String {
    let names: HashMap<Uuid, &str> = employees
        .iter()
        .map(|e| (e.id, e.name.as_str()))
        .collect();

    let mut lines = Vec::with_capacity(employees.len() + 1);
    lines.push(CSV_COLUMNS.join(","));
    for e in employees {
        let manager = e
            .manager_id
            .and_then(|id| names.get(&id).copied())
            .unwrap_or("");
        let row = [
            quote(&e.name),
            quote(&e.title),
            quote(&e.department),
            quote(&e.email),
            quote(e.phone.as_deref().unwrap_or("")),
            quote(&e.hire_date.format("%Y-%m-%d").to_string()),
            e.salary.to_string(),
            quote(e.status.as_str()),
            quote(manager),
        ];
        lines.push(row.join(","));
    }
    lines.join("\n")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
