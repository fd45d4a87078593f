use crate::output::{print_json, print_table};
use anyhow::Context;
use std::path::Path;
use wotrack_core::desk::Desk;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let desk = Desk::open(root).context("failed to open work order store")?;
    let rows = desk.active().context("failed to load work orders")?;

    if json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!("No active tasks found (Pending, In progress, or Unassigned).");
        return Ok(());
    }

    let columns = desk.listing_columns();
    let headers: Vec<&str> = columns.iter().map(String::as_str).collect();
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| row.get(c).unwrap_or("").to_string())
                .collect()
        })
        .collect();
    print_table(&headers, table);
    Ok(())
}
