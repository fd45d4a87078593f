use crate::output::{print_choice, print_json};
use anyhow::Context;
use std::path::Path;
use wotrack_core::desk::Desk;

pub fn run(root: &Path, query: &str, json: bool) -> anyhow::Result<()> {
    let desk = Desk::open(root).context("failed to open work order store")?;
    let form = desk.lookup(query).context("failed to load work orders")?;

    let Some(form) = form else {
        if json {
            print_json(&serde_json::json!({ "query": query, "found": false }))?;
        } else {
            println!("Work order '{}' not found.", query.trim());
        }
        return Ok(());
    };

    if json {
        print_json(&serde_json::json!({ "query": query, "found": true, "form": form }))?;
        return Ok(());
    }

    let fields = &desk.config().fields;
    let key = form.record.get(&fields.key).unwrap_or("");
    println!("Work order #{key} (row {})", form.index + 1);
    for column in &fields.display {
        println!("  {column}: {}", form.record.get(column).unwrap_or("-"));
    }
    println!(
        "  Current status: {}",
        form.record.get(&fields.status).unwrap_or("-")
    );
    println!();
    print_choice("Status", &form.status.options, form.status.index);
    print_choice("Assigned to", &form.assignee.options, form.assignee.index);
    Ok(())
}
