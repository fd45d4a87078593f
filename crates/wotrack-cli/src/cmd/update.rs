use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use wotrack_core::desk::{intent_from_form, Desk};

pub fn run(
    root: &Path,
    query: &str,
    status: Option<String>,
    assigned_to: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    if status.is_none() && assigned_to.is_none() {
        anyhow::bail!("nothing to change: pass --status and/or --assign");
    }

    let desk = Desk::open(root).context("failed to open work order store")?;
    let form = desk
        .lookup(query)
        .context("failed to load work orders")?
        .with_context(|| format!("work order '{}' not found", query.trim()))?;

    let intent = intent_from_form(&form, status, assigned_to);
    let saved = desk
        .save(query, &intent)
        .with_context(|| format!("failed to save work order '{}'", query.trim()))?;

    if json {
        print_json(&saved)?;
    } else {
        let key = saved.record.get(&desk.config().fields.key).unwrap_or("");
        println!(
            "Updated WO #{key}: status '{}', assigned to '{}'",
            intent.status, intent.assigned_to
        );
    }
    Ok(())
}
