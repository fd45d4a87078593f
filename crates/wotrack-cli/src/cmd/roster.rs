use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use wotrack_core::desk::Desk;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let desk = Desk::open(root).context("failed to open work order store")?;
    let options = desk.assignee_options();

    if json {
        print_json(&options)?;
    } else {
        for name in &options {
            println!("{name}");
        }
    }
    Ok(())
}
