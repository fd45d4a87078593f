use crate::output::print_json;
use anyhow::Context;
use wotrack_core::{
    config::{Config, StoreConfig},
    io, paths,
    store::FileStore,
};
use std::path::Path;

pub fn run(
    root: &Path,
    sheets_url: Option<&str>,
    name: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let project_name = name.map(str::to_string).unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workorders".to_string())
    });

    if let Some(url) = sheets_url {
        paths::spreadsheet_id(url).context("--sheets-url is not a Google Sheets URL or id")?;
    }

    let dir = paths::wotrack_dir(root);
    io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let config_path = paths::config_path(root);
    let created = !config_path.exists();
    if created {
        let mut cfg = Config::new(&project_name);
        if let Some(url) = sheets_url {
            cfg.store = StoreConfig::google_sheets(url);
        }
        cfg.save(root).context("failed to write config.yaml")?;
    }
    let config = Config::load(root).context("failed to load config")?;

    let mut seeded = Vec::new();
    if config.store == StoreConfig::File {
        let store = FileStore::new(root);
        let fields = &config.fields;
        let mut columns: Vec<&str> = vec![fields.key.as_str()];
        columns.extend(fields.display.iter().map(String::as_str));
        columns.push(fields.status.as_str());
        columns.push(fields.assignee.as_str());

        if store
            .seed(&config.sheets.work_orders, &columns)
            .context("failed to create work order sheet")?
        {
            seeded.push(config.sheets.work_orders.clone());
        }
        if store
            .seed(&config.sheets.roster, &["name"])
            .context("failed to create roster sheet")?
        {
            seeded.push(config.sheets.roster.clone());
        }
    }

    if json {
        print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "config_created": created,
            "store": config.store,
            "seeded_sheets": seeded,
        }))?;
    } else {
        println!("Initializing wotrack in: {}", root.display());
        let verb = if created { "created:" } else { "exists: " };
        println!("  {verb} {}", paths::CONFIG_FILE);
        for sheet in &seeded {
            println!("  created: {}/{sheet}.yaml", paths::SHEETS_DIR);
        }
    }
    Ok(())
}
