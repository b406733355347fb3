//! `provkit list` and `provkit show`.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::config::targets::{InstallTarget, Origin, load_catalog};

#[derive(Serialize)]
struct ListRow<'a> {
    name: &'a str,
    origin: Origin,
    description: &'a str,
    archive_url: &'a str,
}

pub fn run(targets_file: Option<&Path>, json: bool) -> Result<()> {
    let catalog = load_catalog(targets_file)?;

    if json {
        let rows: Vec<ListRow> = catalog
            .iter()
            .map(|e| ListRow {
                name: &e.target.name,
                origin: e.origin,
                description: &e.target.description,
                archive_url: &e.target.archive_url,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let name_w = catalog.iter().map(|e| e.target.name.len()).max().unwrap_or(0);
    for e in catalog.iter() {
        let desc = if e.target.description.is_empty() {
            "-"
        } else {
            e.target.description.as_str()
        };
        println!(
            "  {:<width$}  {:<8}  {}",
            e.target.name,
            e.origin.to_string(),
            desc,
            width = name_w
        );
    }
    Ok(())
}

pub fn show(name: &str, targets_file: Option<&Path>, json: bool) -> Result<()> {
    let catalog = load_catalog(targets_file)?;
    let entry = catalog.get(name)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry.target)?);
        return Ok(());
    }
    print!("{}", render(&entry.target, entry.origin));
    Ok(())
}

fn render(t: &InstallTarget, origin: Origin) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} ({})\n", t.name, origin));
    if !t.description.is_empty() {
        out.push_str(&format!("  {}\n", t.description));
    }
    out.push_str(&format!("  archive:   {}\n", t.archive_url));
    out.push_str(&format!("  extracts:  {}\n", t.expected_dir));
    if t.needs_relocation() {
        out.push_str(&format!("  rename to: {}\n", t.final_dir()));
    }
    if !t.steps.is_empty() {
        out.push_str("  steps:\n");
        for (i, step) in t.steps.iter().enumerate() {
            out.push_str(&format!("    {}. {}: {}\n", i + 1, step.name, step.describe()));
        }
    }
    if !t.credentials.is_empty() {
        out.push_str("  credentials:\n");
        for c in &t.credentials {
            out.push_str(&format!("    {} -> {}\n", c.source, c.destination));
        }
    }
    out
}
