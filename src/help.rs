//! Command reference for provkit.

use anyhow::Result;

const COMMANDS: &[(&str, &str)] = &[
    ("install TARGET", "Fetch, extract and set up a target"),
    ("install TARGET --refresh", "Re-download the archive before installing"),
    ("install TARGET --work-dir DIR", "Install into DIR instead of the current directory"),
    ("list [--json]", "List known targets"),
    ("show TARGET [--json]", "Show a target's archive, steps and credentials"),
    ("clean TARGET [--work-dir DIR]", "Remove cached archive and extracted directories"),
    ("help [FILTER]", "Show this reference"),
];

const ENV_VARS: &[(&str, &str)] = &[
    ("PROVKIT_TARGETS", "Extra targets.toml (same as --targets)"),
    ("PROVKIT_LOG", "Log filter, e.g. provkit=debug"),
];

pub fn run(filter: Option<&str>) -> Result<()> {
    if let Some(filter) = filter {
        let matches: Vec<(&str, &str)> = COMMANDS
            .iter()
            .chain(ENV_VARS.iter())
            .filter(|(name, _)| name.contains(filter))
            .copied()
            .collect();
        if matches.is_empty() {
            println!("No command matching '{}'", filter);
            std::process::exit(1);
        }
        print_table(&matches);
        return Ok(());
    }

    println!("provkit commands\n");
    print_table(COMMANDS);

    println!("\nenvironment\n");
    print_table(ENV_VARS);

    Ok(())
}

fn print_table(rows: &[(&str, &str)]) {
    let name_w = rows.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    for (name, desc) in rows {
        println!("  {:<width$}  {}", name, desc, width = name_w);
    }
}
