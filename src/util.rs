use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

/// Run a command in `cwd` with inherited stdio, printing it first.
///
/// Returns Ok on a zero exit status, Err describing the failure otherwise
/// (including when the program cannot be spawned).
pub fn run_cmd_checked(
    args: &[String],
    cwd: &Path,
    env: &BTreeMap<String, String>,
) -> anyhow::Result<()> {
    let Some((program, rest)) = args.split_first() else {
        anyhow::bail!("empty command");
    };
    let cmd_str = args.join(" ");
    println!("  $ {}", cmd_str);
    tracing::debug!(cwd = %cwd.display(), cmd = %cmd_str, "spawning");
    let status = Command::new(program)
        .args(rest)
        .current_dir(cwd)
        .envs(env)
        .status()
        .map_err(|e| anyhow::anyhow!("could not run '{}': {}", program, e))?;
    if !status.success() {
        match status.code() {
            Some(code) => anyhow::bail!("Command failed (exit {}): {}", code, cmd_str),
            None => anyhow::bail!("Command terminated by signal: {}", cmd_str),
        }
    }
    Ok(())
}

/// Copy a file, or a directory tree recursively, creating parents of `to`.
pub fn copy_path(from: &Path, to: &Path) -> std::io::Result<u64> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if from.is_dir() {
        std::fs::create_dir_all(to)?;
        let mut total = 0;
        for entry in std::fs::read_dir(from)? {
            let entry = entry?;
            total += copy_path(&entry.path(), &to.join(entry.file_name()))?;
        }
        Ok(total)
    } else {
        std::fs::copy(from, to)
    }
}
