use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};

pub const PROMPT_DIR_NAME: &str = "claude-prompts";
pub const PROMPT_FILE_NAME: &str = "claude-prompt.txt";
pub const ALLOWED_TOOLS_ENV: &str = "ALLOWED_TOOLS";
pub const DISALLOWED_TOOLS_ENV: &str = "DISALLOWED_TOOLS";

pub fn prompt_path_for_runner_temp(runner_temp: &Path) -> PathBuf {
    runner_temp.join(PROMPT_DIR_NAME).join(PROMPT_FILE_NAME)
}

/// Stages the document beside its final location and renames it into place.
///
/// A leftover staging file is removed when the rename fails.
pub fn write_prompt_document(prompt_path: &Path, document: &str) -> Result<()> {
    let Some(file_name) = prompt_path.file_name().and_then(|name| name.to_str()) else {
        bail!(
            "prompt path '{}' does not name a file",
            prompt_path.display()
        );
    };
    if prompt_path.is_dir() {
        bail!("prompt path '{}' is a directory", prompt_path.display());
    }
    let prompt_dir = match prompt_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(prompt_dir)
        .with_context(|| format!("failed to create prompt directory {}", prompt_dir.display()))?;

    let staging_path = prompt_dir.join(format!("{file_name}.partial-{}", std::process::id()));
    std::fs::write(&staging_path, document)
        .with_context(|| format!("failed to stage prompt at {}", staging_path.display()))?;
    if let Err(error) = std::fs::rename(&staging_path, prompt_path) {
        let _ = std::fs::remove_file(&staging_path);
        return Err(error).with_context(|| {
            format!("failed to move staged prompt into {}", prompt_path.display())
        });
    }
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Renders one `NAME<<DELIMITER` block for a workflow environment file.
pub fn render_github_env_entry(name: &str, value: &str) -> Result<String> {
    if name.is_empty() || name.contains(['=', '\n']) {
        bail!("invalid environment variable name '{name}'");
    }
    let digest = sha256_hex(format!("{name}\n{value}").as_bytes());
    let delimiter = format!("ghadelimiter_{}", &digest[..32]);
    if value.contains(&delimiter) {
        bail!("value for {name} contains its own delimiter");
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

/// Appends the variables to the workflow environment file, or prints them when no file is set.
pub fn export_github_env(github_env: Option<&Path>, variables: &[(&str, &str)]) -> Result<()> {
    let Some(github_env) = github_env.filter(|path| !path.as_os_str().is_empty()) else {
        for (name, value) in variables {
            println!("{name}={value}");
        }
        return Ok(());
    };

    let mut rendered = String::new();
    for (name, value) in variables {
        rendered.push_str(&render_github_env_entry(name, value)?);
    }
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(github_env)
        .with_context(|| format!("failed to open {}", github_env.display()))?;
    file.write_all(rendered.as_bytes())
        .with_context(|| format!("failed to append to {}", github_env.display()))?;
    Ok(())
}
