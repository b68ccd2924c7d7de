use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use super::{ensure_parent_dir, get_config_path, validate_config, Config};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Keep asking until `parse` accepts the input.
fn prompt_until<T>(message: &str, default: &str, parse: impl Fn(&str) -> Result<T, String>) -> Result<T> {
    loop {
        let input = prompt_with_default(message, default)?;
        match parse(&input) {
            Ok(v) => return Ok(v),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

fn parse_duration_str(s: &str) -> Result<String, String> {
    humantime::parse_duration(s)
        .map(|_| s.to_string())
        .map_err(|e| e.to_string())
}

/// Serialize `config` as YAML and write it atomically.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    ensure_parent_dir(path)?;

    let yaml = serde_saphyr::to_string(config).context("Failed to serialize config")?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    Ok(())
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    let path = default_path.unwrap_or_else(get_config_path);

    println!();
    println!("landslide-risk configuration");
    println!("============================");
    println!();

    if path.exists() && !prompt_yes_no(&format!("{} exists. Overwrite?", path.display()), false)? {
        println!("Keeping existing config.");
        return Ok(());
    }

    let mut config = Config::default();

    if prompt_yes_no("Customize settings? (n accepts defaults)", false)? {
        println!();
        println!("Upstream calls give up after this long and fall back to default values.");
        config.sources.timeout =
            prompt_until("Request timeout", &config.sources.timeout, parse_duration_str)?;
        config.sources.retries = prompt_until(
            "Retries per upstream call",
            &config.sources.retries.to_string(),
            |s| s.parse::<usize>().map_err(|e| e.to_string()),
        )?;

        println!();
        config.server.host = prompt_with_default("Server host", &config.server.host)?;
        config.server.port = prompt_until("Server port", &config.server.port.to_string(), |s| {
            match s.parse::<u16>() {
                Ok(0) => Err("port must be non-zero".to_string()),
                Ok(p) => Ok(p),
                Err(e) => Err(e.to_string()),
            }
        })?;

        println!();
        println!("Predictions are cached per rounded coordinate and rainfall override.");
        config.cache.enabled = prompt_yes_no("Enable prediction cache?", true)?;
        if config.cache.enabled {
            config.cache.ttl = prompt_until("Cache freshness", &config.cache.ttl, parse_duration_str)?;
        }
    }

    if let Err(errors) = validate_config(&config) {
        anyhow::bail!("Generated config is invalid: {}", errors.join("; "));
    }

    write_config(&path, &config)?;
    println!();
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use std::env;

    #[test]
    fn test_write_config_then_load() {
        let path = env::temp_dir()
            .join("landslide_risk_test_init")
            .join("config.yaml");
        let _ = std::fs::remove_file(&path);

        let mut config = Config::default();
        config.server.port = 9090;
        config.cache.ttl = "1h".to_string();
        write_config(&path, &config).unwrap();

        let loaded = load_config(Some(path.clone())).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_parse_duration_str() {
        assert_eq!(parse_duration_str("30s").unwrap(), "30s");
        assert!(parse_duration_str("later").is_err());
    }
}
