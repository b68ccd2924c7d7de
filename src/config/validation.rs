use super::schema::Config;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let urls = [
        ("sources.weather_url", &config.sources.weather_url),
        ("sources.soil_url", &config.sources.soil_url),
        ("sources.elevation_url", &config.sources.elevation_url),
    ];
    for (field, url) in urls {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!("{}: '{}' must be an http(s) URL", field, url));
        }
    }

    match config.sources.timeout_duration() {
        Ok(d) if d.is_zero() => errors.push("sources.timeout: must be greater than zero".to_string()),
        Ok(_) => {}
        Err(e) => errors.push(format!(
            "sources.timeout: invalid duration '{}' - {}",
            config.sources.timeout, e
        )),
    }

    if config.server.port == 0 {
        errors.push("server.port: must be between 1 and 65535".to_string());
    }

    if let Err(e) = config.cache.ttl_duration() {
        errors.push(format!("cache.ttl: invalid duration '{}' - {}", config.cache.ttl, e));
    }

    if config.cache.precision > 6 {
        errors.push(format!(
            "cache.precision: {} is finer than 6 decimal places",
            config.cache.precision
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
