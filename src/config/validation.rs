use crate::config::types::{
    BrowserConfig, Config, FetchConfig, OutputConfig, SectionConfig, TargetConfig,
};
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_target_config(&config.target)?;
    validate_fetch_config(&config.fetch)?;
    validate_browser_config(&config.browser)?;
    validate_output_config(&config.output)?;
    validate_section_config(&config.sections)?;
    Ok(())
}

/// Validates the run inputs
fn validate_target_config(config: &TargetConfig) -> Result<(), ConfigError> {
    validate_http_url("url", &config.url)?;
    validate_http_url("base-url", &config.base_url)?;

    if config.link_keyword.is_empty() {
        return Err(ConfigError::Validation(
            "link-keyword cannot be empty".to_string(),
        ));
    }

    validate_output_name(&config.output_name)?;

    Ok(())
}

/// Validates fetch timeouts and identification
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("static-timeout-secs", config.static_timeout_secs),
        ("detail-timeout-secs", config.detail_timeout_secs),
        ("render-timeout-secs", config.render_timeout_secs),
    ] {
        if value < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got {}",
                name, value
            )));
        }
    }

    Ok(())
}

/// Validates the WebDriver endpoint and window geometry
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    Url::parse(&config.webdriver_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid webdriver-url: {}", e)))?;

    parse_window_size(&config.window_size)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.is_empty() {
        return Err(ConfigError::Validation(
            "data-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that the section patterns compile
fn validate_section_config(config: &SectionConfig) -> Result<(), ConfigError> {
    if config.element.is_empty()
        || !config
            .element
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "sections.element must be a plain element name, got '{}'",
            config.element
        )));
    }

    for (name, pattern) in [
        ("eligibility-pattern", &config.eligibility_pattern),
        ("fees-pattern", &config.fees_pattern),
    ] {
        if pattern.is_empty() {
            return Err(ConfigError::InvalidPattern(format!(
                "{} cannot be empty",
                name
            )));
        }
        Regex::new(pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("{}: {}", name, e)))?;
    }

    Ok(())
}

/// Validates an http(s) URL with a host
fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    if !url.has_host() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            name, value
        )));
    }

    Ok(())
}

/// The output name is a bare file name inside the data directory
fn validate_output_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "output-name cannot be empty".to_string(),
        ));
    }

    if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "output-name must be a plain file name, got '{}'",
            name
        )));
    }

    Ok(())
}

/// Parses a "WIDTH,HEIGHT" window size
pub fn parse_window_size(value: &str) -> Result<(u32, u32), ConfigError> {
    let invalid = || {
        ConfigError::Validation(format!(
            "window-size must look like '1920,1080', got '{}'",
            value
        ))
    };

    let (width, height) = value.split_once(',').ok_or_else(invalid)?;
    let width: u32 = width.trim().parse().map_err(|_| invalid())?;
    let height: u32 = height.trim().parse().map_err(|_| invalid())?;

    if width == 0 || height == 0 {
        return Err(invalid());
    }

    Ok((width, height))
}
