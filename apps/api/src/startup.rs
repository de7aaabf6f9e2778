use anyhow::bail;

use shared_config::AppConfig;

/// Refuses configurations the server cannot serve logins with.
pub fn check_config(config: &AppConfig) -> anyhow::Result<()> {
    if config.session_secret.is_empty() {
        bail!("SESSION_SECRET must be set, sessions cannot be signed without it");
    }
    if !config.is_configured() {
        bail!("application is not fully configured");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        AppConfig::from_lookup(|key| map.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_missing_session_secret_stops_start_up() {
        let err = check_config(&config_from(&[])).unwrap_err();
        assert!(err.to_string().contains("SESSION_SECRET"));
    }

    #[test]
    fn test_configured_secret_passes() {
        let config = config_from(&[("SESSION_SECRET", "s3cret")]);
        assert!(check_config(&config).is_ok());
    }
}
