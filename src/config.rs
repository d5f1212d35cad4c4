use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Config;

pub fn load_config(path: &Path) -> Result<Config> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let cfg = parse_config(
            r#"
            [server]
            addr = "127.0.0.1:8080"

            [store]
            path = "data/gym.json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.addr, "127.0.0.1:8080");
        assert_eq!(cfg.store.path.as_deref(), Some(Path::new("data/gym.json")));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = load_config(Path::new("/nonexistent/gym-config.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/gym-config.toml"));
    }

    #[test]
    fn test_rejects_bad_toml() {
        assert!(parse_config("[server\naddr = 1").is_err());
    }
}
