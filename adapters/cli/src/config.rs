use std::{fs, path::Path};

use anyhow::{Context, Result};
use tower_defense_session::SessionConfig;

/// Reads a session configuration from a TOML file.
pub(crate) fn load_config(path: &Path) -> Result<SessionConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read session config at {}", path.display()))?;
    parse_config(&contents)
        .with_context(|| format!("failed to load session config from {}", path.display()))
}

fn parse_config(contents: &str) -> Result<SessionConfig> {
    toml::from_str(contents).context("failed to parse session config toml contents")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_defense_session::WaveConfig;

    #[test]
    fn empty_file_yields_stock_configuration() {
        let config = parse_config("").expect("empty config parses");
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let config = parse_config(
            r#"
starting_money = 500
rng_seed = 42

[map]
tile_size = 50
waypoints = [[0.0, 25.0], [500.0, 25.0]]

[[waves]]
enemies = [["basic", 4], ["tank", 1]]
spawn_delay = 25
"#,
        )
        .expect("config parses");

        assert_eq!(config.starting_money, 500);
        assert_eq!(config.starting_lives, 20);
        assert_eq!(config.rng_seed, 42);
        assert_eq!(config.map.width, 1000);
        assert_eq!(config.map.tile_size, 50);
        assert_eq!(config.map.waypoints, vec![(0.0, 25.0), (500.0, 25.0)]);
        assert_eq!(
            config.waves,
            Some(vec![WaveConfig {
                enemies: vec![("basic".to_owned(), 4), ("tank".to_owned(), 1)],
                spawn_delay: 25,
            }])
        );
    }

    #[test]
    fn malformed_file_is_reported() {
        let error = parse_config("starting_money = \"lots\"").expect_err("wrong type");
        assert!(error
            .to_string()
            .contains("failed to parse session config toml contents"));
    }
}
