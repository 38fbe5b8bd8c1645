//! Simulator configuration.

use pact_state::ContractParams;

use crate::cli::Cli;
use crate::scenario::Scenario;

/// Complete simulator configuration.
#[derive(Debug, Clone, Default)]
pub struct SimConfig {
    /// Player count override.
    pub players_per_game: Option<u8>,

    /// Stall window override.
    pub stall_window: Option<u64>,

    /// Start from devnet parameters.
    pub devnet: bool,

    /// Emit JSON instead of colored text.
    pub json: bool,

    /// Log level.
    pub log_level: String,
}

impl SimConfig {
    /// Create a simulator configuration from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            players_per_game: cli.players_per_game,
            stall_window: cli.stall_window,
            devnet: cli.devnet,
            json: cli.json,
            log_level: cli.log_level.clone(),
        }
    }

    /// Contract parameters for `scenario`.
    ///
    /// Command-line overrides win over the scenario's own settings, which
    /// win over the (devnet) defaults.
    pub fn params_for(&self, scenario: &Scenario) -> ContractParams {
        let mut params = if self.devnet || scenario.devnet {
            ContractParams::devnet()
        } else {
            ContractParams::default()
        };

        if let Some(players) = self.players_per_game.or(scenario.players_per_game) {
            params = params.with_players_per_game(players);
        }
        if let Some(window) = self.stall_window.or(scenario.stall_window) {
            params = params.with_stall_window(window);
        }
        params
    }

    /// Check if devnet mode is enabled.
    pub fn is_devnet(&self) -> bool {
        self.devnet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pact_state::{DEFAULT_GAME_STALL_WINDOW, DEVNET_GAME_STALL_WINDOW};

    fn scenario(json: &str) -> Scenario {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        let params = config.params_for(&scenario(r#"{"name": "empty", "steps": []}"#));
        assert_eq!(params, ContractParams::default());
        assert_eq!(params.game_stall_window, DEFAULT_GAME_STALL_WINDOW);
        assert!(!config.is_devnet());
    }

    #[test]
    fn test_devnet_config() {
        let config = SimConfig {
            devnet: true,
            ..SimConfig::default()
        };
        let params = config.params_for(&scenario(r#"{"name": "empty", "steps": []}"#));
        assert_eq!(params.game_stall_window, DEVNET_GAME_STALL_WINDOW);
    }

    #[test]
    fn test_cli_overrides_scenario() {
        let s = scenario(
            r#"{"name": "three", "players_per_game": 3, "stall_window": 30, "steps": []}"#,
        );

        let params = SimConfig::default().params_for(&s);
        assert_eq!(params.players_per_game, 3);
        assert_eq!(params.game_stall_window, 30);

        let config = SimConfig {
            players_per_game: Some(4),
            ..SimConfig::default()
        };
        let params = config.params_for(&s);
        assert_eq!(params.players_per_game, 4);
        assert_eq!(params.game_stall_window, 30);
    }

    #[test]
    fn test_player_floor() {
        let config = SimConfig {
            players_per_game: Some(1),
            ..SimConfig::default()
        };
        let params = config.params_for(&scenario(r#"{"name": "x", "steps": []}"#));
        assert_eq!(params.players_per_game, 2);
    }
}
