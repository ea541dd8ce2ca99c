//! Front-end configuration loaded from TOML.

use crate::games::tafl::{Player, Variant};
use crate::session::SessionSettings;
use crate::tui::Palette;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration for the board front-end.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct TaflConfig {
    /// Variant started at launch.
    #[serde(default)]
    variant: Variant,

    /// Side on turn when a game starts.
    #[serde(default = "default_first_player")]
    first_player: Player,

    /// Milliseconds a commit may wait for the engine.
    #[serde(default = "default_commit_timeout_ms")]
    commit_timeout_ms: u64,

    /// Log file written while the terminal UI is running.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,

    /// Colors, as names (`"yellow"`, `"darkgray"`) or hex (`"#aabbcc"`).
    #[serde(default)]
    palette: PaletteConfig,
}

#[instrument]
fn default_first_player() -> Player {
    Player::Black
}

#[instrument]
fn default_commit_timeout_ms() -> u64 {
    2000
}

#[instrument]
fn default_log_file() -> PathBuf {
    PathBuf::from("strictly_tafl.log")
}

impl Default for TaflConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            first_player: default_first_player(),
            commit_timeout_ms: default_commit_timeout_ms(),
            log_file: default_log_file(),
            palette: PaletteConfig::default(),
        }
    }
}

impl TaflConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.palette.resolve()?;
        info!(variant = %config.variant, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides.
    #[instrument(skip(self))]
    pub fn with_overrides(
        mut self,
        variant: Option<Variant>,
        first_player: Option<Player>,
        log_file: Option<PathBuf>,
    ) -> Self {
        if let Some(variant) = variant {
            self.variant = variant;
        }
        if let Some(first_player) = first_player {
            self.first_player = first_player;
        }
        if let Some(log_file) = log_file {
            self.log_file = log_file;
        }
        self
    }

    /// Session settings derived from this config.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings::new(
            Duration::from_millis(self.commit_timeout_ms),
            self.first_player,
        )
    }
}

/// Palette as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Plain cell background.
    normal: String,
    /// Corner and throne background.
    special: String,
    /// Legal destination background.
    legal_move: String,
    /// King cell when Black wins.
    black_winner: String,
    /// King cell when White wins.
    white_winner: String,
    /// Attacker glyph.
    black_piece: String,
    /// Defender glyph.
    white_piece: String,
    /// King glyph.
    king: String,
    /// Keyboard cursor background.
    cursor: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            normal: "#8b5a2b".into(),
            special: "#5c3a1e".into(),
            legal_move: "#6b8e23".into(),
            black_winner: "red".into(),
            white_winner: "lightcyan".into(),
            black_piece: "black".into(),
            white_piece: "white".into(),
            king: "yellow".into(),
            cursor: "blue".into(),
        }
    }
}

impl PaletteConfig {
    /// Parses every color.
    #[instrument(skip(self))]
    pub fn resolve(&self) -> Result<Palette, ConfigError> {
        Ok(Palette {
            normal: parse_color("normal", &self.normal)?,
            special: parse_color("special", &self.special)?,
            legal_move: parse_color("legal_move", &self.legal_move)?,
            black_winner: parse_color("black_winner", &self.black_winner)?,
            white_winner: parse_color("white_winner", &self.white_winner)?,
            black_piece: parse_color("black_piece", &self.black_piece)?,
            white_piece: parse_color("white_piece", &self.white_piece)?,
            king: parse_color("king", &self.king)?,
            cursor: parse_color("cursor", &self.cursor)?,
        })
    }
}

fn parse_color(key: &str, value: &str) -> Result<ratatui::style::Color, ConfigError> {
    ratatui::style::Color::from_str(value)
        .map_err(|_| ConfigError::new(format!("Invalid color for palette.{}: {:?}", key, value)))
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");
        let config = TaflConfig::from_file(file.path()).unwrap();
        assert_eq!(config, TaflConfig::default());
    }

    #[test]
    fn test_partial_file_overrides_fields() {
        let file = write_config(
            r##"
variant = "tablut"
first_player = "white"
commit_timeout_ms = 250

[palette]
legal_move = "#00ff00"
"##,
        );
        let config = TaflConfig::from_file(file.path()).unwrap();
        assert_eq!(*config.variant(), Variant::Tablut);
        assert_eq!(*config.first_player(), Player::White);
        assert_eq!(config.palette().legal_move(), "#00ff00");
        assert_eq!(config.palette().king(), "yellow");
        assert_eq!(
            *config.session_settings().commit_timeout(),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let file = write_config("[palette]\nking = \"not-a-color\"\n");
        let err = TaflConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.contains("palette.king"));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = TaflConfig::load_or_default("/nonexistent/strictly_tafl.toml").unwrap();
        assert_eq!(*config.commit_timeout_ms(), 2000);
    }

    #[test]
    fn test_cli_overrides_win() {
        let config = TaflConfig::default().with_overrides(Some(Variant::Brandubh), None, None);
        assert_eq!(*config.variant(), Variant::Brandubh);
        assert_eq!(*config.first_player(), Player::Black);
    }
}
