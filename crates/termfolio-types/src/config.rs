//! Session configuration loaded from `termfolio.toml`.
//!
//! Every field has a default so an empty file (or no file at all) yields a
//! working portfolio shell.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, TermError};

/// Environment variable overriding [`TermConfig::github_username`].
pub const ENV_GITHUB_USERNAME: &str = "TERMFOLIO_GITHUB_USERNAME";

/// Environment variable overriding [`TermConfig::weather_api_key`].
pub const ENV_WEATHER_API_KEY: &str = "TERMFOLIO_WEATHER_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TermConfig {
    /// GitHub account queried by `github` and `projects`.
    #[serde(default = "default_github_username")]
    pub github_username: String,
    /// OpenWeatherMap API key used by `weather`.
    #[serde(default)]
    pub weather_api_key: Option<String>,
    /// Theme active when the session starts.
    #[serde(default = "default_theme")]
    pub default_theme: String,
    /// Prompt shown before the input line.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Static biography content for the "About Me" commands.
    #[serde(default)]
    pub profile: Profile,
    /// Extra color themes, added to (or replacing) the built-in catalog.
    #[serde(default, rename = "theme")]
    pub themes: Vec<ThemeEntry>,
}

/// Biography shown by `about`, `contact`, `socials`, `motd` and `neofetch`.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_bio")]
    pub bio: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_email")]
    pub email: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default = "default_motd")]
    pub motd: String,
    #[serde(default = "default_socials", rename = "social")]
    pub socials: Vec<SocialLink>,
}

/// One entry of `[[profile.social]]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
}

/// One entry of `[[theme]]`: a named color table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThemeEntry {
    pub name: String,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_foreground")]
    pub foreground: String,
    #[serde(default = "default_accent")]
    pub accent: String,
    #[serde(default = "default_prompt_color")]
    pub prompt: String,
}

fn default_github_username() -> String {
    "Anurag-xo".to_string()
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_prompt() -> String {
    "guest@termfolio:~$".to_string()
}

fn default_name() -> String {
    "Anurag".to_string()
}

fn default_title() -> String {
    "Full Stack Developer".to_string()
}

fn default_bio() -> String {
    "I am a passionate software developer with a love for creating beautiful \
     and functional applications."
        .to_string()
}

fn default_location() -> String {
    "India".to_string()
}

fn default_email() -> String {
    "anurag.s.xo@gmail.com".to_string()
}

fn default_motd() -> String {
    "\"The only way to do great work is to love what you do.\" - Steve Jobs".to_string()
}

fn default_socials() -> Vec<SocialLink> {
    vec![
        SocialLink {
            name: "GitHub".to_string(),
            url: "https://github.com/Anurag-xo".to_string(),
        },
        SocialLink {
            name: "LinkedIn".to_string(),
            url: "https://www.linkedin.com/in/anurag-s-9b09b81b3/".to_string(),
        },
        SocialLink {
            name: "Twitter".to_string(),
            url: "https://twitter.com/Anurag_xo".to_string(),
        },
    ]
}

fn default_background() -> String {
    "#000000".to_string()
}

fn default_foreground() -> String {
    "#d0d0d0".to_string()
}

fn default_accent() -> String {
    "#4ade80".to_string()
}

fn default_prompt_color() -> String {
    "#86efac".to_string()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: default_name(),
            title: default_title(),
            bio: default_bio(),
            location: default_location(),
            email: default_email(),
            website: Some("https://anuragsite.vercel.app".to_string()),
            motd: default_motd(),
            socials: default_socials(),
        }
    }
}

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            github_username: default_github_username(),
            weather_api_key: None,
            default_theme: default_theme(),
            prompt: default_prompt(),
            profile: Profile::default(),
            themes: Vec::new(),
        }
    }
}

impl TermConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| TermError::Config(format!("termfolio.toml: {e}")))
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(user) = lookup(ENV_GITHUB_USERNAME).filter(|v| !v.trim().is_empty()) {
            self.github_username = user;
        }
        if let Some(key) = lookup(ENV_WEATHER_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.weather_api_key = Some(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = TermConfig::from_toml("").unwrap();
        assert_eq!(cfg.github_username, "Anurag-xo");
        assert_eq!(cfg.default_theme, "dark");
        assert!(cfg.weather_api_key.is_none());
        assert!(cfg.themes.is_empty());
        assert_eq!(cfg.profile.socials.len(), 3);
    }

    #[test]
    fn default_matches_empty_toml() {
        let parsed = TermConfig::from_toml("").unwrap();
        let built = TermConfig::default();
        assert_eq!(parsed.github_username, built.github_username);
        assert_eq!(parsed.prompt, built.prompt);
        assert_eq!(parsed.profile.name, built.profile.name);
    }

    #[test]
    fn parse_full_config() {
        let toml = r##"
github_username = "octocat"
weather_api_key = "abc123"
default_theme = "matrix"

[profile]
name = "Octo"
email = "octo@example.com"

[[profile.social]]
name = "Mastodon"
url = "https://example.social/@octo"

[[theme]]
name = "sunset"
background = "#1a0b0b"
accent = "#ff8800"
"##;
        let cfg = TermConfig::from_toml(toml).unwrap();
        assert_eq!(cfg.github_username, "octocat");
        assert_eq!(cfg.weather_api_key.as_deref(), Some("abc123"));
        assert_eq!(cfg.default_theme, "matrix");
        assert_eq!(cfg.profile.name, "Octo");
        assert_eq!(cfg.profile.title, "Full Stack Developer");
        assert_eq!(cfg.profile.socials.len(), 1);
        assert_eq!(cfg.profile.socials[0].name, "Mastodon");
        assert_eq!(cfg.themes.len(), 1);
        assert_eq!(cfg.themes[0].name, "sunset");
        assert_eq!(cfg.themes[0].accent, "#ff8800");
        assert_eq!(cfg.themes[0].foreground, "#d0d0d0");
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = TermConfig::from_toml("github_username = [").unwrap_err();
        assert!(matches!(err, TermError::Config(_)));
        assert!(format!("{err}").contains("termfolio.toml"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "github_username = \"from-file\"").unwrap();
        let cfg = TermConfig::load(file.path()).unwrap();
        assert_eq!(cfg.github_username, "from-file");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TermConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, TermError::Io(_)));
    }

    #[test]
    fn overrides_replace_values() {
        let mut cfg = TermConfig::default();
        cfg.apply_overrides_from(|key| match key {
            ENV_GITHUB_USERNAME => Some("override".to_string()),
            ENV_WEATHER_API_KEY => Some("k3y".to_string()),
            _ => None,
        });
        assert_eq!(cfg.github_username, "override");
        assert_eq!(cfg.weather_api_key.as_deref(), Some("k3y"));
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let mut cfg = TermConfig::default();
        cfg.apply_overrides_from(|_| Some("   ".to_string()));
        assert_eq!(cfg.github_username, "Anurag-xo");
        assert!(cfg.weather_api_key.is_none());
    }
}
