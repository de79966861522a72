//! Color theme catalog and the active-theme handle.
//!
//! The engine only needs to know which names exist and how to switch to
//! one. Hosts that own real styling implement [`ThemeHost`] themselves;
//! [`ThemeCatalog`] is the in-process default.

use termfolio_types::config::{TermConfig, ThemeEntry};
use termfolio_types::error::{Result, TermError};

/// Access to the active theme.
pub trait ThemeHost {
    /// Name of the active theme.
    fn current(&self) -> &str;

    /// Every valid theme name, in catalog order.
    fn names(&self) -> Vec<String>;

    /// Whether `name` is in the catalog.
    fn exists(&self, name: &str) -> bool {
        self.names().iter().any(|n| n == name)
    }

    /// Switch to `name`. Leaves the active theme untouched on failure.
    fn apply(&mut self, name: &str) -> Result<()>;
}

/// Built-in theme names, in catalog order.
pub fn builtin_names() -> &'static [&'static str] {
    &["dark", "light", "matrix", "dracula", "solarized"]
}

/// Built-in color tables.
pub fn builtin_themes() -> Vec<ThemeEntry> {
    let entry = |name: &str, background: &str, foreground: &str, accent: &str, prompt: &str| {
        ThemeEntry {
            name: name.to_string(),
            background: background.to_string(),
            foreground: foreground.to_string(),
            accent: accent.to_string(),
            prompt: prompt.to_string(),
        }
    };
    vec![
        entry("dark", "#1e1e1e", "#d4d4d4", "#569cd6", "#4ec9b0"),
        entry("light", "#ffffff", "#1e1e1e", "#0451a5", "#098658"),
        entry("matrix", "#000000", "#00ff41", "#008f11", "#00ff41"),
        entry("dracula", "#282a36", "#f8f8f2", "#bd93f9", "#50fa7b"),
        entry("solarized", "#002b36", "#839496", "#268bd2", "#859900"),
    ]
}

/// The default [`ThemeHost`]: built-in themes plus any from the config.
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    themes: Vec<ThemeEntry>,
    active: usize,
}

impl ThemeCatalog {
    /// Catalog holding only the built-in themes, with `dark` active.
    pub fn builtin() -> Self {
        Self {
            themes: builtin_themes(),
            active: 0,
        }
    }

    /// Built-ins merged with `config.themes`, starting on `config.default_theme`.
    ///
    /// A config theme with a built-in name replaces that built-in's colors.
    /// An unknown default falls back to the first theme in the catalog.
    pub fn from_config(config: &TermConfig) -> Self {
        let mut catalog = Self::builtin();
        for entry in &config.themes {
            catalog.insert(entry.clone());
        }
        if catalog.apply(&config.default_theme).is_err() {
            log::warn!(
                "Unknown default theme '{}', using '{}'",
                config.default_theme,
                catalog.current()
            );
        }
        catalog
    }

    /// Add a theme, replacing any theme with the same name.
    pub fn insert(&mut self, entry: ThemeEntry) {
        match self.themes.iter_mut().find(|t| t.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.themes.push(entry),
        }
    }

    /// Color table of the active theme.
    pub fn palette(&self) -> &ThemeEntry {
        &self.themes[self.active]
    }

    /// Color table of `name`, if it exists.
    pub fn get(&self, name: &str) -> Option<&ThemeEntry> {
        self.themes.iter().find(|t| t.name == name)
    }
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ThemeHost for ThemeCatalog {
    fn current(&self) -> &str {
        &self.themes[self.active].name
    }

    fn names(&self) -> Vec<String> {
        self.themes.iter().map(|t| t.name.clone()).collect()
    }

    fn exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn apply(&mut self, name: &str) -> Result<()> {
        let idx = self
            .themes
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| TermError::InvalidTheme(name.to_string()))?;
        self.active = idx;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_match_builtin_themes() {
        let names: Vec<String> = builtin_themes().into_iter().map(|t| t.name).collect();
        assert_eq!(names, builtin_names());
    }

    #[test]
    fn builtin_catalog_starts_dark() {
        let catalog = ThemeCatalog::builtin();
        assert_eq!(catalog.current(), "dark");
        assert_eq!(catalog.palette().background, "#1e1e1e");
    }

    #[test]
    fn apply_valid_theme() {
        let mut catalog = ThemeCatalog::builtin();
        catalog.apply("matrix").unwrap();
        assert_eq!(catalog.current(), "matrix");
        assert_eq!(catalog.palette().foreground, "#00ff41");
    }

    #[test]
    fn apply_invalid_theme_leaves_active_untouched() {
        let mut catalog = ThemeCatalog::builtin();
        catalog.apply("light").unwrap();
        match catalog.apply("neon") {
            Err(TermError::InvalidTheme(name)) => assert_eq!(name, "neon"),
            other => panic!("expected InvalidTheme, got {other:?}"),
        }
        assert_eq!(catalog.current(), "light");
    }

    #[test]
    fn names_are_case_sensitive() {
        let catalog = ThemeCatalog::builtin();
        assert!(catalog.exists("dracula"));
        assert!(!catalog.exists("Dracula"));
    }

    #[test]
    fn config_adds_and_overrides_themes() {
        let config = TermConfig::from_toml(
            r##"
default_theme = "sunset"

[[theme]]
name = "sunset"
accent = "#ff8800"

[[theme]]
name = "dark"
background = "#101010"
"##,
        )
        .unwrap();
        let catalog = ThemeCatalog::from_config(&config);
        assert_eq!(catalog.current(), "sunset");
        assert_eq!(catalog.names().len(), builtin_names().len() + 1);
        assert_eq!(catalog.get("dark").unwrap().background, "#101010");
        assert_eq!(catalog.names().last().unwrap(), "sunset");
    }

    #[test]
    fn unknown_default_theme_falls_back() {
        let config = TermConfig::from_toml("default_theme = \"nope\"").unwrap();
        let catalog = ThemeCatalog::from_config(&config);
        assert_eq!(catalog.current(), "dark");
    }

    #[test]
    fn default_exists_uses_names() {
        struct Fixed(String);
        impl ThemeHost for Fixed {
            fn current(&self) -> &str {
                &self.0
            }
            fn names(&self) -> Vec<String> {
                vec!["one".into(), "two".into()]
            }
            fn apply(&mut self, name: &str) -> Result<()> {
                self.0 = name.to_string();
                Ok(())
            }
        }
        let host = Fixed("one".into());
        assert!(host.exists("two"));
        assert!(!host.exists("three"));
    }
}
