use crate::store::Store;
use anyhow::Result;
use std::fmt;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Anything other than an explicit `"dark"` is light.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub async fn load_theme(store: &Store) -> Result<Theme> {
    let raw = store.get(THEME_KEY).await?;
    Ok(Theme::parse(raw.as_deref()))
}

pub async fn save_theme(store: &Store, theme: Theme) -> Result<()> {
    store.set(THEME_KEY, theme.as_str()).await
}
