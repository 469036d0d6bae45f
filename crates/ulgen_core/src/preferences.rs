//! Preferência de tema persistida.
//!
//! Único estado persistido pelo dashboard: o tema escolhido, gravado sob a
//! chave de aplicação `ULGEN/Dashboard` → `theme`.

use crate::error::CoreError;
use crate::theme::ThemePreference;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const ORGANIZATION: &str = "ULGEN";
pub const APPLICATION: &str = "Dashboard";

/// Armazenamento da preferência de tema.
pub trait PreferenceStore {
    /// Lê a preferência; ausente ou corrompida resulta em `System`.
    fn load_theme(&self) -> ThemePreference;

    fn save_theme(&mut self, theme: ThemePreference) -> Result<(), CoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceFile {
    #[serde(default)]
    theme: ThemePreference,
}

/// Arquivo TOML por usuário: `<config_dir>/ULGEN/Dashboard.toml`.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store no diretório de configuração do usuário.
    pub fn user_default() -> Result<Self, CoreError> {
        let dir = dirs::config_dir().ok_or(CoreError::NoConfigDir)?;
        Ok(Self::new(dir.join(ORGANIZATION).join(format!("{APPLICATION}.toml"))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load_theme(&self) -> ThemePreference {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Sem preferências em {}", self.path.display());
                return ThemePreference::default();
            }
            Err(e) => {
                warn!("Erro ao ler {}: {}", self.path.display(), e);
                return ThemePreference::default();
            }
        };

        match toml::from_str::<PreferenceFile>(&content) {
            Ok(file) => file.theme,
            Err(e) => {
                warn!("Preferências inválidas em {}: {}", self.path.display(), e);
                ThemePreference::default()
            }
        }
    }

    fn save_theme(&mut self, theme: ThemePreference) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
        }
        let content = toml::to_string_pretty(&PreferenceFile { theme })?;
        std::fs::write(&self.path, content).map_err(|e| CoreError::io(&self.path, e))?;
        info!("Tema '{}' salvo em {}", theme, self.path.display());
        Ok(())
    }
}

/// Store volátil, para quando não há diretório de configuração.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferenceStore {
    theme: ThemePreference,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load_theme(&self) -> ThemePreference {
        self.theme
    }

    fn save_theme(&mut self, theme: ThemePreference) -> Result<(), CoreError> {
        self.theme = theme;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_defaults_to_system() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("nope.toml"));
        assert_eq!(store.load_theme(), ThemePreference::System);
    }

    #[test]
    fn save_then_load_roundtrip_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ORGANIZATION).join("Dashboard.toml");
        let mut store = FilePreferenceStore::new(&path);

        store.save_theme(ThemePreference::Dark).unwrap();
        assert!(path.exists());
        assert_eq!(store.load_theme(), ThemePreference::Dark);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("theme = \"dark\""), "{content}");
    }

    #[test]
    fn corrupt_file_defaults_to_system() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Dashboard.toml");
        std::fs::write(&path, "theme = \"neon\"").unwrap();
        let store = FilePreferenceStore::new(&path);
        assert_eq!(store.load_theme(), ThemePreference::System);
    }

    #[test]
    fn memory_store_keeps_value() {
        let mut store = MemoryPreferenceStore::default();
        store.save_theme(ThemePreference::Light).unwrap();
        assert_eq!(store.load_theme(), ThemePreference::Light);
    }
}
