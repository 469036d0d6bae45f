//! Configuração unificada via TOML (`config.toml` ao lado do executável).

use crate::error::CoreError;
use crate::telemetry::TelemetrySourceKind;
use crate::vehicle::VehicleInfo;
use crate::video::capture::CameraSource;
use crate::video::display_loop::DEFAULT_PLACEHOLDER;
use crate::video::frame::AspectRatio;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Janela principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Fração do monitor ocupada na abertura (0.1–1.0)
    pub screen_fraction: f32,
    pub min_width: f32,
    pub min_height: f32,
    /// Abaixo desta largura os cards são empilhados
    pub compact_breakpoint: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "ÜLGEN AI-DRIVEN EXPLORATION".into(),
            screen_fraction: 0.9,
            min_width: 1024.0,
            min_height: 700.0,
            compact_breakpoint: 1000.0,
        }
    }
}

/// Uma entrada do seletor de câmera.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSourceEntry {
    pub label: String,
    pub source: CameraSource,
}

/// Loop de vídeo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Período do timer de frames (ms)
    pub period_ms: u64,
    /// Proporção do recorte central; ausente = sem recorte
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_aspect: Option<AspectRatio>,
    pub placeholder_text: String,
    /// Índice em `sources` aberto na inicialização
    pub initial_source: usize,
    pub sources: Vec<VideoSourceEntry>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            period_ms: 30,
            target_aspect: Some(AspectRatio::WIDESCREEN),
            placeholder_text: DEFAULT_PLACEHOLDER.into(),
            initial_source: 0,
            sources: vec![
                VideoSourceEntry {
                    label: "Normal Camera".into(),
                    source: CameraSource::Device { index: 0 },
                },
                VideoSourceEntry {
                    label: "Thermal Camera".into(),
                    source: CameraSource::Disabled,
                },
                VideoSourceEntry {
                    label: "Spectral Camera".into(),
                    source: CameraSource::Disabled,
                },
                VideoSourceEntry {
                    label: "Test Pattern".into(),
                    source: CameraSource::TestPattern,
                },
            ],
        }
    }
}

impl VideoConfig {
    /// Origem inicial; índice fora da lista cai na primeira entrada.
    pub fn initial(&self) -> CameraSource {
        self.sources
            .get(self.initial_source)
            .or_else(|| self.sources.first())
            .map(|e| e.source.clone())
            .unwrap_or(CameraSource::Disabled)
    }
}

/// Fonte de telemetria.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub source: TelemetrySourceKind,
    pub poll_interval_ms: u64,
    /// Semente do simulador (ausente = aleatória)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            source: TelemetrySourceKind::Simulated,
            poll_interval_ms: 1000,
            seed: None,
        }
    }
}

/// Thresholds de alerta.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    pub temperature_warning: f32,
    pub temperature_critical: f32,
    /// Bateria: alerta quando abaixo
    pub battery_warning: f32,
    pub battery_critical: f32,
    pub power_warning: f32,
    pub power_critical: f32,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            temperature_warning: 60.0,
            temperature_critical: 80.0,
            battery_warning: 25.0,
            battery_critical: 10.0,
            power_warning: 30.0,
            power_critical: 38.0,
        }
    }
}

/// Sub-painéis opcionais da view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Velocímetro, magnetômetro e sensores
    pub show_instruments: bool,
    pub show_analysis: bool,
    pub show_datasets: bool,
    pub show_issue_bar: bool,
    pub show_camera_selector: bool,
    pub show_graphs: bool,
    pub card_borders: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            show_instruments: true,
            show_analysis: true,
            show_datasets: true,
            show_issue_bar: true,
            show_camera_selector: true,
            show_graphs: false,
            card_borders: true,
        }
    }
}

/// Configuração raiz do aplicativo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub video: VideoConfig,
    pub telemetry: TelemetryConfig,
    pub alerts: AlertThresholds,
    pub layout: LayoutConfig,
    pub vehicle: VehicleInfo,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| CoreError::io(path, e))?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let w = &self.window;
        if !(0.1..=1.0).contains(&w.screen_fraction) {
            errors.push(format!("Fração de tela inválida: {} (0.1–1.0)", w.screen_fraction));
        }
        if w.min_width <= 0.0 || w.min_height <= 0.0 {
            errors.push("Tamanho mínimo da janela deve ser positivo".into());
        }

        let v = &self.video;
        if v.period_ms == 0 || v.period_ms > 1000 {
            errors.push(format!("Período de vídeo inválido: {} ms (1–1000)", v.period_ms));
        }
        if v.sources.is_empty() {
            errors.push("Nenhuma origem de vídeo configurada".into());
        } else if v.initial_source >= v.sources.len() {
            errors.push(format!(
                "Origem inicial {} fora da lista ({} origens)",
                v.initial_source,
                v.sources.len()
            ));
        }

        if self.telemetry.poll_interval_ms < 50 {
            errors.push(format!(
                "Intervalo de telemetria muito curto: {} ms (mínimo 50)",
                self.telemetry.poll_interval_ms
            ));
        }

        let a = &self.alerts;
        if a.temperature_warning > a.temperature_critical {
            errors.push("Temperatura: warning acima de critical".into());
        }
        if a.power_warning > a.power_critical {
            errors.push("Potência: warning acima de critical".into());
        }
        if a.battery_warning < a.battery_critical {
            errors.push("Bateria: warning abaixo de critical".into());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        let errors = config.validate();
        assert!(errors.is_empty(), "Erros: {:?}", errors);
    }

    #[test]
    fn roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.video.sources, parsed.video.sources);
        assert_eq!(parsed.video.target_aspect, Some(AspectRatio::WIDESCREEN));
        assert!(toml_str.contains("target_aspect = \"16:9\""), "{toml_str}");
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let partial = r#"
[video]
period_ms = 50
target_aspect = "4:3"

[[video.sources]]
label = "USB"
source = { kind = "device", index = 2 }
"#;
        let config: AppConfig = toml::from_str(partial).unwrap();
        assert_eq!(config.video.period_ms, 50);
        assert_eq!(config.video.target_aspect, AspectRatio::new(4, 3));
        assert_eq!(config.video.initial(), CameraSource::Device { index: 2 });
        // Outros campos devem ter valor padrão
        assert_eq!(config.telemetry.poll_interval_ms, 1000);
        assert_eq!(config.window.screen_fraction, 0.9);
    }

    #[test]
    fn bad_aspect_is_rejected() {
        let result = toml::from_str::<AppConfig>("[video]\ntarget_aspect = \"wide\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_catches_problems() {
        let mut config = AppConfig::default();
        config.video.period_ms = 0;
        config.video.initial_source = 99;
        config.alerts.battery_warning = 5.0;
        let errors = config.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert_eq!(config.video.initial(), CameraSource::Device { index: 0 });
    }

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("config.toml"));
        assert_eq!(config.video.period_ms, 30);
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = AppConfig::default();
        config.telemetry.seed = Some(11);
        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path);
        assert_eq!(loaded.telemetry.seed, Some(11));
    }
}
