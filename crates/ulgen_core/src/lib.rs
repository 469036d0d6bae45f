//! # ULGEN Core
//!
//! Crate compartilhada do dashboard ÜLGEN, sem dependência de toolkit
//! gráfico: loop de exibição de frames, temas, preferências, fontes de
//! telemetria, alertas, aritmética de layout e configuração TOML.
//!
//! ## Módulos
//! - [`video`] – Frames, crop/escala, contrato de câmera e o loop de exibição
//! - [`theme`] – Tabela de paletas por plataforma/modo
//! - [`preferences`] – Preferência de tema persistida
//! - [`telemetry`] – Snapshot, fontes injetáveis e histórico
//! - [`alerts`] – Thresholds e barra de issues
//! - [`layout`] – Geometria da janela e grid responsivo
//! - [`config`] – Configuração unificada via TOML

pub mod alerts;
pub mod config;
pub mod error;
pub mod layout;
pub mod preferences;
pub mod telemetry;
pub mod theme;
pub mod vehicle;
pub mod video;

// Re-exports convenientes
pub use config::AppConfig;
pub use error::CoreError;
pub use theme::{Appearance, ThemePreference};
pub use video::FrameDisplayLoop;
