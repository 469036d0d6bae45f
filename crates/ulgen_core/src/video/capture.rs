//! Contrato com o colaborador de câmera: `open` / `read` / `release`.

use super::frame::{Frame, FrameError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Origem de vídeo selecionável pelo usuário.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CameraSource {
    /// Dispositivo físico pelo índice do sistema
    Device { index: u32 },
    /// Padrão de barras gerado internamente
    TestPattern,
    /// Nenhuma origem (sempre placeholder)
    Disabled,
}

impl fmt::Display for CameraSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraSource::Device { index } => write!(f, "camera #{index}"),
            CameraSource::TestPattern => f.write_str("test pattern"),
            CameraSource::Disabled => f.write_str("disabled"),
        }
    }
}

/// Falhas do colaborador de câmera.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("dispositivo {0} não encontrado")]
    DeviceNotFound(String),
    #[error("falha ao abrir {source_name}: {reason}")]
    OpenFailed { source_name: String, reason: String },
    #[error("origem desabilitada")]
    Disabled,
    #[error("captura de dispositivos não suportada neste build")]
    Unsupported,
    #[error("fim do stream")]
    EndOfStream,
    #[error("falha de leitura: {0}")]
    ReadFailed(String),
    #[error("frame inválido: {0}")]
    InvalidFrame(#[from] FrameError),
}

/// Handle aberto para uma câmera.
pub trait CaptureHandle {
    /// Leitura bloqueante de um frame.
    fn read(&mut self) -> Result<Frame, CaptureError>;

    /// Libera o dispositivo. O loop garante uma única chamada por handle.
    fn release(&mut self);
}

/// Fábrica de handles de captura.
pub trait CameraBackend {
    fn open(&mut self, source: &CameraSource) -> Result<Box<dyn CaptureHandle>, CaptureError>;
}
