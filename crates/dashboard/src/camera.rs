//! Backend de câmera do dashboard.
//!
//! Padrão de teste e origens desabilitadas são resolvidos aqui; dispositivos
//! físicos passam pelo nokhwa quando o build tem a feature `camera`.

use ulgen_core::video::pattern::TestPatternHandle;
use ulgen_core::video::{CameraBackend, CameraSource, CaptureError, CaptureHandle};

#[derive(Debug, Default)]
pub struct DashboardBackend;

impl CameraBackend for DashboardBackend {
    fn open(&mut self, source: &CameraSource) -> Result<Box<dyn CaptureHandle>, CaptureError> {
        match source {
            CameraSource::TestPattern => Ok(Box::new(TestPatternHandle::new())),
            CameraSource::Disabled => Err(CaptureError::Disabled),
            CameraSource::Device { index } => open_device(*index),
        }
    }
}

#[cfg(feature = "camera")]
fn open_device(index: u32) -> Result<Box<dyn CaptureHandle>, CaptureError> {
    native::NokhwaHandle::open(index).map(|h| Box::new(h) as Box<dyn CaptureHandle>)
}

#[cfg(not(feature = "camera"))]
fn open_device(_index: u32) -> Result<Box<dyn CaptureHandle>, CaptureError> {
    Err(CaptureError::Unsupported)
}

#[cfg(feature = "camera")]
mod native {
    use nokhwa::Camera;
    use nokhwa::pixel_format::RgbFormat;
    use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
    use tracing::{info, warn};
    use ulgen_core::video::frame::{ChannelOrder, Frame};
    use ulgen_core::video::{CaptureError, CaptureHandle};

    pub struct NokhwaHandle {
        index: u32,
        camera: Camera,
    }

    impl NokhwaHandle {
        pub fn open(index: u32) -> Result<Self, CaptureError> {
            let requested =
                RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
            let mut camera = Camera::new(CameraIndex::Index(index), requested)
                .map_err(|e| open_error(index, e.to_string()))?;
            camera
                .open_stream()
                .map_err(|e| open_error(index, e.to_string()))?;

            let res = camera.resolution();
            info!(
                "Câmera #{index} aberta: {}x{} @ {} fps",
                res.width(),
                res.height(),
                camera.frame_rate()
            );
            Ok(Self { index, camera })
        }
    }

    fn open_error(index: u32, reason: String) -> CaptureError {
        let msg = reason.to_lowercase();
        if msg.contains("not found") || msg.contains("no device") {
            CaptureError::DeviceNotFound(format!("#{index}"))
        } else {
            CaptureError::OpenFailed {
                source_name: format!("camera #{index}"),
                reason,
            }
        }
    }

    impl CaptureHandle for NokhwaHandle {
        fn read(&mut self) -> Result<Frame, CaptureError> {
            let buffer = self
                .camera
                .frame()
                .map_err(|e| CaptureError::ReadFailed(e.to_string()))?;
            // decode_image já entrega RGB, independente do formato nativo (MJPEG, YUYV, NV12…)
            let decoded = buffer
                .decode_image::<RgbFormat>()
                .map_err(|e| CaptureError::ReadFailed(e.to_string()))?;
            let (width, height) = decoded.dimensions();
            Ok(Frame::new(width, height, ChannelOrder::Rgb, decoded.into_raw())?)
        }

        fn release(&mut self) {
            if let Err(e) = self.camera.stop_stream() {
                warn!("Erro ao fechar câmera #{}: {e}", self.index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_and_disabled_sources() {
        let mut backend = DashboardBackend;
        let mut handle = backend.open(&CameraSource::TestPattern).unwrap();
        assert!(handle.read().is_ok());
        handle.release();

        assert!(matches!(
            backend.open(&CameraSource::Disabled),
            Err(CaptureError::Disabled)
        ));
    }

    #[cfg(not(feature = "camera"))]
    #[test]
    fn devices_unsupported_without_camera_feature() {
        let mut backend = DashboardBackend;
        assert!(matches!(
            backend.open(&CameraSource::Device { index: 0 }),
            Err(CaptureError::Unsupported)
        ));
    }
}
