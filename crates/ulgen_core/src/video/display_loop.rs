//! Loop de exibição de frames dirigido por timer.
//!
//! O loop é dono exclusivo do [`CaptureHandle`] atual e da última imagem
//! exibida. Toda falha (abertura, leitura, superfície vazia) degrada para
//! "última imagem boa ou placeholder" e o loop continua no próximo período.
//! O host (a thread de UI) chama [`FrameDisplayLoop::poll`] a cada repaint;
//! no máximo um tick roda por chamada, então ticks nunca se sobrepõem.

use super::capture::{CameraBackend, CameraSource, CaptureHandle};
use super::frame::{render_for_display, AspectRatio, DisplayImage, DisplayRegion};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Texto exibido enquanto nenhum frame foi lido da origem atual.
pub const DEFAULT_PLACEHOLDER: &str = "Unable to open camera.";

/// O que a superfície de vídeo deve mostrar.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    Placeholder(String),
    Image(DisplayImage),
}

/// Resultado de um tick, útil para logs e testes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Novo frame substituiu a imagem exibida
    Displayed,
    /// Nenhum handle aberto; nada a fazer
    NoSource,
    /// Leitura falhou; imagem anterior mantida
    ReadFailed,
    /// Superfície com dimensão zero; frame descartado
    EmptySurface,
}

/// Contadores acumulados desde a criação do loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub ticks: u64,
    pub frames_displayed: u64,
    pub read_failures: u64,
}

pub struct FrameDisplayLoop<B: CameraBackend> {
    backend: B,
    source: CameraSource,
    handle: Option<Box<dyn CaptureHandle>>,
    target: Option<AspectRatio>,
    region: DisplayRegion,
    placeholder: String,
    display: DisplayState,
    generation: u64,
    period: Option<Duration>,
    next_tick: Option<Instant>,
    consecutive_failures: u32,
    stats: LoopStats,
}

impl<B: CameraBackend> FrameDisplayLoop<B> {
    /// Cria o loop e já abre `source`. Se a abertura falhar o loop fica no
    /// estado de placeholder.
    pub fn new(
        backend: B,
        source: CameraSource,
        target: Option<AspectRatio>,
        placeholder: impl Into<String>,
    ) -> Self {
        let placeholder = placeholder.into();
        let mut this = Self {
            backend,
            source,
            handle: None,
            target,
            region: DisplayRegion::default(),
            display: DisplayState::Placeholder(placeholder.clone()),
            placeholder,
            generation: 0,
            period: None,
            next_tick: None,
            consecutive_failures: 0,
            stats: LoopStats::default(),
        };
        this.open_current();
        this
    }

    // ── Timer ──

    /// Agenda ticks recorrentes; o primeiro fica devido imediatamente.
    pub fn start(&mut self, period_ms: u64) {
        let period = Duration::from_millis(period_ms.max(1));
        self.period = Some(period);
        self.next_tick = Some(Instant::now());
        info!("Loop de vídeo iniciado ({} ms, origem: {})", period.as_millis(), self.source);
    }

    pub fn is_running(&self) -> bool {
        self.period.is_some()
    }

    /// Executa um tick se o período venceu. Chamado pelo host a cada repaint.
    pub fn poll(&mut self, now: Instant) -> Option<TickOutcome> {
        let period = self.period?;
        let due = self.next_tick?;
        if now < due {
            return None;
        }
        self.next_tick = Some(now + period);
        Some(self.tick())
    }

    /// Tempo até o próximo tick, para agendar o repaint do host.
    pub fn time_until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.period?;
        self.next_tick.map(|due| due.saturating_duration_since(now))
    }

    /// Uma tentativa de aquisição e exibição.
    pub fn tick(&mut self) -> TickOutcome {
        self.stats.ticks += 1;

        let Some(handle) = self.handle.as_mut() else {
            return TickOutcome::NoSource;
        };

        let frame = match handle.read() {
            Ok(frame) => frame,
            Err(e) => {
                self.stats.read_failures += 1;
                self.consecutive_failures += 1;
                if self.consecutive_failures == 1 {
                    warn!("Falha ao ler frame de {}: {e}", self.source);
                } else {
                    debug!("Falha ao ler frame de {} ({}x): {e}", self.source, self.consecutive_failures);
                }
                return TickOutcome::ReadFailed;
            }
        };
        if self.consecutive_failures > 0 {
            info!("Leitura de {} recuperada após {} falhas", self.source, self.consecutive_failures);
            self.consecutive_failures = 0;
        }

        match render_for_display(frame, self.target, self.region) {
            Some(image) => {
                self.display = DisplayState::Image(image);
                self.generation += 1;
                self.stats.frames_displayed += 1;
                TickOutcome::Displayed
            }
            None => TickOutcome::EmptySurface,
        }
    }

    // ── Origem ──

    /// Troca a origem: libera o handle atual antes de abrir o novo.
    pub fn change_source(&mut self, source: CameraSource) {
        info!("Trocando origem de vídeo: {} → {}", self.source, source);
        self.release_handle();
        self.source = source;
        self.show_placeholder();
        self.consecutive_failures = 0;
        self.open_current();
    }

    pub fn has_open_handle(&self) -> bool {
        self.handle.is_some()
    }

    // ── Superfície ──

    pub fn resize(&mut self, region: DisplayRegion) {
        if region != self.region {
            debug!("Superfície de vídeo: {}x{}", region.width, region.height);
            self.region = region;
        }
    }

    pub fn region(&self) -> DisplayRegion {
        self.region
    }

    pub fn target_ratio(&self) -> Option<AspectRatio> {
        self.target
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Muda sempre que o conteúdo de [`Self::display`] é substituído.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    // ── Teardown ──

    /// Para o timer e libera o handle. Idempotente.
    pub fn stop(&mut self) {
        if self.period.take().is_some() {
            info!("Loop de vídeo parado");
        }
        self.next_tick = None;
        self.release_handle();
    }

    fn open_current(&mut self) {
        match self.backend.open(&self.source) {
            Ok(handle) => {
                info!("Origem de vídeo aberta: {}", self.source);
                self.handle = Some(handle);
            }
            Err(e) => {
                warn!("Não foi possível abrir {}: {e}", self.source);
                self.handle = None;
            }
        }
    }

    fn release_handle(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.release();
            debug!("Handle de {} liberado", self.source);
        }
    }

    fn show_placeholder(&mut self) {
        if !matches!(&self.display, DisplayState::Placeholder(text) if *text == self.placeholder) {
            self.display = DisplayState::Placeholder(self.placeholder.clone());
            self.generation += 1;
        }
    }
}

impl<B: CameraBackend> Drop for FrameDisplayLoop<B> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::capture::CaptureError;
    use crate::video::frame::{ChannelOrder, Frame};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        opened: Vec<CameraSource>,
        released: u32,
        reads: VecDeque<Result<Frame, CaptureError>>,
    }

    struct FakeHandle {
        log: Rc<RefCell<Log>>,
    }

    impl CaptureHandle for FakeHandle {
        fn read(&mut self) -> Result<Frame, CaptureError> {
            self.log
                .borrow_mut()
                .reads
                .pop_front()
                .unwrap_or(Err(CaptureError::EndOfStream))
        }

        fn release(&mut self) {
            self.log.borrow_mut().released += 1;
        }
    }

    struct FakeBackend {
        log: Rc<RefCell<Log>>,
    }

    impl CameraBackend for FakeBackend {
        fn open(&mut self, source: &CameraSource) -> Result<Box<dyn CaptureHandle>, CaptureError> {
            self.log.borrow_mut().opened.push(source.clone());
            match source {
                CameraSource::Device { index } if *index < 10 => Ok(Box::new(FakeHandle {
                    log: Rc::clone(&self.log),
                })),
                CameraSource::Device { index } => Err(CaptureError::DeviceNotFound(index.to_string())),
                _ => Err(CaptureError::Disabled),
            }
        }
    }

    fn frame(w: u32, h: u32, shade: u8) -> Frame {
        Frame::new(w, h, ChannelOrder::Bgr, vec![shade; (w * h * 3) as usize]).unwrap()
    }

    fn make_loop(source: CameraSource) -> (FrameDisplayLoop<FakeBackend>, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let backend = FakeBackend { log: Rc::clone(&log) };
        let mut l = FrameDisplayLoop::new(backend, source, Some(AspectRatio::WIDESCREEN), DEFAULT_PLACEHOLDER);
        l.resize(DisplayRegion::new(640, 640));
        (l, log)
    }

    fn push_read(log: &Rc<RefCell<Log>>, r: Result<Frame, CaptureError>) {
        log.borrow_mut().reads.push_back(r);
    }

    #[test]
    fn successful_tick_displays_cropped_frame() {
        let (mut l, log) = make_loop(CameraSource::Device { index: 0 });
        push_read(&log, Ok(frame(640, 480, 7)));

        assert_eq!(l.tick(), TickOutcome::Displayed);
        match l.display() {
            DisplayState::Image(img) => assert_eq!((img.width, img.height), (640, 360)),
            other => panic!("esperava imagem, veio {other:?}"),
        }
    }

    #[test]
    fn failed_tick_keeps_previous_image() {
        let (mut l, log) = make_loop(CameraSource::Device { index: 0 });
        push_read(&log, Ok(frame(64, 36, 1)));
        push_read(&log, Err(CaptureError::ReadFailed("usb".into())));

        l.tick();
        let before = l.display().clone();
        let generation = l.generation();

        assert_eq!(l.tick(), TickOutcome::ReadFailed);
        assert_eq!(l.display(), &before);
        assert_eq!(l.generation(), generation);
        assert_eq!(l.stats().read_failures, 1);
    }

    #[test]
    fn failure_before_any_frame_shows_placeholder() {
        let (mut l, _log) = make_loop(CameraSource::Device { index: 0 });
        assert_eq!(l.tick(), TickOutcome::ReadFailed);
        assert_eq!(l.display(), &DisplayState::Placeholder(DEFAULT_PLACEHOLDER.into()));
    }

    #[test]
    fn never_opened_source_is_permanent_placeholder() {
        let (mut l, log) = make_loop(CameraSource::Device { index: 99 });
        assert!(!l.has_open_handle());
        for _ in 0..5 {
            assert_eq!(l.tick(), TickOutcome::NoSource);
        }
        assert_eq!(l.display(), &DisplayState::Placeholder(DEFAULT_PLACEHOLDER.into()));
        assert_eq!(l.stats().frames_displayed, 0);
        assert_eq!(log.borrow().released, 0);
    }

    #[test]
    fn change_source_to_failing_open_matches_never_opened() {
        let (mut l, log) = make_loop(CameraSource::Device { index: 0 });
        push_read(&log, Ok(frame(64, 36, 1)));
        l.tick();

        l.change_source(CameraSource::Device { index: 42 });

        let (never, _) = make_loop(CameraSource::Device { index: 42 });
        assert_eq!(l.display(), never.display());
        assert_eq!(l.has_open_handle(), never.has_open_handle());
        assert_eq!(log.borrow().released, 1);
        assert_eq!(l.tick(), TickOutcome::NoSource);
    }

    #[test]
    fn change_source_releases_before_opening() {
        let (mut l, log) = make_loop(CameraSource::Device { index: 0 });
        l.change_source(CameraSource::Device { index: 1 });
        let log = log.borrow();
        assert_eq!(log.released, 1);
        assert_eq!(
            log.opened,
            vec![CameraSource::Device { index: 0 }, CameraSource::Device { index: 1 }]
        );
        assert!(l.has_open_handle());
    }

    #[test]
    fn change_source_clears_old_image_even_when_new_opens() {
        let (mut l, log) = make_loop(CameraSource::Device { index: 0 });
        push_read(&log, Ok(frame(64, 36, 1)));
        assert_eq!(l.tick(), TickOutcome::Displayed);
        let generation = l.generation();

        l.change_source(CameraSource::Device { index: 1 });

        assert!(l.has_open_handle());
        assert_eq!(l.display(), &DisplayState::Placeholder(DEFAULT_PLACEHOLDER.into()));
        assert!(l.generation() > generation);
    }

    #[test]
    fn stop_twice_releases_once() {
        let (mut l, log) = make_loop(CameraSource::Device { index: 0 });
        l.start(30);
        l.stop();
        l.stop();
        assert_eq!(log.borrow().released, 1);
        assert!(!l.is_running());
        drop(l);
        assert_eq!(log.borrow().released, 1);
    }

    #[test]
    fn drop_releases_handle() {
        let (l, log) = make_loop(CameraSource::Device { index: 3 });
        drop(l);
        assert_eq!(log.borrow().released, 1);
    }

    #[test]
    fn zero_surface_drops_frame_and_keeps_state() {
        let (mut l, log) = make_loop(CameraSource::Device { index: 0 });
        l.resize(DisplayRegion::new(0, 0));
        push_read(&log, Ok(frame(64, 36, 1)));
        assert_eq!(l.tick(), TickOutcome::EmptySurface);
        assert_eq!(l.display(), &DisplayState::Placeholder(DEFAULT_PLACEHOLDER.into()));
    }

    #[test]
    fn zero_surface_keeps_displayed_image() {
        let (mut l, log) = make_loop(CameraSource::Device { index: 0 });
        push_read(&log, Ok(frame(64, 36, 1)));
        push_read(&log, Ok(frame(64, 36, 9)));
        assert_eq!(l.tick(), TickOutcome::Displayed);
        let before = l.display().clone();
        let generation = l.generation();

        l.resize(DisplayRegion::new(0, 0));
        assert_eq!(l.tick(), TickOutcome::EmptySurface);

        assert!(matches!(l.display(), DisplayState::Image(_)));
        assert_eq!(l.display(), &before);
        assert_eq!(l.generation(), generation);
    }

    #[test]
    fn poll_runs_only_when_due() {
        let (mut l, log) = make_loop(CameraSource::Device { index: 0 });
        push_read(&log, Ok(frame(64, 36, 1)));
        push_read(&log, Ok(frame(64, 36, 2)));

        assert_eq!(l.poll(Instant::now()), None, "não iniciado");

        l.start(30);
        let t0 = Instant::now();
        assert_eq!(l.poll(t0), Some(TickOutcome::Displayed));
        assert_eq!(l.poll(t0 + Duration::from_millis(10)), None);
        assert_eq!(
            l.time_until_next_tick(t0 + Duration::from_millis(10)),
            Some(Duration::from_millis(20))
        );
        assert_eq!(l.poll(t0 + Duration::from_millis(30)), Some(TickOutcome::Displayed));
        assert_eq!(l.stats().ticks, 2);

        l.stop();
        assert_eq!(l.poll(t0 + Duration::from_secs(1)), None);
        assert_eq!(l.time_until_next_tick(t0), None);
    }
}
