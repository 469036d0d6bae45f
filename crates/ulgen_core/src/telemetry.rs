//! Telemetria do veículo.
//!
//! A view nunca gera valores: ela lê de um [`TelemetrySource`] injetado.
//! [`SimulatedTelemetry`] ocupa o lugar de um feed real de sensores.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const HISTORY_SIZE: usize = 120; // 2 minutos a 1 amostra/s

// ──────────────────────────────────────────────
// Tipos
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SensorHealth {
    #[default]
    Ok,
    Degraded,
    Fault,
}

impl fmt::Display for SensorHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SensorHealth::Ok => "OK",
            SensorHealth::Degraded => "DEGRADED",
            SensorHealth::Fault => "FAULT",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Estado dos sensores de percepção.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorStatus {
    pub lidar: SensorHealth,
    pub radar: SensorHealth,
    pub camera: SensorHealth,
}

impl SensorStatus {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, SensorHealth)> {
        [("Lidar", self.lidar), ("Radar", self.radar), ("Camera", self.camera)].into_iter()
    }

    pub fn all_ok(&self) -> bool {
        self.iter().all(|(_, h)| h == SensorHealth::Ok)
    }
}

/// Card "Image Analysis".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInfo {
    /// Taxa de acerto do modelo (0–100%)
    pub accuracy_percent: f32,
    /// Tarefa em execução (`None` = ocioso)
    pub current_task: Option<String>,
    pub epochs_available: bool,
}

/// Card "DATASETS".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub mode: String,
    pub intake: String,
    pub frequency_hz: f32,
    pub sources_active: bool,
}

/// Uma leitura completa exibida pelo dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Temperatura (°C)
    pub temperature_c: f32,
    /// Bateria (0–100%)
    pub battery_percent: f32,
    /// Rumo (graus)
    pub bearing_deg: f32,
    /// Torque (Nm)
    pub torque_nm: f32,
    /// Potência (W)
    pub power_w: f32,
    /// Velocidade (km/h)
    pub speed_kmh: f32,
    /// Magnetômetro (µT)
    pub magnetometer: Vector3,
    pub sensors: SensorStatus,
    pub analysis: AnalysisInfo,
    pub dataset: DatasetInfo,
}

impl TelemetrySnapshot {
    /// Valores fixos do mock-up original do console.
    pub fn mockup() -> Self {
        Self {
            temperature_c: 13.0,
            battery_percent: 73.0,
            bearing_deg: 45.0,
            torque_nm: 2500.0,
            power_w: 10.0,
            speed_kmh: 0.0,
            magnetometer: Vector3::default(),
            sensors: SensorStatus::default(),
            analysis: AnalysisInfo {
                accuracy_percent: 10.0,
                current_task: None,
                epochs_available: false,
            },
            dataset: DatasetInfo {
                mode: "Performance".into(),
                intake: "Neutral".into(),
                frequency_hz: 10.7,
                sources_active: true,
            },
        }
    }
}

// ──────────────────────────────────────────────
// Fontes
// ──────────────────────────────────────────────

/// Fonte de telemetria consultada pela UI.
pub trait TelemetrySource {
    fn name(&self) -> &str;
    fn poll(&mut self) -> TelemetrySnapshot;
}

/// Sempre devolve o mesmo snapshot.
#[derive(Debug, Clone)]
pub struct StaticTelemetry {
    snapshot: TelemetrySnapshot,
}

impl StaticTelemetry {
    pub fn new(snapshot: TelemetrySnapshot) -> Self {
        Self { snapshot }
    }
}

impl Default for StaticTelemetry {
    fn default() -> Self {
        Self::new(TelemetrySnapshot::mockup())
    }
}

impl TelemetrySource for StaticTelemetry {
    fn name(&self) -> &str {
        "static"
    }

    fn poll(&mut self) -> TelemetrySnapshot {
        self.snapshot.clone()
    }
}

/// Random walk a partir do mock-up, limitado a faixas plausíveis.
pub struct SimulatedTelemetry {
    rng: StdRng,
    state: TelemetrySnapshot,
}

const TASKS: [&str; 3] = ["Object detection", "Terrain mapping", "Sample scan"];

impl SimulatedTelemetry {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            state: TelemetrySnapshot::mockup(),
        }
    }

    fn walk(&mut self, value: f32, step: f32, min: f32, max: f32) -> f32 {
        (value + self.rng.gen_range(-step..=step)).clamp(min, max)
    }

    fn health(&mut self) -> SensorHealth {
        match self.rng.gen_range(0..100) {
            0 => SensorHealth::Fault,
            1..=3 => SensorHealth::Degraded,
            _ => SensorHealth::Ok,
        }
    }
}

impl TelemetrySource for SimulatedTelemetry {
    fn name(&self) -> &str {
        "simulated"
    }

    fn poll(&mut self) -> TelemetrySnapshot {
        let s = self.state.clone();

        let temperature_c = self.walk(s.temperature_c, 1.5, 5.0, 95.0);
        let mut battery_percent = s.battery_percent - self.rng.gen_range(0.0f32..0.25);
        if battery_percent <= 5.0 {
            // Troca de bateria simulada
            battery_percent = 100.0;
        }
        let mut bearing_deg = (s.bearing_deg + self.rng.gen_range(-4.0f32..=4.0)).rem_euclid(360.0);
        if bearing_deg >= 360.0 {
            bearing_deg = 0.0;
        }
        let torque_nm = self.walk(s.torque_nm, 60.0, 1500.0, 3500.0);
        let power_w = self.walk(s.power_w, 1.0, 0.0, 40.0);
        let speed_kmh = self.walk(s.speed_kmh, 2.5, 0.0, 60.0);
        let magnetometer = Vector3 {
            x: self.walk(s.magnetometer.x, 0.8, -60.0, 60.0),
            y: self.walk(s.magnetometer.y, 0.8, -60.0, 60.0),
            z: self.walk(s.magnetometer.z, 0.8, -60.0, 60.0),
        };
        let sensors = SensorStatus {
            lidar: self.health(),
            radar: self.health(),
            camera: self.health(),
        };
        let accuracy_percent = self.walk(s.analysis.accuracy_percent, 2.0, 0.0, 100.0);
        let current_task = if self.rng.gen_bool(0.1) {
            if s.analysis.current_task.is_some() {
                None
            } else {
                Some(TASKS[self.rng.gen_range(0..TASKS.len())].to_string())
            }
        } else {
            s.analysis.current_task.clone()
        };
        let frequency_hz = self.walk(s.dataset.frequency_hz, 0.2, 5.0, 20.0);

        self.state = TelemetrySnapshot {
            temperature_c,
            battery_percent,
            bearing_deg,
            torque_nm,
            power_w,
            speed_kmh,
            magnetometer,
            sensors,
            analysis: AnalysisInfo {
                accuracy_percent,
                epochs_available: current_task.is_some(),
                current_task,
            },
            dataset: DatasetInfo {
                frequency_hz,
                ..s.dataset
            },
        };
        self.state.clone()
    }
}

/// Tipo de fonte selecionável em `config.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TelemetrySourceKind {
    #[default]
    Simulated,
    Static,
}

pub fn build_source(kind: TelemetrySourceKind, seed: Option<u64>) -> Box<dyn TelemetrySource> {
    match kind {
        TelemetrySourceKind::Simulated => Box::new(SimulatedTelemetry::new(seed)),
        TelemetrySourceKind::Static => Box::new(StaticTelemetry::default()),
    }
}

// ──────────────────────────────────────────────
// Histórico para gráficos
// ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TelemetryHistory {
    pub temperature: VecDeque<f64>,
    pub battery: VecDeque<f64>,
    pub power: VecDeque<f64>,
    pub speed: VecDeque<f64>,
}

impl TelemetryHistory {
    pub fn new() -> Self {
        Self {
            temperature: VecDeque::with_capacity(HISTORY_SIZE),
            battery: VecDeque::with_capacity(HISTORY_SIZE),
            power: VecDeque::with_capacity(HISTORY_SIZE),
            speed: VecDeque::with_capacity(HISTORY_SIZE),
        }
    }

    pub fn push(&mut self, s: &TelemetrySnapshot) {
        Self::push_deque(&mut self.temperature, s.temperature_c as f64);
        Self::push_deque(&mut self.battery, s.battery_percent as f64);
        Self::push_deque(&mut self.power, s.power_w as f64);
        Self::push_deque(&mut self.speed, s.speed_kmh as f64);
    }

    fn push_deque(deque: &mut VecDeque<f64>, val: f64) {
        if deque.len() >= HISTORY_SIZE {
            deque.pop_front();
        }
        deque.push_back(val);
    }
}

impl Default for TelemetryHistory {
    fn default() -> Self {
        Self::new()
    }
}

// ──────────────────────────────────────────────
// Poller
// ──────────────────────────────────────────────

/// Consulta a fonte em intervalo fixo, na thread de UI.
pub struct TelemetryPoller {
    source: Box<dyn TelemetrySource>,
    interval: Duration,
    next_poll: Instant,
    latest: Option<TelemetrySnapshot>,
    history: TelemetryHistory,
}

impl TelemetryPoller {
    pub fn new(source: Box<dyn TelemetrySource>, interval: Duration) -> Self {
        info!("Fonte de telemetria: {} ({} ms)", source.name(), interval.as_millis());
        Self {
            source,
            interval,
            next_poll: Instant::now(),
            latest: None,
            history: TelemetryHistory::new(),
        }
    }

    /// Consulta a fonte se o intervalo venceu. Retorna `true` se houve leitura.
    pub fn poll_if_due(&mut self, now: Instant) -> bool {
        if now < self.next_poll {
            return false;
        }
        self.next_poll = now + self.interval;
        let snapshot = self.source.poll();
        debug!(
            "Telemetria: {:.1}°C | bateria {:.0}% | {:.1} km/h",
            snapshot.temperature_c, snapshot.battery_percent, snapshot.speed_kmh
        );
        self.history.push(&snapshot);
        self.latest = Some(snapshot);
        true
    }

    pub fn time_until_next_poll(&self, now: Instant) -> Duration {
        self.next_poll.saturating_duration_since(now)
    }

    pub fn latest(&self) -> Option<&TelemetrySnapshot> {
        self.latest.as_ref()
    }

    pub fn history(&self) -> &TelemetryHistory {
        &self.history
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_source_returns_mockup() {
        let mut src = StaticTelemetry::default();
        let a = src.poll();
        assert_eq!(a, src.poll());
        assert_eq!(a.battery_percent, 73.0);
        assert_eq!(a.dataset.mode, "Performance");
    }

    #[test]
    fn simulated_is_deterministic_with_seed() {
        let mut a = SimulatedTelemetry::new(Some(7));
        let mut b = SimulatedTelemetry::new(Some(7));
        for _ in 0..20 {
            assert_eq!(a.poll(), b.poll());
        }
    }

    #[test]
    fn simulated_values_stay_in_range() {
        let mut src = SimulatedTelemetry::new(Some(42));
        for _ in 0..2000 {
            let s = src.poll();
            assert!((5.0..=95.0).contains(&s.temperature_c));
            assert!(s.battery_percent > 5.0 && s.battery_percent <= 100.0);
            assert!((0.0..360.0).contains(&s.bearing_deg));
            assert!((0.0..=100.0).contains(&s.analysis.accuracy_percent));
            assert_eq!(s.analysis.epochs_available, s.analysis.current_task.is_some());
        }
    }

    #[test]
    fn history_is_bounded() {
        let mut h = TelemetryHistory::new();
        let s = TelemetrySnapshot::mockup();
        for _ in 0..HISTORY_SIZE + 10 {
            h.push(&s);
        }
        assert_eq!(h.temperature.len(), HISTORY_SIZE);
        assert_eq!(h.battery.len(), HISTORY_SIZE);
    }

    #[test]
    fn poller_respects_interval() {
        let mut poller = TelemetryPoller::new(Box::new(StaticTelemetry::default()), Duration::from_secs(1));
        let t0 = Instant::now();
        assert!(poller.poll_if_due(t0));
        assert!(!poller.poll_if_due(t0 + Duration::from_millis(500)));
        assert!(poller.poll_if_due(t0 + Duration::from_secs(1)));
        assert_eq!(poller.history().speed.len(), 2);
        assert_eq!(poller.latest().map(|s| s.torque_nm), Some(2500.0));
        assert_eq!(poller.source_name(), "static");
    }

    #[test]
    fn sensor_status_iter() {
        let mut s = SensorStatus::default();
        assert!(s.all_ok());
        s.radar = SensorHealth::Fault;
        assert!(!s.all_ok());
        assert_eq!(s.iter().map(|(n, _)| n).collect::<Vec<_>>(), ["Lidar", "Radar", "Camera"]);
    }
}
