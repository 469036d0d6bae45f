//! Sistema de alertas – níveis, avaliação de thresholds e barra de issues.

use crate::config::AlertThresholds;
use crate::telemetry::{SensorHealth, TelemetrySnapshot};
use serde::{Deserialize, Serialize};

/// Nível de alerta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Normal,
    Warning,
    Critical,
}

/// Um alerta disparado.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub metric: String,
    pub label: String,
    pub detail: String,
    pub level: AlertLevel,
}

/// Avalia um snapshot contra os thresholds e retorna alertas.
pub fn evaluate_alerts(snapshot: &TelemetrySnapshot, thresholds: &AlertThresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();

    // Temperatura
    check_high(
        &mut alerts,
        "temperature",
        "Temp",
        snapshot.temperature_c,
        "°C",
        thresholds.temperature_warning,
        thresholds.temperature_critical,
    );

    // Potência
    check_high(
        &mut alerts,
        "power",
        "Watt",
        snapshot.power_w,
        "W",
        thresholds.power_warning,
        thresholds.power_critical,
    );

    // Bateria: quanto menor, pior
    let battery = level_for_low_value(
        snapshot.battery_percent,
        thresholds.battery_warning,
        thresholds.battery_critical,
    );
    if battery != AlertLevel::Normal {
        alerts.push(Alert {
            metric: "battery".into(),
            label: "Battery".into(),
            detail: format!("{:.0}%", snapshot.battery_percent),
            level: battery,
        });
    }

    // Sensores
    for (name, health) in snapshot.sensors.iter() {
        let level = match health {
            SensorHealth::Ok => continue,
            SensorHealth::Degraded => AlertLevel::Warning,
            SensorHealth::Fault => AlertLevel::Critical,
        };
        alerts.push(Alert {
            metric: format!("sensor_{}", name.to_lowercase()),
            label: name.into(),
            detail: health.to_string(),
            level,
        });
    }

    alerts
}

fn check_high(
    alerts: &mut Vec<Alert>,
    metric: &str,
    label: &str,
    value: f32,
    unit: &str,
    warn: f32,
    crit: f32,
) {
    let level = level_for_value(value, warn, crit);
    if level == AlertLevel::Normal {
        return;
    }
    alerts.push(Alert {
        metric: metric.into(),
        label: label.into(),
        detail: format!("{value:.1}{unit}"),
        level,
    });
}

/// Retorna o [`AlertLevel`] para um valor dado thresholds.
pub fn level_for_value(value: f32, warn: f32, crit: f32) -> AlertLevel {
    if value >= crit {
        AlertLevel::Critical
    } else if value >= warn {
        AlertLevel::Warning
    } else {
        AlertLevel::Normal
    }
}

/// Variante para métricas em que valores baixos são ruins (bateria).
pub fn level_for_low_value(value: f32, warn: f32, crit: f32) -> AlertLevel {
    if value <= crit {
        AlertLevel::Critical
    } else if value <= warn {
        AlertLevel::Warning
    } else {
        AlertLevel::Normal
    }
}

/// Nível mais grave da lista.
pub fn worst_level(alerts: &[Alert]) -> AlertLevel {
    alerts.iter().map(|a| a.level).max().unwrap_or(AlertLevel::Normal)
}

/// Texto da barra inferior ("1 Issue Detected").
pub fn issue_summary(count: usize) -> String {
    match count {
        0 => "No Issues".into(),
        1 => "1 Issue Detected".into(),
        n => format!("{n} Issues Detected"),
    }
}

// ──────────────────────────────────────────────
// Barra de issues
// ──────────────────────────────────────────────

/// Estado da barra de issues. Fechar a barra a esconde até que o conjunto
/// de métricas em alerta mude.
#[derive(Debug, Default)]
pub struct IssueBar {
    dismissed: Option<Vec<String>>,
}

impl IssueBar {
    fn key(alerts: &[Alert]) -> Vec<String> {
        let mut metrics: Vec<String> = alerts.iter().map(|a| a.metric.clone()).collect();
        metrics.sort();
        metrics
    }

    pub fn is_visible(&self, alerts: &[Alert]) -> bool {
        if alerts.is_empty() {
            return false;
        }
        self.dismissed.as_ref() != Some(&Self::key(alerts))
    }

    pub fn dismiss(&mut self, alerts: &[Alert]) {
        self.dismissed = Some(Self::key(alerts));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::TelemetrySnapshot;

    #[test]
    fn mockup_has_no_alerts() {
        let alerts = evaluate_alerts(&TelemetrySnapshot::mockup(), &AlertThresholds::default());
        assert!(alerts.is_empty(), "{alerts:?}");
        assert_eq!(worst_level(&alerts), AlertLevel::Normal);
    }

    #[test]
    fn high_temperature_and_low_battery() {
        let mut s = TelemetrySnapshot::mockup();
        s.temperature_c = 85.0;
        s.battery_percent = 20.0;
        let alerts = evaluate_alerts(&s, &AlertThresholds::default());

        let temp = alerts.iter().find(|a| a.metric == "temperature").unwrap();
        assert_eq!(temp.level, AlertLevel::Critical);
        assert_eq!(temp.detail, "85.0°C");
        let battery = alerts.iter().find(|a| a.metric == "battery").unwrap();
        assert_eq!(battery.level, AlertLevel::Warning);
        assert_eq!(worst_level(&alerts), AlertLevel::Critical);
    }

    #[test]
    fn sensor_faults_raise_alerts() {
        let mut s = TelemetrySnapshot::mockup();
        s.sensors.lidar = SensorHealth::Degraded;
        s.sensors.camera = SensorHealth::Fault;
        let alerts = evaluate_alerts(&s, &AlertThresholds::default());
        let metrics: Vec<_> = alerts.iter().map(|a| (a.metric.as_str(), a.level)).collect();
        assert_eq!(
            metrics,
            vec![("sensor_lidar", AlertLevel::Warning), ("sensor_camera", AlertLevel::Critical)]
        );
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(level_for_value(69.9, 70.0, 85.0), AlertLevel::Normal);
        assert_eq!(level_for_value(70.0, 70.0, 85.0), AlertLevel::Warning);
        assert_eq!(level_for_value(85.0, 70.0, 85.0), AlertLevel::Critical);
        assert_eq!(level_for_low_value(10.0, 25.0, 10.0), AlertLevel::Critical);
        assert_eq!(level_for_low_value(25.0, 25.0, 10.0), AlertLevel::Warning);
        assert_eq!(level_for_low_value(25.1, 25.0, 10.0), AlertLevel::Normal);
    }

    #[test]
    fn issue_summary_text() {
        assert_eq!(issue_summary(1), "1 Issue Detected");
        assert_eq!(issue_summary(3), "3 Issues Detected");
    }

    #[test]
    fn dismissed_bar_reappears_when_issues_change() {
        let mut s = TelemetrySnapshot::mockup();
        s.temperature_c = 90.0;
        let th = AlertThresholds::default();
        let first = evaluate_alerts(&s, &th);

        let mut bar = IssueBar::default();
        assert!(bar.is_visible(&first));
        bar.dismiss(&first);
        assert!(!bar.is_visible(&first));

        // Mesmo conjunto com valor diferente continua escondido
        s.temperature_c = 91.0;
        assert!(!bar.is_visible(&evaluate_alerts(&s, &th)));

        s.battery_percent = 5.0;
        assert!(bar.is_visible(&evaluate_alerts(&s, &th)));
        assert!(!bar.is_visible(&[]));
    }
}
