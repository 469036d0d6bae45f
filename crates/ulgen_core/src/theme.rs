//! Temas visuais do dashboard.
//!
//! Uma única tabela de paletas indexada por `(Platform, ThemeMode)`,
//! consultada uma vez na inicialização (e de novo quando o usuário troca o
//! tema). O resultado é um [`Appearance`] passado explicitamente para as
//! funções de view.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cor em formato hex string (ex: "#FFB300").
/// A conversão para `egui::Color32` é feita no dashboard.
pub type ColorHex = &'static str;

/// Converte uma string hex "#RRGGBB" para tupla (r, g, b).
pub fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return (255, 255, 255); // fallback branco
    }
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);
    (r, g, b)
}

// ──────────────────────────────────────────────
// Preferência / modo
// ──────────────────────────────────────────────

/// Preferência persistida do usuário.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemePreference {
    pub const ALL: [ThemePreference; 3] = [Self::System, Self::Light, Self::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Rótulo do menu de temas.
    pub fn label(&self) -> &'static str {
        match self {
            Self::System => "System Theme",
            Self::Light => "Light Theme",
            Self::Dark => "Dark Theme",
        }
    }

    /// Próxima preferência no ciclo System → Light → Dark.
    pub fn next(&self) -> Self {
        match self {
            Self::System => Self::Light,
            Self::Light => Self::Dark,
            Self::Dark => Self::System,
        }
    }

    /// Resolve para um modo concreto. `system` é o tema informado pelo
    /// toolkit; sem ele, o modo claro é usado.
    pub fn resolve(&self, system: Option<ThemeMode>) -> ThemeMode {
        match self {
            Self::Light => ThemeMode::Light,
            Self::Dark => ThemeMode::Dark,
            Self::System => system.unwrap_or(ThemeMode::Light),
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "system" => Ok(Self::System),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("tema desconhecido: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    /// Classifica pela luminosidade HSL da cor de janela (< 128 ⇒ escuro).
    pub fn from_window_color(r: u8, g: u8, b: u8) -> Self {
        let max = r.max(g).max(b) as u16;
        let min = r.min(g).min(b) as u16;
        if (max + min) / 2 < 128 {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }
}

// ──────────────────────────────────────────────
// Plataforma
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Qualquer SO não reconhecido usa o estilo Linux.
    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" => Platform::MacOs,
            "windows" => Platform::Windows,
            _ => Platform::Linux,
        }
    }

    pub fn style(&self) -> PlatformStyle {
        match self {
            Platform::MacOs => PlatformStyle {
                display_name: "Darwin",
                corner_radius: 12.0,
            },
            Platform::Windows => PlatformStyle {
                display_name: "Windows",
                corner_radius: 8.0,
            },
            Platform::Linux => PlatformStyle {
                display_name: "Linux",
                corner_radius: 10.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformStyle {
    pub display_name: &'static str,
    pub corner_radius: f32,
}

// ──────────────────────────────────────────────
// Paletas
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub bg: ColorHex,
    pub card: ColorHex,
    pub card_border: ColorHex,
    pub text: ColorHex,
    pub text_secondary: ColorHex,
    pub primary: ColorHex,
    pub accent: ColorHex,
    pub gray: ColorHex,
    pub success: ColorHex,
    pub warning: ColorHex,
    pub danger: ColorHex,
    pub info: ColorHex,
    pub button_bg: ColorHex,
    pub button_text: ColorHex,
    pub preview_bg: ColorHex,
}

const DARK: Palette = Palette {
    bg: "#212121",
    card: "#2D2D2D",
    card_border: "#3D3D3D",
    text: "#E0E0E0",
    text_secondary: "#9E9E9E",
    primary: "#FFB300",
    accent: "#BA68C8",
    gray: "#9E9E9E",
    success: "#66BB6A",
    warning: "#FFA726",
    danger: "#EF5350",
    info: "#42A5F5",
    button_bg: "#333333",
    button_text: "#FFFFFF",
    preview_bg: "#212121",
};

const fn light(bg: ColorHex, card_border: ColorHex) -> Palette {
    Palette {
        bg,
        card: "#FFFFFF",
        card_border,
        text: "#333333",
        text_secondary: "#757575",
        primary: "#FFB300",
        accent: "#AB47BC",
        gray: "#757575",
        success: "#43A047",
        warning: "#FB8C00",
        danger: "#E53935",
        info: "#1E88E5",
        button_bg: "#EDE7F6",
        button_text: "#673AB7",
        preview_bg: "#EBEEFB",
    }
}

static PALETTES: [(Platform, ThemeMode, Palette); 6] = [
    (Platform::MacOs, ThemeMode::Light, light("#F6F6F6", "#E5E5E5")),
    (Platform::Windows, ThemeMode::Light, light("#F0F0F0", "#E0E0E0")),
    (Platform::Linux, ThemeMode::Light, light("#F5F5F5", "#DDDDDD")),
    (Platform::MacOs, ThemeMode::Dark, DARK),
    (Platform::Windows, ThemeMode::Dark, DARK),
    (Platform::Linux, ThemeMode::Dark, DARK),
];

/// Busca a paleta para o par plataforma/modo.
pub fn palette(platform: Platform, mode: ThemeMode) -> &'static Palette {
    PALETTES
        .iter()
        .find(|(p, m, _)| *p == platform && *m == mode)
        .map(|(_, _, palette)| palette)
        .unwrap_or(&DARK)
}

// ──────────────────────────────────────────────
// Aparência resolvida
// ──────────────────────────────────────────────

/// Tudo que as views precisam saber sobre o visual atual.
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub preference: ThemePreference,
    pub mode: ThemeMode,
    pub platform: Platform,
    pub palette: &'static Palette,
    pub style: PlatformStyle,
}

impl Appearance {
    pub fn resolve(preference: ThemePreference, platform: Platform, system: Option<ThemeMode>) -> Self {
        let mode = preference.resolve(system);
        Self {
            preference,
            mode,
            platform,
            palette: palette(platform, mode),
            style: platform.style(),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.mode == ThemeMode::Dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_to_rgb_valid() {
        assert_eq!(hex_to_rgb("#ff0000"), (255, 0, 0));
        assert_eq!(hex_to_rgb("#FFB300"), (255, 179, 0));
        assert_eq!(hex_to_rgb("212121"), (33, 33, 33));
        assert_eq!(hex_to_rgb("#fff"), (255, 255, 255));
    }

    #[test]
    fn every_pair_has_a_palette() {
        for platform in [Platform::MacOs, Platform::Windows, Platform::Linux] {
            for mode in [ThemeMode::Light, ThemeMode::Dark] {
                let found = PALETTES.iter().filter(|(p, m, _)| *p == platform && *m == mode).count();
                assert_eq!(found, 1, "{platform:?}/{mode:?}");
            }
        }
    }

    #[test]
    fn dark_is_shared_and_light_differs_per_platform() {
        assert_eq!(palette(Platform::MacOs, ThemeMode::Dark), palette(Platform::Linux, ThemeMode::Dark));
        assert_eq!(palette(Platform::Windows, ThemeMode::Light).bg, "#F0F0F0");
        assert_eq!(palette(Platform::MacOs, ThemeMode::Light).card_border, "#E5E5E5");
        assert_eq!(palette(Platform::Linux, ThemeMode::Light).bg, "#F5F5F5");
    }

    #[test]
    fn preference_resolution() {
        assert_eq!(ThemePreference::Dark.resolve(Some(ThemeMode::Light)), ThemeMode::Dark);
        assert_eq!(ThemePreference::Light.resolve(Some(ThemeMode::Dark)), ThemeMode::Light);
        assert_eq!(ThemePreference::System.resolve(Some(ThemeMode::Dark)), ThemeMode::Dark);
        assert_eq!(ThemePreference::System.resolve(None), ThemeMode::Light);
    }

    #[test]
    fn window_lightness_threshold() {
        assert_eq!(ThemeMode::from_window_color(0x21, 0x21, 0x21), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_window_color(0xF0, 0xF0, 0xF0), ThemeMode::Light);
        // (255 + 0) / 2 = 127 → escuro
        assert_eq!(ThemeMode::from_window_color(255, 0, 0), ThemeMode::Dark);
    }

    #[test]
    fn preference_parse_and_cycle() {
        assert_eq!("Dark".parse::<ThemePreference>().unwrap(), ThemePreference::Dark);
        assert!("cyberpunk".parse::<ThemePreference>().is_err());
        let mut p = ThemePreference::System;
        for _ in 0..3 {
            p = p.next();
        }
        assert_eq!(p, ThemePreference::System);
    }

    #[test]
    fn platform_detection() {
        assert_eq!(Platform::from_os("macos"), Platform::MacOs);
        assert_eq!(Platform::from_os("windows"), Platform::Windows);
        assert_eq!(Platform::from_os("freebsd"), Platform::Linux);
        assert_eq!(Platform::Windows.style().corner_radius, 8.0);
    }

    #[test]
    fn appearance_uses_table() {
        let a = Appearance::resolve(ThemePreference::Dark, Platform::Windows, None);
        assert!(a.is_dark());
        assert_eq!(a.palette.bg, "#212121");
        assert_eq!(a.style.display_name, "Windows");
    }
}
