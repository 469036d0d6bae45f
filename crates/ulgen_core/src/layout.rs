//! Aritmética de layout: geometria da janela, modo responsivo e grid.

/// Spans do grid de 14 colunas (vídeo 6, dados 4, análise 4).
pub const GRID_SPANS: [u32; 3] = [6, 4, 4];

/// Posição e tamanho iniciais da janela, em pontos.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowGeometry {
    pub pos: [f32; 2],
    pub size: [f32; 2],
}

/// Janela centralizada cobrindo `fraction` do monitor.
pub fn window_geometry(monitor: [f32; 2], fraction: f32) -> WindowGeometry {
    let fraction = fraction.clamp(0.1, 1.0);
    let w = (monitor[0] * fraction).floor();
    let h = (monitor[1] * fraction).floor();
    WindowGeometry {
        pos: [((monitor[0] - w) / 2.0).floor(), ((monitor[1] - h) / 2.0).floor()],
        size: [w, h],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Cards lado a lado no grid de 14 colunas
    Wide,
    /// Cards empilhados em uma coluna
    Compact,
}

impl LayoutMode {
    pub fn for_width(width: f32, breakpoint: f32) -> Self {
        if width < breakpoint {
            LayoutMode::Compact
        } else {
            LayoutMode::Wide
        }
    }
}

/// Larguras das colunas do grid para `spans`, descontando o espaçamento.
pub fn grid_widths(available: f32, spacing: f32, spans: &[u32]) -> Vec<f32> {
    if spans.is_empty() {
        return Vec::new();
    }
    let total: u32 = spans.iter().sum::<u32>().max(1);
    let gaps = spacing * (spans.len() - 1) as f32;
    let usable = (available - gaps).max(0.0);
    spans
        .iter()
        .map(|&span| usable * span as f32 / total as f32)
        .collect()
}

/// Altura de uma área de largura `width` na proporção `num:den`.
pub fn height_for_ratio(width: f32, num: u32, den: u32) -> f32 {
    if num == 0 {
        return 0.0;
    }
    width * den as f32 / num as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_covers_ninety_percent_centered() {
        let g = window_geometry([1920.0, 1080.0], 0.9);
        assert_eq!(g.size, [1728.0, 972.0]);
        assert_eq!(g.pos, [96.0, 54.0]);
    }

    #[test]
    fn breakpoint_switches_mode() {
        assert_eq!(LayoutMode::for_width(999.0, 1000.0), LayoutMode::Compact);
        assert_eq!(LayoutMode::for_width(1000.0, 1000.0), LayoutMode::Wide);
    }

    #[test]
    fn grid_widths_follow_spans() {
        let w = grid_widths(1440.0, 20.0, &GRID_SPANS);
        assert_eq!(w.len(), 3);
        let sum: f32 = w.iter().sum();
        assert!((sum + 40.0 - 1440.0).abs() < 0.01);
        assert!((w[0] / w[1] - 1.5).abs() < 1e-4);
        assert_eq!(w[1], w[2]);
    }

    #[test]
    fn grid_widths_never_negative() {
        let w = grid_widths(10.0, 20.0, &GRID_SPANS);
        assert!(w.iter().all(|&x| x == 0.0));
        assert!(grid_widths(100.0, 5.0, &[]).is_empty());
    }

    #[test]
    fn ratio_height() {
        assert_eq!(height_for_ratio(640.0, 16, 9), 360.0);
        assert_eq!(height_for_ratio(640.0, 0, 9), 0.0);
    }
}
