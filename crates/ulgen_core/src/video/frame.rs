//! Frame de câmera e transformações para exibição (cor, crop, escala).

use image::imageops::{self, FilterType};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bytes por pixel de um frame de 8 bits com 3 canais.
pub const BYTES_PER_PIXEL: usize = 3;

/// Ordem dos canais de cor no buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    /// Ordem nativa da maioria das câmeras (B, G, R)
    Bgr,
    /// Ordem esperada pela camada de pintura (R, G, B)
    Rgb,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("buffer de {actual} bytes não corresponde a {width}x{height} (esperado {expected})")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("frame vazio ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Um frame decodificado, produzido uma vez por leitura da câmera.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    order: ChannelOrder,
    data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, order: ChannelOrder, data: Vec<u8>) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::Empty { width, height });
        }
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(FrameError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            order,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Converte para a ordem RGB trocando os canais B e R quando necessário.
    pub fn into_rgb(mut self) -> Self {
        if self.order == ChannelOrder::Bgr {
            for px in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
                px.swap(0, 2);
            }
            self.order = ChannelOrder::Rgb;
        }
        self
    }

    fn into_rgb_image(self) -> Option<RgbImage> {
        let rgb = self.into_rgb();
        RgbImage::from_raw(rgb.width, rgb.height, rgb.data)
    }
}

// ──────────────────────────────────────────────
// Aspect ratio
// ──────────────────────────────────────────────

/// Proporção alvo `num:den` (ex: 16:9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AspectRatio {
    num: u32,
    den: u32,
}

impl AspectRatio {
    pub const WIDESCREEN: AspectRatio = AspectRatio { num: 16, den: 9 };

    /// Retorna `None` se algum termo for zero.
    pub fn new(num: u32, den: u32) -> Option<Self> {
        (num > 0 && den > 0).then_some(Self { num, den })
    }

    pub fn num(&self) -> u32 {
        self.num
    }

    pub fn den(&self) -> u32 {
        self.den
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.num, self.den)
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num, den) = s
            .split_once(':')
            .ok_or_else(|| format!("proporção inválida '{s}' (formato N:M)"))?;
        let num: u32 = num.trim().parse().map_err(|_| format!("numerador inválido em '{s}'"))?;
        let den: u32 = den.trim().parse().map_err(|_| format!("denominador inválido em '{s}'"))?;
        AspectRatio::new(num, den).ok_or_else(|| format!("proporção com termo zero: '{s}'"))
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(value: AspectRatio) -> Self {
        value.to_string()
    }
}

// ──────────────────────────────────────────────
// Geometria
// ──────────────────────────────────────────────

/// Região retangular dentro de um frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Dimensões em pixels da superfície de exibição.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayRegion {
    pub width: u32,
    pub height: u32,
}

impl DisplayRegion {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Calcula o recorte centralizado que leva `width x height` à proporção alvo.
///
/// A dimensão excedente é reduzida por divisão inteira e o offset é
/// `(excesso) / 2`, de modo que o pixel ímpar sobra no lado direito/inferior.
pub fn center_crop_rect(width: u32, height: u32, ratio: AspectRatio) -> CropRect {
    let (w, h) = (width as u64, height as u64);
    let (num, den) = (ratio.num as u64, ratio.den as u64);

    // w/h comparado a num/den sem ponto flutuante
    let lhs = w * den;
    let rhs = h * num;

    if lhs > rhs {
        // Largo demais: corta horizontalmente
        let new_w = ((h * num) / den).max(1).min(w);
        let offset = (w - new_w) / 2;
        CropRect {
            x: offset as u32,
            y: 0,
            width: new_w as u32,
            height,
        }
    } else if lhs < rhs {
        // Alto demais: corta verticalmente
        let new_h = ((w * den) / num).max(1).min(h);
        let offset = (h - new_h) / 2;
        CropRect {
            x: 0,
            y: offset as u32,
            width,
            height: new_h as u32,
        }
    } else {
        CropRect {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// Maior tamanho que cabe em `surface` mantendo a proporção de `src`.
///
/// Retorna `None` para superfície ou origem com dimensão zero.
pub fn fit_within(src: (u32, u32), surface: DisplayRegion) -> Option<(u32, u32)> {
    let (sw, sh) = src;
    if sw == 0 || sh == 0 || surface.is_empty() {
        return None;
    }
    let scale = f64::min(
        surface.width as f64 / sw as f64,
        surface.height as f64 / sh as f64,
    );
    let w = ((sw as f64 * scale).round() as u32).clamp(1, surface.width);
    let h = ((sh as f64 * scale).round() as u32).clamp(1, surface.height);
    Some((w, h))
}

// ──────────────────────────────────────────────
// Imagem pronta para pintura
// ──────────────────────────────────────────────

/// Buffer RGB já recortado e escalado para a superfície atual.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Converte, recorta e escala um frame para a superfície.
///
/// Retorna `None` se a superfície tiver dimensão zero.
pub fn render_for_display(
    frame: Frame,
    target: Option<AspectRatio>,
    surface: DisplayRegion,
) -> Option<DisplayImage> {
    if surface.is_empty() {
        return None;
    }

    let mut img = frame.into_rgb_image()?;

    if let Some(ratio) = target {
        let rect = center_crop_rect(img.width(), img.height(), ratio);
        if (rect.width, rect.height) != img.dimensions() {
            img = imageops::crop_imm(&img, rect.x, rect.y, rect.width, rect.height).to_image();
        }
    }

    let (w, h) = fit_within(img.dimensions(), surface)?;
    if (w, h) != img.dimensions() {
        img = imageops::resize(&img, w, h, FilterType::Triangle);
    }

    Some(DisplayImage {
        width: img.width(),
        height: img.height(),
        rgb: img.into_raw(),
    })
}
