//! Origem sintética: barras coloridas em movimento, entregues em BGR como
//! uma câmera USB comum.

use super::capture::{CaptureError, CaptureHandle};
use super::frame::{ChannelOrder, Frame};

pub const PATTERN_WIDTH: u32 = 640;
pub const PATTERN_HEIGHT: u32 = 480;

// Barras em BGR: branco, amarelo, ciano, verde, magenta, vermelho, azul, preto
const BARS: [[u8; 3]; 8] = [
    [255, 255, 255],
    [0, 255, 255],
    [255, 255, 0],
    [0, 255, 0],
    [255, 0, 255],
    [0, 0, 255],
    [255, 0, 0],
    [0, 0, 0],
];

pub struct TestPatternHandle {
    width: u32,
    height: u32,
    offset: u32,
    released: bool,
}

impl TestPatternHandle {
    pub fn new() -> Self {
        Self::with_size(PATTERN_WIDTH, PATTERN_HEIGHT)
    }

    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            offset: 0,
            released: false,
        }
    }

    fn draw(&self) -> Vec<u8> {
        let bar_w = (self.width / BARS.len() as u32).max(1);
        let mut data = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for _y in 0..self.height {
            for x in 0..self.width {
                let bar = (((x + self.offset) / bar_w) as usize) % BARS.len();
                data.extend_from_slice(&BARS[bar]);
            }
        }
        data
    }
}

impl Default for TestPatternHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureHandle for TestPatternHandle {
    fn read(&mut self) -> Result<Frame, CaptureError> {
        if self.released {
            return Err(CaptureError::EndOfStream);
        }
        let frame = Frame::new(self.width, self.height, ChannelOrder::Bgr, self.draw())?;
        self.offset = (self.offset + 4) % self.width;
        Ok(frame)
    }

    fn release(&mut self) {
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_frames_are_bgr_and_move() {
        let mut handle = TestPatternHandle::with_size(16, 2);
        let first = handle.read().unwrap();
        let second = handle.read().unwrap();
        assert_eq!(first.order(), ChannelOrder::Bgr);
        assert_eq!((first.width(), first.height()), (16, 2));
        assert_ne!(first.data(), second.data());
    }

    #[test]
    fn released_pattern_stops_streaming() {
        let mut handle = TestPatternHandle::new();
        handle.release();
        assert!(matches!(handle.read(), Err(CaptureError::EndOfStream)));
    }
}
