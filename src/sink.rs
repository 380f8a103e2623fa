//! Render sink — the opaque display boundary.
//!
//! The engine hands the sink a `{layer1, layer2}` configuration and an
//! `animate` flag and never looks inside. `PatternSink` is the concrete
//! terminal implementation: it derives waveform parameters from the layer
//! pair and draws an animated interference pattern. `NullSink` swallows
//! everything and backs the tests.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{cursor, queue, style};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkConfig {
    pub layer1: i32,
    pub layer2: i32,
}

pub trait RenderSink {
    fn configure(&mut self, cfg: SinkConfig);
    fn animate(&mut self, on: bool);
}

// ---------------------------------------------------------------------------
// Null sink
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct NullSink {
    pub cfg: SinkConfig,
    pub animating: bool,
    pub configures: u32,
}

impl RenderSink for NullSink {
    fn configure(&mut self, cfg: SinkConfig) {
        self.cfg = cfg;
        self.configures += 1;
    }

    fn animate(&mut self, on: bool) {
        self.animating = on;
    }
}

// ---------------------------------------------------------------------------
// Terminal pattern sink
// ---------------------------------------------------------------------------

const GLYPHS: [char; 6] = [' ', '.', ':', '=', '%', '#'];

pub struct PatternSink {
    cfg: SinkConfig,
    animating: bool,
    phase: f32,
}

impl PatternSink {
    pub fn new() -> Self {
        PatternSink {
            cfg: SinkConfig::default(),
            animating: false,
            phase: 0.0,
        }
    }

    /// Draw one frame of the backdrop into the given region. The layer
    /// values only select the pattern; what they mean is this sink's own
    /// business.
    pub fn draw(
        &mut self,
        stdout: &mut io::Stdout,
        width: u16,
        height: u16,
        top: u16,
    ) -> Result<()> {
        if self.animating {
            self.phase += 0.09;
        }

        // Each layer contributes one wave; frequency and hue come from the
        // layer value so every pair looks distinct.
        let (f1, hue1) = wave_params(self.cfg.layer1);
        let (f2, hue2) = wave_params(self.cfg.layer2);

        for row in 0..height {
            queue!(stdout, cursor::MoveTo(0, top + row))?;
            let y = row as f32;
            for col in 0..width {
                let x = col as f32;
                let a = (x * f1 + y * 0.23 + self.phase).sin();
                let b = (y * f2 - x * 0.11 + self.phase * 1.7).sin();
                let v = (a + b) * 0.25 + 0.5; // into [0,1]
                let glyph = GLYPHS[((v * (GLYPHS.len() - 1) as f32) as usize).min(GLYPHS.len() - 1)];
                let color = if v > 0.5 { hue1 } else { hue2 };
                queue!(
                    stdout,
                    style::SetForegroundColor(color),
                    style::Print(glyph)
                )?;
            }
        }
        queue!(stdout, style::ResetColor)?;
        stdout.flush()?;
        Ok(())
    }
}

impl Default for PatternSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for PatternSink {
    fn configure(&mut self, cfg: SinkConfig) {
        self.cfg = cfg;
    }

    fn animate(&mut self, on: bool) {
        self.animating = on;
    }
}

fn wave_params(layer: i32) -> (f32, style::Color) {
    let folded = layer.rem_euclid(crate::layer::MAX_LAYER_VALUE) as f32;
    let freq = 0.05 + folded * 0.002;
    let hue = style::Color::AnsiValue(16 + (folded as u8 % 216));
    (freq, hue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sink_records_configuration() {
        let mut sink = NullSink::default();
        sink.configure(SinkConfig {
            layer1: 86,
            layer2: 0,
        });
        sink.animate(true);
        assert_eq!(sink.cfg.layer1, 86);
        assert!(sink.animating);
        assert_eq!(sink.configures, 1);
    }

    #[test]
    fn wave_params_fold_out_of_range_layers() {
        // Shifted layers may sit outside [0, 327); the sink must not panic.
        let (_, _) = wave_params(-12);
        let (_, _) = wave_params(10_000);
        let (f, _) = wave_params(0);
        assert!(f > 0.0);
    }
}
