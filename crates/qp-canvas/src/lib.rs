// SPDX-License-Identifier: MIT
//
// qp-canvas — vector drawing on a quadrant-pixel terminal canvas.
//
// Builds on qp-term's packed grid and cell writer:
//
//   geometry — line, circle, winding-number and quad fill rasterization
//   font     — JSON glyph tables, lazy per-size cache, text layout
//   blit     — cell compositing between grids
//   config   — TOML canvas configuration
//   canvas   — the immediate-mode `Canvas` tying it all together
//
// Drawing is immediate: each call updates the grid and redraws the cells it
// touched before returning.

pub mod blit;
pub mod canvas;
pub mod config;
pub mod error;
pub mod font;
pub mod geometry;

pub use canvas::Canvas;
pub use config::CanvasConfig;
pub use error::{CanvasError, Result};
