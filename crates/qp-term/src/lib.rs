// SPDX-License-Identifier: MIT
//
// qp-term — the pixel layer of qpix.
//
// Each terminal character cell is split into 2×2 sub-pixels, stored as a
// packed byte (four quadrant bits plus a four-bit palette index), and drawn
// as one of the sixteen Unicode quadrant block glyphs. This crate owns that
// encoding, the grid that stores it, and the stateful writer that turns
// changed cells into as few escape bytes as possible.
//
// Like the rest of qpix it talks to the terminal with raw ANSI sequences:
// cursor addressing, SGR foregrounds, clear and reset. Nothing else is
// assumed about the terminal.

pub mod ansi;
pub mod cell;
pub mod color;
pub mod grid;
pub mod output;
pub mod terminal;
