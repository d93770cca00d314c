// Style module for color math and readable palettes
// Author: Gabriel Demetrios Lafis

mod color;

pub use color::*;
