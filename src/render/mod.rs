//! Paint output: the display list gadgets record into.

pub mod canvas;

pub use canvas::{Canvas, IconImage, RenderOp};
