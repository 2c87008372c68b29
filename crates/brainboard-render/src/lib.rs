//! Brainboard Render Library
//!
//! Surface abstraction and painting for Brainboard. Hosts implement
//! [`Surface`] over their raster backend; [`paint`] draws the live view and
//! [`export`] draws a content-sized image of the board.

mod painter;
mod renderer;

pub use painter::{export, paint, render_element, render_selection};
pub use renderer::{RenderContext, RenderResult, RendererError, Surface};
