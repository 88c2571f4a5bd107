use crate::ui_framework::line_buffer::LineBuffer;

pub mod line_buffer;

pub trait Render {
    /// Lays the component out for a terminal `width` columns wide.
    fn render(&self, width: usize) -> LineBuffer;
}
