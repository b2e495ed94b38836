//! The drawing surface the diff view paints onto

use thiserror::Error;

/// Rows and columns available on a render surface, chrome included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewDimension {
    pub rows: usize,
    pub cols: usize,
}

/// Errors a render surface can report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("row {row} is outside a surface of {rows} rows")]
    RowOutOfBounds { row: usize, rows: usize },
    #[error("surface too small to draw {0}")]
    TooSmall(&'static str),
}

/// A bordered, titled panel that text rows can be written into.
///
/// Row 0 and the last row belong to the border; title and footer are written
/// onto them. Every call may fail, and callers pass failures on unchanged.
pub trait RenderSurface {
    type Error: std::error::Error;

    fn rows(&self) -> usize;

    fn cols(&self) -> usize;

    fn dimension(&self) -> ViewDimension {
        ViewDimension {
            rows: self.rows(),
            cols: self.cols(),
        }
    }

    /// Write `text` on `row`, skipping its first `start_column` columns
    fn set_row(&mut self, row: usize, start_column: usize, text: &str) -> Result<(), Self::Error>;

    /// Mark `row` as the cursor row; `active` selects the focused highlight
    fn set_selected_row(&mut self, row: usize, active: bool) -> Result<(), Self::Error>;

    fn draw_border(&mut self);

    fn set_title(&mut self, title: &str) -> Result<(), Self::Error>;

    fn set_footer(&mut self, footer: &str) -> Result<(), Self::Error>;
}
