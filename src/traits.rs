use ndarray::{ArrayBase, Data, Ix2};

use crate::colormap::ColorRange;

/// Heatmap colors for the cells of a matrix, in row-major order.
pub trait CellColor {
    /// 3 RGB values per cell. NaN cells are white.
    fn cell_colors_rgb(&self, range: &ColorRange) -> Vec<u8>;
    /// 4 RGBA values per cell. NaN cells are fully transparent.
    fn cell_colors_rgba(&self, range: &ColorRange) -> Vec<u8>;
}

impl<S> CellColor for ArrayBase<S, Ix2>
where
    S: Data<Elem = f64>,
{
    fn cell_colors_rgb(&self, range: &ColorRange) -> Vec<u8> {
        let mut colors: Vec<u8> = Vec::with_capacity(self.len() * 3);
        for value in self.iter() {
            colors.extend_from_slice(&range.color(*value).unwrap_or([255, 255, 255]));
        }
        colors
    }

    fn cell_colors_rgba(&self, range: &ColorRange) -> Vec<u8> {
        let mut colors: Vec<u8> = Vec::with_capacity(self.len() * 4);
        for value in self.iter() {
            match range.color(*value) {
                Some(rgb) => {
                    colors.extend_from_slice(&rgb);
                    colors.push(255);
                }
                None => colors.extend_from_slice(&[0, 0, 0, 0]),
            }
        }
        colors
    }
}
