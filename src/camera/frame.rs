use nalgebra::SMatrix;

use crate::constants::{NUM_FRAME_COLUMN, NUM_FRAME_PIXEL, NUM_FRAME_ROW};

pub type FrameMatrix = SMatrix<f64, NUM_FRAME_ROW, NUM_FRAME_COLUMN>;

/// Complete thermal image assembled from both subpages. The values are the
/// raw infrared levels, not calibrated temperatures.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub pixels: FrameMatrix,
}

impl Frame {
    /// Create the frame from the row-major buffer of the sensor. The sensor
    /// sees the scene mirrored, so the columns are flipped.
    ///
    /// # Arguments
    /// * `raw` - Raw buffer with 24 x 32 values.
    ///
    /// # Returns
    /// The frame, or None if the size of buffer is wrong.
    pub fn from_raw(raw: &[f64]) -> Option<Self> {
        if raw.len() != NUM_FRAME_PIXEL {
            return None;
        }

        let pixels = FrameMatrix::from_fn(|row, col| {
            raw[row * NUM_FRAME_COLUMN + (NUM_FRAME_COLUMN - col - 1)]
        });

        Some(Self { pixels })
    }

    /// Find the hottest pixel. The first one in the row-major order wins a
    /// tie.
    ///
    /// # Returns
    /// Row, column and value of the hottest pixel.
    pub fn hottest_pixel(&self) -> (usize, usize, f64) {
        let mut hottest = (0, 0, self.pixels[(0, 0)]);
        for row in 0..NUM_FRAME_ROW {
            for col in 0..NUM_FRAME_COLUMN {
                let value = self.pixels[(row, col)];
                if value > hottest.2 {
                    hottest = (row, col, value);
                }
            }
        }

        hottest
    }
}
