/// Default number of blocks searched above and below the requester's eyes.
pub const VERTICAL_REACH: i32 = 10;

/// Inclusive world-space y range the search may enter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchWindow {
    pub min_y: i32,
    pub max_y: i32,
}

impl SearchWindow {
    #[inline]
    pub const fn new(min_y: i32, max_y: i32) -> Self {
        Self { min_y, max_y }
    }

    /// `reach` blocks either side of `eye_y`, clipped to `0..world_height`.
    pub fn around_eye(eye_y: i32, world_height: i32, reach: i32) -> Self {
        let min_y = (eye_y - reach).max(0);
        let max_y = (eye_y + reach).min(world_height).min(world_height - 1);
        Self { min_y, max_y }
    }

    /// Number of layers in the window; 0 when the range is inverted.
    #[inline]
    pub fn height(&self) -> usize {
        if self.max_y < self.min_y {
            0
        } else {
            (self.max_y - self.min_y + 1) as usize
        }
    }

    #[inline]
    pub fn contains(&self, y: i32) -> bool {
        y >= self.min_y && y <= self.max_y
    }
}
