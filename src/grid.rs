#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid2 {
    rows: usize,
    cols: usize,
}

impl Grid2 {
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0, "rows must be > 0");
        assert!(cols > 0, "cols must be > 0");
        Self { rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn interior_size(&self) -> usize {
        self.rows * self.cols
    }

    pub fn padded_size(&self) -> usize {
        (self.rows + 2) * (self.cols + 2)
    }

    pub fn stride(&self) -> usize {
        self.cols + 2
    }

    pub fn offset(&self, i: i32, j: i32) -> usize {
        assert!(
            i >= -1 && i <= self.rows as i32 && j >= -1 && j <= self.cols as i32,
            "cell index out of range"
        );
        (i + 1) as usize * self.stride() + (j + 1) as usize
    }
}
