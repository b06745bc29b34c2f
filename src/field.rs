use crate::grid::Grid2;
use rayon::prelude::*;
use std::fmt::{Display, Write as _};
use std::mem;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::OnceLock;

const PAR_THRESHOLD_DEFAULT: usize = 65_536;
const PAR_MIN_WORK_PER_THREAD: usize = 4096;

fn parallel_threshold() -> usize {
    static THRESHOLD: OnceLock<usize> = OnceLock::new();
    *THRESHOLD.get_or_init(|| {
        std::env::var("FLUID_PAR_THRESHOLD")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(PAR_THRESHOLD_DEFAULT)
    })
}

fn should_parallel(len: usize) -> bool {
    if len < parallel_threshold() {
        return false;
    }
    let threads = rayon::current_num_threads().max(1);
    len / threads >= PAR_MIN_WORK_PER_THREAD
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryCondition {
    Clone,
    Negative,
    DontCare,
}

pub trait CellValue:
    Copy
    + Default
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Mul<f32, Output = Self>
    + Div<f32, Output = Self>
{
}

impl<T> CellValue for T where
    T: Copy
        + Default
        + Send
        + Sync
        + Add<Output = T>
        + Sub<Output = T>
        + Neg<Output = T>
        + Mul<f32, Output = T>
        + Div<f32, Output = T>
{
}

pub fn bilerp<T: CellValue>(di: f32, dj: f32, p11: T, p12: T, p21: T, p22: T) -> T {
    let x1 = p11 * (1.0 - dj) + p12 * dj;
    let x2 = p21 * (1.0 - dj) + p22 * dj;
    x1 * (1.0 - di) + x2 * di
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field<T: CellValue> {
    grid: Grid2,
    bc: BoundaryCondition,
    data: Vec<T>,
}

impl<T: CellValue> Field<T> {
    pub fn new(grid: Grid2, bc: BoundaryCondition) -> Self {
        let data = vec![T::default(); grid.padded_size()];
        Self { grid, bc, data }
    }

    pub fn from_fn(
        grid: Grid2,
        bc: BoundaryCondition,
        f: impl Fn(i32, i32) -> T + Sync,
    ) -> Self {
        let mut field = Self::new(grid, bc);
        field.fill_interior_with(f);
        field.update_boundary();
        field
    }

    pub fn grid(&self) -> Grid2 {
        self.grid
    }

    pub fn bc(&self) -> BoundaryCondition {
        self.bc
    }

    pub fn rows(&self) -> i32 {
        self.grid.rows() as i32
    }

    pub fn cols(&self) -> i32 {
        self.grid.cols() as i32
    }

    pub fn get(&self, i: i32, j: i32) -> T {
        self.data[self.grid.offset(i, j)]
    }

    pub fn set(&mut self, i: i32, j: i32, value: T) {
        let offset = self.grid.offset(i, j);
        self.data[offset] = value;
    }

    pub fn assign_from_interior(&mut self, src: &[T]) {
        assert_eq!(
            src.len(),
            self.grid.interior_size(),
            "interior length mismatch"
        );
        let cols = self.grid.cols();
        for i in 0..self.grid.rows() {
            for j in 0..cols {
                let offset = self.grid.offset(i as i32, j as i32);
                self.data[offset] = src[i * cols + j];
            }
        }
        self.update_boundary();
    }

    pub fn copy_from(&mut self, other: &Self) {
        self.assert_same_grid(other);
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                self.set(i, j, other.get(i, j));
            }
        }
        self.update_boundary();
    }

    pub fn swap(&mut self, other: &mut Self) {
        self.assert_same_grid(other);
        assert_eq!(self.bc, other.bc, "field boundary mismatch");
        mem::swap(&mut self.data, &mut other.data);
    }

    pub fn update_boundary(&mut self) {
        if self.bc == BoundaryCondition::DontCare {
            return;
        }
        let negate = self.bc == BoundaryCondition::Negative;
        let edge = |n: T| if negate { -n } else { n };
        let rows = self.rows();
        let cols = self.cols();
        for j in 0..cols {
            self.set(-1, j, edge(self.get(0, j)));
            self.set(rows, j, edge(self.get(rows - 1, j)));
        }
        for i in 0..rows {
            self.set(i, -1, edge(self.get(i, 0)));
            self.set(i, cols, edge(self.get(i, cols - 1)));
        }
        // corners copy the diagonal interior cell under both modes
        self.set(-1, -1, self.get(0, 0));
        self.set(-1, cols, self.get(0, cols - 1));
        self.set(rows, -1, self.get(rows - 1, 0));
        self.set(rows, cols, self.get(rows - 1, cols - 1));
    }

    pub fn sample_linear(&self, si: f32, sj: f32) -> T {
        debug_assert!(
            self.bc != BoundaryCondition::DontCare,
            "sampled field has no ghost values"
        );
        let si = si.clamp(-0.5, self.rows() as f32 - 0.5);
        let sj = sj.clamp(-0.5, self.cols() as f32 - 0.5);
        let i0 = si.floor() as i32;
        let j0 = sj.floor() as i32;
        let di = si - i0 as f32;
        let dj = sj - j0 as f32;
        bilerp(
            di,
            dj,
            self.get(i0, j0),
            self.get(i0, j0 + 1),
            self.get(i0 + 1, j0),
            self.get(i0 + 1, j0 + 1),
        )
    }

    pub fn fill_interior_with(&mut self, f: impl Fn(i32, i32) -> T + Sync) {
        let stride = self.grid.stride();
        let rows = self.grid.rows();
        let cols = self.grid.cols();
        if should_parallel(self.grid.interior_size()) {
            self.data
                .par_chunks_exact_mut(stride)
                .skip(1)
                .take(rows)
                .enumerate()
                .for_each(|(row, chunk)| {
                    let i = row as i32;
                    for j in 0..cols {
                        chunk[j + 1] = f(i, j as i32);
                    }
                });
        } else {
            for i in 0..rows {
                let base = (i + 1) * stride;
                for j in 0..cols {
                    self.data[base + j + 1] = f(i as i32, j as i32);
                }
            }
        }
    }

    pub fn update_interior_with(&mut self, f: impl Fn(i32, i32, T) -> T + Sync) {
        let stride = self.grid.stride();
        let rows = self.grid.rows();
        let cols = self.grid.cols();
        if should_parallel(self.grid.interior_size()) {
            self.data
                .par_chunks_exact_mut(stride)
                .skip(1)
                .take(rows)
                .enumerate()
                .for_each(|(row, chunk)| {
                    let i = row as i32;
                    for j in 0..cols {
                        chunk[j + 1] = f(i, j as i32, chunk[j + 1]);
                    }
                });
        } else {
            for i in 0..rows {
                let base = (i + 1) * stride;
                for j in 0..cols {
                    self.data[base + j + 1] = f(i as i32, j as i32, self.data[base + j + 1]);
                }
            }
        }
    }

    pub fn add_in_place(&mut self, other: &Self) {
        self.assert_same_grid(other);
        self.update_interior_with(|i, j, value| value + other.get(i, j));
        self.update_boundary();
    }

    pub fn sub_in_place(&mut self, other: &Self) {
        self.assert_same_grid(other);
        self.update_interior_with(|i, j, value| value - other.get(i, j));
        self.update_boundary();
    }

    pub fn scale_in_place(&mut self, scale: f32) {
        self.update_interior_with(|_, _, value| value * scale);
        self.update_boundary();
    }

    pub fn div_in_place(&mut self, divisor: f32) {
        self.update_interior_with(|_, _, value| value / divisor);
        self.update_boundary();
    }

    pub fn serialize_interior(&self, precision: Option<usize>) -> String
    where
        T: Display,
    {
        let mut out = String::new();
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                if j > 0 {
                    out.push(' ');
                }
                match precision {
                    Some(p) => {
                        let _ = write!(out, "{:.*}", p, self.get(i, j));
                    }
                    None => {
                        let _ = write!(out, "{}", self.get(i, j));
                    }
                }
            }
            if i + 1 < self.rows() {
                out.push('\n');
            }
        }
        out
    }

    fn assert_same_grid(&self, other: &Self) {
        assert_eq!(self.grid, other.grid, "field grid mismatch");
    }
}

impl Field<f32> {
    pub fn sum(&self) -> f32 {
        let mut total = 0.0;
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                total += self.get(i, j);
            }
        }
        total
    }

    pub fn abs_max(&self) -> f32 {
        let mut max_value = 0.0f32;
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                let value = self.get(i, j).abs();
                if value > max_value {
                    max_value = value;
                }
            }
        }
        max_value
    }

    pub fn l2_norm(&self) -> f32 {
        let mut total = 0.0;
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                let value = self.get(i, j);
                total += value * value;
            }
        }
        total.sqrt()
    }
}
