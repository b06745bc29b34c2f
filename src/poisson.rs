use crate::field::{BoundaryCondition, Field};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressureSolver {
    RedBlackSor,
    GaussSeidel,
    Jacobi,
}

pub fn optimal_omega(n: usize) -> f32 {
    2.0 / (1.0 + (std::f32::consts::PI / n as f32).sin())
}

pub fn solve_pressure(
    solver: PressureSolver,
    pressure: &mut Field<f32>,
    divergence: &Field<f32>,
    iters: usize,
    omega: f32,
    scratch: &mut Field<f32>,
) {
    match solver {
        PressureSolver::RedBlackSor => solve_pressure_sor(pressure, divergence, iters, omega),
        PressureSolver::GaussSeidel => solve_pressure_gauss_seidel(pressure, divergence, iters),
        PressureSolver::Jacobi => {
            solve_pressure_jacobi(pressure, divergence, iters, omega, scratch)
        }
    }
}

pub fn solve_pressure_sor(
    pressure: &mut Field<f32>,
    divergence: &Field<f32>,
    iters: usize,
    omega: f32,
) {
    reset(pressure, divergence);
    for _ in 0..iters {
        for parity in 0..2 {
            sweep_colour(pressure, divergence, parity, omega);
            pressure.update_boundary();
        }
    }
}

pub fn solve_pressure_gauss_seidel(
    pressure: &mut Field<f32>,
    divergence: &Field<f32>,
    iters: usize,
) {
    reset(pressure, divergence);
    for _ in 0..iters {
        for i in 0..pressure.rows() {
            for j in 0..pressure.cols() {
                let value = gauss_seidel_value(pressure, divergence, i, j);
                pressure.set(i, j, value);
            }
        }
        pressure.update_boundary();
    }
}

pub fn solve_pressure_jacobi(
    pressure: &mut Field<f32>,
    divergence: &Field<f32>,
    iters: usize,
    omega: f32,
    scratch: &mut Field<f32>,
) {
    reset(pressure, divergence);
    for _ in 0..iters {
        let current = &*pressure;
        scratch.fill_interior_with(|i, j| {
            let relaxed = gauss_seidel_value(current, divergence, i, j);
            (1.0 - omega) * current.get(i, j) + omega * relaxed
        });
        scratch.update_boundary();
        pressure.swap(scratch);
    }
}

fn reset(pressure: &mut Field<f32>, divergence: &Field<f32>) {
    assert_eq!(pressure.grid(), divergence.grid(), "field grid mismatch");
    assert!(
        pressure.bc() != BoundaryCondition::DontCare,
        "pressure ghosts are read by the stencil"
    );
    pressure.fill_interior_with(|_, _| 0.0);
    pressure.update_boundary();
}

fn gauss_seidel_value(pressure: &Field<f32>, divergence: &Field<f32>, i: i32, j: i32) -> f32 {
    let sum = pressure.get(i - 1, j)
        + pressure.get(i + 1, j)
        + pressure.get(i, j - 1)
        + pressure.get(i, j + 1);
    (sum - divergence.get(i, j)) * 0.25
}

fn sweep_colour(pressure: &mut Field<f32>, divergence: &Field<f32>, parity: i32, omega: f32) {
    let rows = pressure.rows();
    let cols = pressure.cols();
    for i in 0..rows {
        let mut j = (parity + i) % 2;
        while j < cols {
            let relaxed = gauss_seidel_value(pressure, divergence, i, j);
            let value = (1.0 - omega) * pressure.get(i, j) + omega * relaxed;
            pressure.set(i, j, value);
            j += 2;
        }
    }
}
