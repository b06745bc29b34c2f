mod field;
mod grid;
mod poisson;
mod sim;
mod vec2;

pub use field::{bilerp, BoundaryCondition, CellValue, Field};
pub use grid::Grid2;
pub use poisson::{
    optimal_omega, solve_pressure, solve_pressure_gauss_seidel, solve_pressure_jacobi,
    solve_pressure_sor, PressureSolver,
};
pub use sim::{
    add_body_force, advect, divergence, max_divergence, project_in_place, step_in_place,
    step_with_forces, subtract_gradient, SimParams, SimState, SimWorkspace,
};
pub use vec2::Vec2;
