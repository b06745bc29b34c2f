use crate::field::{BoundaryCondition, CellValue, Field};
use crate::grid::Grid2;
use crate::poisson::{solve_pressure, PressureSolver};
use crate::vec2::Vec2;

#[derive(Clone, Copy, Debug)]
pub struct SimParams {
    pub dt: f32,
    pub body_force: Vec2,
    pub pressure_iters: usize,
    pub omega: f32,
    pub solver: PressureSolver,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            dt: 0.01,
            body_force: Vec2::zero(),
            pressure_iters: 20,
            omega: 1.5,
            solver: PressureSolver::RedBlackSor,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SimState {
    pub velocity: Field<Vec2>,
    pub pressure: Field<f32>,
    pub tracers: Vec<Field<f32>>,
}

impl SimState {
    pub fn new(grid: Grid2) -> Self {
        Self {
            velocity: Field::new(grid, BoundaryCondition::Negative),
            pressure: Field::new(grid, BoundaryCondition::Clone),
            tracers: Vec::new(),
        }
    }

    pub fn add_tracer(&mut self, tracer: Field<f32>) {
        assert_eq!(tracer.grid(), self.velocity.grid(), "field grid mismatch");
        assert_eq!(
            tracer.bc(),
            BoundaryCondition::Clone,
            "tracer boundary must be clone"
        );
        self.tracers.push(tracer);
    }
}

#[derive(Clone, Debug)]
pub struct SimWorkspace {
    velocity: Field<Vec2>,
    scalar: Field<f32>,
    divergence: Field<f32>,
    jacobi: Field<f32>,
}

impl SimWorkspace {
    pub fn new(grid: Grid2) -> Self {
        Self {
            velocity: Field::new(grid, BoundaryCondition::Negative),
            scalar: Field::new(grid, BoundaryCondition::Clone),
            divergence: Field::new(grid, BoundaryCondition::Clone),
            jacobi: Field::new(grid, BoundaryCondition::Clone),
        }
    }
}

pub fn advect<T: CellValue>(
    out: &mut Field<T>,
    field: &Field<T>,
    velocity: &Field<Vec2>,
    dt: f32,
) {
    assert_eq!(out.grid(), field.grid(), "field grid mismatch");
    assert_eq!(out.grid(), velocity.grid(), "field grid mismatch");
    assert!(
        field.bc() != BoundaryCondition::DontCare,
        "advected source has no ghost values"
    );
    out.fill_interior_with(|i, j| {
        let displacement = velocity.get(i, j) * dt;
        field.sample_linear(i as f32 - displacement.x, j as f32 - displacement.y)
    });
    out.update_boundary();
}

pub fn divergence(out: &mut Field<f32>, velocity: &Field<Vec2>) {
    assert_eq!(out.grid(), velocity.grid(), "field grid mismatch");
    assert!(
        velocity.bc() != BoundaryCondition::DontCare,
        "divergence reads velocity ghosts"
    );
    out.fill_interior_with(|i, j| {
        (velocity.get(i + 1, j).x - velocity.get(i - 1, j).x + velocity.get(i, j + 1).y
            - velocity.get(i, j - 1).y)
            * 0.5
    });
    out.update_boundary();
}

pub fn subtract_gradient(velocity: &mut Field<Vec2>, pressure: &Field<f32>) {
    assert_eq!(velocity.grid(), pressure.grid(), "field grid mismatch");
    assert!(
        pressure.bc() != BoundaryCondition::DontCare,
        "gradient reads pressure ghosts"
    );
    velocity.update_interior_with(|i, j, v| {
        Vec2::new(
            v.x - (pressure.get(i + 1, j) - pressure.get(i - 1, j)) * 0.5,
            v.y - (pressure.get(i, j + 1) - pressure.get(i, j - 1)) * 0.5,
        )
    });
    velocity.update_boundary();
}

pub fn add_body_force(velocity: &mut Field<Vec2>, force: Vec2, dt: f32) {
    let dv = force * dt;
    velocity.update_interior_with(|_, _, v| v + dv);
    velocity.update_boundary();
}

pub fn max_divergence(velocity: &Field<Vec2>, scratch: &mut Field<f32>) -> f32 {
    divergence(scratch, velocity);
    scratch.abs_max()
}

pub fn project_in_place(
    velocity: &mut Field<Vec2>,
    pressure: &mut Field<f32>,
    params: SimParams,
    scratch: &mut SimWorkspace,
) {
    divergence(&mut scratch.divergence, velocity);
    solve_pressure(
        params.solver,
        pressure,
        &scratch.divergence,
        params.pressure_iters,
        params.omega,
        &mut scratch.jacobi,
    );
    subtract_gradient(velocity, pressure);
}

pub fn step_with_forces(
    state: &mut SimState,
    params: SimParams,
    scratch: &mut SimWorkspace,
    forces: impl FnOnce(&mut Field<Vec2>),
) {
    advect(
        &mut scratch.velocity,
        &state.velocity,
        &state.velocity,
        params.dt,
    );
    state.velocity.swap(&mut scratch.velocity);
    if params.body_force != Vec2::zero() {
        add_body_force(&mut state.velocity, params.body_force, params.dt);
    }
    forces(&mut state.velocity);
    project_in_place(&mut state.velocity, &mut state.pressure, params, scratch);
    for tracer in &mut state.tracers {
        advect(&mut scratch.scalar, tracer, &state.velocity, params.dt);
        tracer.swap(&mut scratch.scalar);
    }
}

pub fn step_in_place(state: &mut SimState, params: SimParams, scratch: &mut SimWorkspace) {
    step_with_forces(state, params, scratch, |_| {});
}
