use anyhow::Result;
use stable_fluids_sim::{
    divergence, max_divergence, step_with_forces, BoundaryCondition, Field, Grid2,
    PressureSolver, SimParams, SimState, SimWorkspace, Vec2,
};
use std::fs::File;
use std::io::{BufWriter, Write};

#[derive(Clone, Copy, Debug)]
struct RunConfig {
    n: usize,
    dt: f32,
    seconds: f32,
    output_fps: f32,
    pressure_iters: usize,
    omega: f32,
    impulse: Vec2,
    impulse_seconds: f32,
}

impl RunConfig {
    fn from_env() -> Self {
        Self {
            n: env_usize("FLUID_N").unwrap_or(64),
            dt: env_f32("FLUID_DT").unwrap_or(0.001),
            seconds: env_f32("FLUID_SECONDS").unwrap_or(10.0),
            output_fps: 60.0,
            pressure_iters: env_usize("FLUID_ITERS").unwrap_or(10),
            omega: env_f32("FLUID_OMEGA").unwrap_or(1.9),
            impulse: Vec2::new(-10.0, 0.0),
            impulse_seconds: 0.1,
        }
    }
}

fn env_f32(key: &str) -> Option<f32> {
    std::env::var(key).ok().and_then(|value| value.parse::<f32>().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
}

fn initial_dye(grid: Grid2) -> Field<f32> {
    let center = (grid.rows() / 2) as f32;
    let radius = grid.rows() as f32 / 8.0;
    Field::from_fn(grid, BoundaryCondition::Clone, |i, j| {
        let di = i as f32 - center;
        let dj = j as f32 - center;
        if (di * di + dj * dj).sqrt() < radius {
            1.0
        } else {
            0.0
        }
    })
}

fn main() -> Result<()> {
    let config = RunConfig::from_env();
    let grid = Grid2::new(config.n, config.n);
    let mut state = SimState::new(grid);
    state.add_tracer(initial_dye(grid));
    let mut workspace = SimWorkspace::new(grid);
    let mut diag = Field::new(grid, BoundaryCondition::Clone);

    let params = SimParams {
        dt: config.dt,
        body_force: Vec2::zero(),
        pressure_iters: config.pressure_iters,
        omega: config.omega,
        solver: PressureSolver::RedBlackSor,
    };

    let mut velocity_file = BufWriter::new(File::create("sim_velocity.txt")?);
    let mut divergence_file = BufWriter::new(File::create("sim_divergence.txt")?);
    let mut color_file = BufWriter::new(File::create("sim_color.txt")?);

    let total_steps = (config.seconds / config.dt) as usize;
    let steps_per_frame = ((1.0 / (config.output_fps * config.dt)) as usize).max(1);
    let impulse_steps = (config.impulse_seconds / config.dt) as usize;
    let center = (config.n / 2) as i32;
    let impulse = config.impulse;

    for step in 0..total_steps {
        let push = step < impulse_steps;
        step_with_forces(&mut state, params, &mut workspace, |velocity| {
            if !push {
                return;
            }
            for (i, j) in [
                (center, center),
                (center + 1, center),
                (center, center + 1),
                (center + 1, center + 1),
            ] {
                let v = velocity.get(i, j) + impulse;
                velocity.set(i, j, v);
            }
            velocity.update_boundary();
        });

        if step % steps_per_frame == 0 {
            writeln!(velocity_file, "{}\n", state.velocity.serialize_interior(Some(2)))?;
            divergence(&mut diag, &state.velocity);
            writeln!(divergence_file, "{}\n", diag.serialize_interior(Some(2)))?;
            writeln!(color_file, "{}\n", state.tracers[0].serialize_interior(Some(2)))?;
        }
    }

    let mut params_file = BufWriter::new(File::create("sim_params.json")?);
    writeln!(params_file, "{{")?;
    writeln!(params_file, "    \"N\": {},", config.n)?;
    writeln!(params_file, "    \"SECONDS\": {},", config.seconds)?;
    writeln!(params_file, "    \"DT\": {},", config.dt)?;
    writeln!(params_file, "    \"OUTPUT_FPS\": {}", config.output_fps)?;
    writeln!(params_file, "}}")?;

    let residual = max_divergence(&state.velocity, &mut diag);
    println!("simulation done, final max |div| = {residual:.3e}");

    Ok(())
}
