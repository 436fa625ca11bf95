use numpy::ndarray::{Array1, Array2};
use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

pub mod core;
pub mod error;

use crate::core::{SimConfig, Simulation};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Python-facing wrapper around the Rust simulation core.
///
/// The host owns the animation loop and the drawing surface: it calls
/// `tick()` once per frame, pulls positions/radii/colors as NumPy arrays,
/// and renders them however it likes. `agitate(amplitude)` is the velocity
/// perturbation hook behind "shake"-style UI actions.
#[pyclass]
pub struct BubbleSim {
    sim: Simulation,
}

#[pymethods]
impl BubbleSim {
    /// Initialize a new bubble simulation in a rectangular viewport.
    ///
    /// Parameters
    /// - count: number of particles (int, > 0)
    /// - width, height: viewport dimensions (floats, > 0)
    /// - base_radius: base particle radius (float, > 0)
    /// - radius_diversity: half-width of the sampled radius band (float, >= 0)
    /// - gravity: vertical acceleration per tick (default 0, disabled)
    /// - friction: wall-bounce damping in [0, 1] (default 0.99)
    /// - seed: RNG seed (int) for reproducibility; None for nondeterministic
    ///
    /// Errors: raises ValueError on invalid parameters.
    #[new]
    #[pyo3(signature = (count=60, width=1280.0, height=720.0, base_radius=30.0, radius_diversity=5.0, gravity=0.0, friction=0.99, seed=None))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        count: usize,
        width: f64,
        height: f64,
        base_radius: f64,
        radius_diversity: f64,
        gravity: f64,
        friction: f64,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let config = SimConfig {
            count,
            width,
            height,
            base_radius,
            radius_diversity,
            gravity,
            friction,
        };
        let sim = Simulation::new(config, seed).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Construct a simulation from a JSON configuration file.
    #[staticmethod]
    #[pyo3(signature = (path, seed=None))]
    fn from_config(path: &str, seed: Option<u64>) -> PyResult<Self> {
        let config = SimConfig::from_file(path).map_err(py_err)?;
        let sim = Simulation::new(config, seed).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Advance the simulation by one tick (call once per frame).
    fn tick(&mut self) {
        self.sim.tick();
    }

    /// Advance the simulation by `frames` ticks (releases the GIL during
    /// computation).
    fn advance(&mut self, py: Python<'_>, frames: u64) {
        py.allow_threads(|| self.sim.advance(frames));
    }

    /// Return positions as a NumPy array of shape (N, 2), dtype=float64.
    fn get_positions<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let n = self.sim.num_particles();
        let dim = crate::core::particle::DIM;
        let mut arr = Array2::<f64>::zeros((n, dim));
        for (i, p) in self.sim.particles.iter().enumerate() {
            for k in 0..dim {
                arr[[i, k]] = p.r[k];
            }
        }
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    /// Return velocities as a NumPy array of shape (N, 2), dtype=float64.
    fn get_velocities<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let n = self.sim.num_particles();
        let dim = crate::core::particle::DIM;
        let mut arr = Array2::<f64>::zeros((n, dim));
        for (i, p) in self.sim.particles.iter().enumerate() {
            for k in 0..dim {
                arr[[i, k]] = p.v[k];
            }
        }
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    /// Return radii as a NumPy array of shape (N,), dtype=float64.
    fn get_radii<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray1<f64>>> {
        let n = self.sim.num_particles();
        let mut arr = Array1::<f64>::zeros(n);
        for (i, p) in self.sim.particles.iter().enumerate() {
            arr[i] = p.radius;
        }
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    /// Return colors as a NumPy array of shape (N, 4) holding HSLA
    /// components: hue in degrees, saturation/lightness/alpha in [0, 1].
    fn get_colors<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let n = self.sim.num_particles();
        let mut arr = Array2::<f64>::zeros((n, 4));
        for (i, p) in self.sim.particles.iter().enumerate() {
            arr[[i, 0]] = p.color.h;
            arr[[i, 1]] = p.color.s;
            arr[[i, 2]] = p.color.l;
            arr[[i, 3]] = p.color.a;
        }
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    /// Set all particle velocities from a NumPy array of shape (N, 2),
    /// dtype=float64. Values must be finite.
    fn set_velocities<'py>(&mut self, velocities: PyReadonlyArray2<'py, f64>) -> PyResult<()> {
        let arr = velocities.as_array();
        let n = self.sim.num_particles();
        let dim = crate::core::particle::DIM;
        if arr.ndim() != 2 || arr.shape()[0] != n || arr.shape()[1] != dim {
            return Err(py_err(format!(
                "velocities must have shape ({}, {}), got {:?}",
                n,
                dim,
                arr.shape()
            )));
        }
        let v: Vec<[f64; 2]> = (0..n).map(|i| [arr[[i, 0]], arr[[i, 1]]]).collect();
        self.sim.set_velocities(&v).map_err(py_err)
    }

    /// Reassign every particle's velocity components uniformly from
    /// [-amplitude, amplitude]. A large amplitude shakes the population up;
    /// a small one settles it down.
    fn agitate(&mut self, amplitude: f64) -> PyResult<()> {
        self.sim.agitate(amplitude).map_err(py_err)
    }

    /// Rebuild the particle collection wholesale with fresh placement
    /// sampling. Call between frames, never concurrently with `tick`.
    fn reset(&mut self) -> PyResult<()> {
        self.sim.reset().map_err(py_err)
    }

    /// Return the total kinetic energy of the population.
    fn kinetic_energy(&self) -> PyResult<f64> {
        Ok(self.sim.kinetic_energy())
    }

    /// Return the total momentum as an (x, y) tuple.
    fn momentum(&self) -> PyResult<(f64, f64)> {
        let m = self.sim.momentum();
        Ok((m[0], m[1]))
    }

    /// Number of particles.
    #[getter]
    fn num_particles(&self) -> usize {
        self.sim.num_particles()
    }

    /// Viewport width.
    #[getter]
    fn width(&self) -> f64 {
        self.sim.config().width
    }

    /// Viewport height.
    #[getter]
    fn height(&self) -> f64 {
        self.sim.config().height
    }

    /// Number of ticks advanced so far.
    #[getter]
    fn ticks(&self) -> u64 {
        self.sim.ticks()
    }
}

/// The bubblesim Python module entry point.
#[pymodule]
fn bubblesim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<BubbleSim>()?;
    Ok(())
}
