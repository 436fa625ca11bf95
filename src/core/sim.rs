use crate::core::config::SimConfig;
use crate::core::particle::{Color, Particle, DIM};
use crate::error::{Error, Result};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};

/// Placement resampling budget per particle. Once exhausted the last sampled
/// position is accepted even if it overlaps an earlier placement.
const PLACEMENT_ATTEMPTS: usize = 100;

/// Initial velocity components are drawn uniformly from [-INIT_SPEED, INIT_SPEED].
const INIT_SPEED: f64 = 5.0;

/// All particles share the same mass.
const DEFAULT_MASS: f64 = 1.0;

/// Simulation domain: a fixed population of circular particles inside an
/// axis-aligned rectangular viewport with the origin at the top-left corner.
///
/// The host's frame clock drives the run by calling [`Simulation::tick`]
/// once per display refresh; each tick advances every particle by one fixed
/// unit of time.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    pub particles: Vec<Particle>,
    rng: StdRng,
    ticks: u64,
}

impl Simulation {
    /// Create a new simulation from a validated configuration.
    ///
    /// Particles are placed with bounded rejection sampling to avoid initial
    /// overlap, with radius drawn from the configured diversity band and
    /// velocity components drawn uniformly from [-5, 5].
    ///
    /// Errors with `Error::InvalidParam` on degenerate configuration
    /// (zero count, non-positive radius or viewport, friction outside
    /// [0, 1], or a viewport too small to admit the largest particle).
    pub fn new(config: SimConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        let max_radius = config.base_radius + config.radius_diversity;
        if config.width < 2.0 * max_radius || config.height < 2.0 * max_radius {
            return Err(Error::InvalidParam(
                "viewport must be at least 2 * (base_radius + radius_diversity) on both axes"
                    .into(),
            ));
        }

        let mut rng: StdRng = match seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };

        let particles = place_particles(&config, &mut rng)?;

        Ok(Self {
            config,
            particles,
            rng,
            ticks: 0,
        })
    }

    /// The configuration this run was constructed with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Number of ticks advanced so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of particles.
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Positions as a Vec of fixed-size arrays.
    pub fn positions(&self) -> Vec<[f64; DIM]> {
        self.particles.iter().map(|p| p.r).collect()
    }

    /// Velocities as a Vec of fixed-size arrays.
    pub fn velocities(&self) -> Vec<[f64; DIM]> {
        self.particles.iter().map(|p| p.v).collect()
    }

    /// Advance the simulation by one tick.
    ///
    /// For each particle in collection order: wall handling (bounce damping,
    /// gravity, tangent snap), position integration, then an exhaustive scan
    /// of every other particle with elastic resolution on overlap. A pair
    /// resolved early in the sweep may be resolved again when the outer loop
    /// reaches its partner; that repeated relaxation is part of the model.
    pub fn tick(&mut self) {
        let n = self.particles.len();
        for i in 0..n {
            self.bounce_walls(i);

            let p = &mut self.particles[i];
            p.r[0] += p.v[0];
            p.r[1] += p.v[1];

            for j in 0..n {
                if j == i {
                    continue;
                }
                let (pi, pj) = (&self.particles[i], &self.particles[j]);
                let dx = pj.r[0] - pi.r[0];
                let dy = pj.r[1] - pi.r[1];
                let dist = (dx * dx + dy * dy).sqrt();
                if dist - pi.radius - pj.radius < 0.0 {
                    let (a, b) = pair_mut(&mut self.particles, i, j);
                    resolve_elastic(a, b);
                }
            }
        }
        self.ticks = self.ticks.saturating_add(1);
    }

    /// Advance the simulation by `frames` ticks.
    pub fn advance(&mut self, frames: u64) {
        for _ in 0..frames {
            self.tick();
        }
    }

    /// Reassign every particle's velocity components uniformly from
    /// [-amplitude, amplitude].
    ///
    /// Large amplitudes shake the population up; small amplitudes settle it
    /// down. Errors if `amplitude` is negative or non-finite.
    pub fn agitate(&mut self, amplitude: f64) -> Result<()> {
        if !amplitude.is_finite() || amplitude < 0.0 {
            return Err(Error::InvalidParam(
                "amplitude must be finite and >= 0".into(),
            ));
        }
        for p in &mut self.particles {
            p.v = [
                self.rng.random_range(-amplitude..=amplitude),
                self.rng.random_range(-amplitude..=amplitude),
            ];
        }
        Ok(())
    }

    /// Overwrite all particle velocities from the host (validated finite).
    pub fn set_velocities(&mut self, v: &[[f64; DIM]]) -> Result<()> {
        if v.len() != self.particles.len() {
            return Err(Error::InvalidParam(format!(
                "expected {} velocities, got {}",
                self.particles.len(),
                v.len()
            )));
        }
        for (p, &vi) in self.particles.iter_mut().zip(v) {
            p.set_velocity(vi)?;
        }
        Ok(())
    }

    /// Replace the particle collection wholesale with a freshly sampled one.
    ///
    /// The configuration is unchanged; only placement, radii, velocities and
    /// colors are redrawn. Never called from within a tick.
    pub fn reset(&mut self) -> Result<()> {
        self.particles = place_particles(&self.config, &mut self.rng)?;
        self.ticks = 0;
        Ok(())
    }

    /// Compute total kinetic energy (diagnostic).
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Compute total momentum (diagnostic).
    pub fn momentum(&self) -> [f64; DIM] {
        let mut total = [0.0_f64; DIM];
        for p in &self.particles {
            let m = p.momentum();
            total[0] += m[0];
            total[1] += m[1];
        }
        total
    }

    // ============ Internal helpers ============

    /// Wall handling for one particle: invert and damp the velocity on any
    /// axis whose wall would be crossed, apply gravity on the vertical
    /// axis's no-contact branch, then snap the position onto the tangent
    /// point of any wall still penetrated.
    ///
    /// Gravity hangs off the vertical check alone: a tick that bounces off
    /// a side wall still accelerates downward. The snap re-tests each axis
    /// with the updated velocity.
    fn bounce_walls(&mut self, i: usize) {
        let (w, h) = (self.config.width, self.config.height);
        let friction = self.config.friction;
        let gravity = self.config.gravity;
        let p = &mut self.particles[i];

        if p.r[0] - p.radius < 0.0 || p.r[0] + p.radius + p.v[0] > w {
            p.v[0] = -p.v[0] * friction;
        }
        if p.r[1] - p.radius < 0.0 || p.r[1] + p.radius + p.v[1] > h {
            p.v[1] = -p.v[1] * friction;
        } else {
            p.v[1] += gravity;
        }

        if p.r[0] - p.radius < 0.0 {
            p.r[0] = p.radius;
        }
        if p.r[0] + p.radius + p.v[0] > w {
            p.r[0] = w - p.radius;
        }
        if p.r[1] - p.radius < 0.0 {
            p.r[1] = p.radius;
        }
        if p.r[1] + p.radius + p.v[1] > h {
            p.r[1] = h - p.radius;
        }
    }
}

/// Resolve a 2-D elastic collision between two overlapping (or approaching)
/// particles, mutating both velocities in place.
///
/// The pair's velocities are rotated into a frame aligned with the line
/// connecting the centers, the 1-D elastic collision equation is applied
/// along that axis (the tangential component is untouched), and the results
/// are rotated back. Momentum along the contact normal is conserved; equal
/// masses exchange their normal components outright.
///
/// The guard admits the pair only when `(v1 - v2) . (x2 - x1) >= 0`;
/// otherwise the call leaves both particles untouched. Positions are never
/// adjusted, so a resolved pair may stay visually overlapped for a few ticks
/// until the new velocities separate it.
pub fn resolve_elastic(a: &mut Particle, b: &mut Particle) {
    let dvx = a.v[0] - b.v[0];
    let dvy = a.v[1] - b.v[1];
    let dx = b.r[0] - a.r[0];
    let dy = b.r[1] - a.r[1];

    if dvx * dx + dvy * dy >= 0.0 {
        // Contact angle between the two centers. Coincident centers feed
        // atan2(0, 0) and resolve along angle 0.
        let angle = -dy.atan2(dx);
        let (m1, m2) = (a.mass, b.mass);

        let u1 = rotate(a.v, angle);
        let u2 = rotate(b.v, angle);

        // 1-D elastic collision along the rotated x-axis.
        let v1 = [
            (u1[0] * (m1 - m2) + u2[0] * 2.0 * m2) / (m1 + m2),
            u1[1],
        ];
        let v2 = [
            (u2[0] * (m2 - m1) + u1[0] * 2.0 * m1) / (m1 + m2),
            u2[1],
        ];

        a.v = rotate(v1, -angle);
        b.v = rotate(v2, -angle);
    }
}

// ============ Utility helpers ============

/// Rotate a velocity vector by `angle` radians.
#[inline]
fn rotate(v: [f64; DIM], angle: f64) -> [f64; DIM] {
    let (sin, cos) = angle.sin_cos();
    [v[0] * cos - v[1] * sin, v[0] * sin + v[1] * cos]
}

/// Mutable borrows of two distinct particles in the arena.
fn pair_mut(particles: &mut [Particle], i: usize, j: usize) -> (&mut Particle, &mut Particle) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = particles.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = particles.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

fn overlaps_existing(existing: &[Particle], r: &[f64; DIM], radius: f64) -> bool {
    existing.iter().any(|p| {
        let dx = r[0] - p.r[0];
        let dy = r[1] - p.r[1];
        (dx * dx + dy * dy).sqrt() - radius - p.radius < 0.0
    })
}

/// Sample the full particle collection for one run.
///
/// Radii come from the diversity band around the base radius (absolute value
/// taken, so a diversity wider than the base cannot produce a negative
/// radius). Each particle after the first is resampled while it overlaps any
/// already-placed particle, up to [`PLACEMENT_ATTEMPTS`] times; after that
/// the last sample is kept as-is.
fn place_particles(config: &SimConfig, rng: &mut StdRng) -> Result<Vec<Particle>> {
    let mut particles: Vec<Particle> = Vec::with_capacity(config.count);
    let lo_r = config.base_radius - config.radius_diversity;
    let hi_r = config.base_radius + config.radius_diversity;

    for id in 0..(config.count as u32) {
        let radius = rng.random_range(lo_r..=hi_r).abs();

        let sample = |rng: &mut StdRng| -> [f64; DIM] {
            [
                rng.random_range(radius..=(config.width - radius)),
                rng.random_range(radius..=(config.height - radius)),
            ]
        };

        let mut r = sample(rng);
        let mut attempts = 0usize;
        while attempts < PLACEMENT_ATTEMPTS && overlaps_existing(&particles, &r, radius) {
            r = sample(rng);
            attempts += 1;
        }

        let v = [
            rng.random_range(-INIT_SPEED..=INIT_SPEED),
            rng.random_range(-INIT_SPEED..=INIT_SPEED),
        ];
        let color = Color::from_hue(rng.random_range(0.0..360.0));

        particles.push(Particle::new(id, r, v, radius, DEFAULT_MASS, color)?);
    }

    Ok(particles)
}
