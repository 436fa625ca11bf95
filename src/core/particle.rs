use crate::error::{Error, Result};

/// Fixed spatial dimension (2D).
pub const DIM: usize = 2;

/// Display color of a particle in HSLA components.
///
/// Opaque to the physics; carried only so hosts can draw each particle the
/// same way across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Hue in degrees, [0, 360).
    pub h: f64,
    /// Saturation, [0, 1].
    pub s: f64,
    /// Lightness, [0, 1].
    pub l: f64,
    /// Alpha, [0, 1].
    pub a: f64,
}

impl Color {
    /// Pastel color with the given hue (70% saturation, 70% lightness,
    /// 80% alpha).
    pub fn from_hue(h: f64) -> Self {
        Self {
            h,
            s: 0.7,
            l: 0.7,
            a: 0.8,
        }
    }
}

/// Render-surface contract implemented by the host.
///
/// The core never draws; a particle emits itself as a filled circle plus an
/// outline and knows nothing else about the surface.
pub trait Canvas {
    /// Fill a circle of `radius` centered at `center`.
    fn fill_circle(&mut self, center: [f64; DIM], radius: f64, color: Color);

    /// Outline a circle of `radius` centered at `center`.
    fn stroke_circle(&mut self, center: [f64; DIM], radius: f64);
}

/// A circular rigid body confined to the viewport.
///
/// Fields:
/// - `id`: stable identifier
/// - `r`: position [x, y]
/// - `v`: velocity [vx, vy]
/// - `radius`: body radius (> 0), fixed for the particle's lifetime
/// - `mass`: mass (> 0)
/// - `color`: display attribute, irrelevant to physics
#[derive(Debug, Clone)]
pub struct Particle {
    /// Stable particle identifier.
    pub id: u32,
    /// Position (x, y).
    pub r: [f64; DIM],
    /// Velocity (vx, vy).
    pub v: [f64; DIM],
    /// Body radius (> 0).
    pub radius: f64,
    /// Mass (> 0).
    pub mass: f64,
    /// Display color.
    pub color: Color,
}

impl Particle {
    /// Create a new particle after validating invariants.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `radius` or `mass` is non-positive or any
    ///   component is NaN/inf.
    pub fn new(
        id: u32,
        r: [f64; DIM],
        v: [f64; DIM],
        radius: f64,
        mass: f64,
        color: Color,
    ) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !r.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !v.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            id,
            r,
            v,
            radius,
            mass,
            color,
        })
    }

    /// Returns the particle's kinetic energy: 1/2 m |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        let vsq: f64 = self.v.iter().map(|&c| c * c).sum();
        0.5 * self.mass * vsq
    }

    /// Returns the particle's momentum: m * v.
    #[inline]
    pub fn momentum(&self) -> [f64; DIM] {
        [self.mass * self.v[0], self.mass * self.v[1]]
    }

    /// Set velocity (validated as finite).
    pub fn set_velocity(&mut self, v: [f64; DIM]) -> Result<()> {
        if !v.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        self.v = v;
        Ok(())
    }

    /// Emit this particle to a drawing surface: one filled circle plus an
    /// outline, using no state beyond the particle's own fields.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.fill_circle(self.r, self.radius, self.color);
        canvas.stroke_circle(self.r, self.radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white() -> Color {
        Color::from_hue(0.0)
    }

    #[test]
    fn new_particle_ok() -> Result<()> {
        let p = Particle::new(1, [0.0, 1.0], [2.0, -3.0], 0.5, 2.0, white())?;
        assert_eq!(p.id, 1);
        assert_eq!(p.r, [0.0, 1.0]);
        assert_eq!(p.v, [2.0, -3.0]);
        assert_eq!(p.radius, 0.5);
        assert_eq!(p.mass, 2.0);
        Ok(())
    }

    #[test]
    fn invalid_radius_rejected() {
        let err = Particle::new(0, [0.0, 0.0], [0.0, 0.0], 0.0, 1.0, white()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("radius"));
    }

    #[test]
    fn invalid_mass_rejected() {
        let err = Particle::new(0, [0.0, 0.0], [0.0, 0.0], 1.0, 0.0, white()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("mass"));
    }

    #[test]
    fn kinetic_energy_computed() -> Result<()> {
        // v = (3,4), |v|^2 = 25; KE = 0.5 * m * 25
        let p = Particle::new(7, [0.0, 0.0], [3.0, 4.0], 1.0, 2.0, white())?;
        assert!((p.kinetic_energy() - 25.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn momentum_computed() -> Result<()> {
        let p = Particle::new(3, [0.0, 0.0], [3.0, -4.0], 1.0, 2.0, white())?;
        assert_eq!(p.momentum(), [6.0, -8.0]);
        Ok(())
    }

    #[test]
    fn nonfinite_velocity_rejected_by_setter() -> Result<()> {
        let mut p = Particle::new(1, [0.0, 0.0], [0.0, 0.0], 1.0, 1.0, white())?;
        assert!(p.set_velocity([f64::NAN, 0.0]).is_err());
        assert_eq!(p.v, [0.0, 0.0]);
        Ok(())
    }

    /// Recording canvas double: collects emitted shapes for inspection.
    #[derive(Default)]
    struct RecordingCanvas {
        fills: Vec<([f64; DIM], f64, Color)>,
        strokes: Vec<([f64; DIM], f64)>,
    }

    impl Canvas for RecordingCanvas {
        fn fill_circle(&mut self, center: [f64; DIM], radius: f64, color: Color) {
            self.fills.push((center, radius, color));
        }

        fn stroke_circle(&mut self, center: [f64; DIM], radius: f64) {
            self.strokes.push((center, radius));
        }
    }

    #[test]
    fn draw_emits_fill_and_outline_from_own_fields() -> Result<()> {
        let color = Color::from_hue(120.0);
        let p = Particle::new(9, [10.0, 20.0], [1.0, 1.0], 5.0, 1.0, color)?;
        let mut canvas = RecordingCanvas::default();
        p.draw(&mut canvas);

        assert_eq!(canvas.fills.len(), 1);
        assert_eq!(canvas.strokes.len(), 1);
        let (center, radius, fill_color) = canvas.fills[0];
        assert_eq!(center, [10.0, 20.0]);
        assert_eq!(radius, 5.0);
        assert_eq!(fill_color, color);
        assert_eq!(canvas.strokes[0], ([10.0, 20.0], 5.0));
        Ok(())
    }
}
