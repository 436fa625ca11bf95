use bubblesim::core::{SimConfig, Simulation};
use bubblesim::error::Result;

/// At low density every placement succeeds within the retry budget, so no
/// two particles overlap at initialization.
#[test]
fn no_initial_overlap_at_low_density() -> Result<()> {
    let cfg = SimConfig {
        count: 20,
        width: 2000.0,
        height: 1500.0,
        base_radius: 20.0,
        radius_diversity: 5.0,
        gravity: 0.0,
        friction: 0.99,
    };
    let sim = Simulation::new(cfg, Some(808))?;

    let n = sim.num_particles();
    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = (&sim.particles[i], &sim.particles[j]);
            let dx = b.r[0] - a.r[0];
            let dy = b.r[1] - a.r[1];
            let dist = (dx * dx + dy * dy).sqrt();
            assert!(
                dist - a.radius - b.radius >= 0.0,
                "particles {i} and {j} overlap at init: dist={dist}, radii={}+{}",
                a.radius,
                b.radius
            );
        }
    }
    Ok(())
}

/// Sampled radii stay inside the diversity band and positions keep each
/// body inside the viewport.
#[test]
fn radii_and_positions_within_bounds() -> Result<()> {
    let cfg = SimConfig {
        count: 40,
        width: 1600.0,
        height: 1200.0,
        base_radius: 25.0,
        radius_diversity: 10.0,
        gravity: 0.0,
        friction: 0.99,
    };
    let sim = Simulation::new(cfg.clone(), Some(99))?;

    assert_eq!(sim.num_particles(), 40);
    for p in &sim.particles {
        assert!(
            p.radius >= cfg.base_radius - cfg.radius_diversity
                && p.radius <= cfg.base_radius + cfg.radius_diversity,
            "radius {} outside the diversity band",
            p.radius
        );
        assert!(p.radius > 0.0 && p.mass > 0.0);
        assert!(p.r[0] >= p.radius && p.r[0] <= cfg.width - p.radius);
        assert!(p.r[1] >= p.radius && p.r[1] <= cfg.height - p.radius);
        assert!(p.v[0].abs() <= 5.0 && p.v[1].abs() <= 5.0);
        assert!((0.0..360.0).contains(&p.color.h));
    }
    Ok(())
}

/// Placement is reproducible under a fixed seed and differs across seeds.
#[test]
fn seeded_placement_is_deterministic() -> Result<()> {
    let cfg = SimConfig::default();
    let a = Simulation::new(cfg.clone(), Some(4242))?;
    let b = Simulation::new(cfg.clone(), Some(4242))?;
    let c = Simulation::new(cfg, Some(4243))?;

    assert_eq!(a.positions(), b.positions());
    assert_eq!(a.velocities(), b.velocities());
    assert_ne!(a.positions(), c.positions());
    Ok(())
}

/// A population too dense to place without overlap still constructs: once
/// the retry budget runs out the last sample is accepted as-is.
#[test]
fn overcrowded_population_still_constructs() -> Result<()> {
    let cfg = SimConfig {
        count: 50,
        width: 200.0,
        height: 200.0,
        base_radius: 20.0,
        radius_diversity: 0.0,
        gravity: 0.0,
        friction: 0.99,
    };
    let sim = Simulation::new(cfg, Some(5))?;
    assert_eq!(sim.num_particles(), 50);
    assert!(sim.kinetic_energy().is_finite());
    Ok(())
}

/// A diversity band wider than the base radius folds negative draws back to
/// positive radii.
#[test]
fn wide_diversity_band_yields_positive_radii() -> Result<()> {
    let cfg = SimConfig {
        count: 30,
        width: 1000.0,
        height: 1000.0,
        base_radius: 5.0,
        radius_diversity: 12.0,
        gravity: 0.0,
        friction: 0.99,
    };
    let sim = Simulation::new(cfg, Some(2718))?;
    for p in &sim.particles {
        assert!(p.radius > 0.0, "radius must stay positive, got {}", p.radius);
        assert!(p.radius <= 17.0);
    }
    Ok(())
}

/// The dense overcrowded run must still tick without panicking or losing
/// containment of the population count.
#[test]
fn overcrowded_population_ticks() -> Result<()> {
    let cfg = SimConfig {
        count: 30,
        width: 300.0,
        height: 300.0,
        base_radius: 25.0,
        radius_diversity: 0.0,
        gravity: 0.0,
        friction: 0.99,
    };
    let mut sim = Simulation::new(cfg, Some(6))?;
    sim.advance(50);
    assert_eq!(sim.num_particles(), 30);
    assert!(sim.kinetic_energy().is_finite());
    assert!(sim.momentum().iter().all(|m| m.is_finite()));
    Ok(())
}
