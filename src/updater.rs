//! Per-frame particle update.
//!
//! Every particle runs the same three steps each frame:
//!
//! 1. **Blend** - target = lerp(chaos, active shape, formation factor)
//! 2. **Ease** - move a fixed fraction of the way toward that target
//! 3. **Forces** - each force point within the interaction radius nudges the
//!    particle along the line joining them, scaled linearly by how deep
//!    inside the radius it sits
//!
//! Force points are applied in list order, each one seeing the position the
//! previous one left behind. There is no particle-particle interaction, so a
//! pass costs O(N·F) with F ≤ 5.

use crate::formation::FormationState;
use crate::hands::{ForcePoint, ForceRole};
use crate::shapes::TargetShapeSet;
use crate::Vec3;
use serde::{Deserialize, Serialize};

/// Strength and reach of force points.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForceParams {
    /// Particles at or beyond this distance are untouched.
    pub interaction_radius: f32,
    /// Gain for [`ForceRole::Push`]; positive drives particles away.
    pub push_strength: f32,
    /// Gain for [`ForceRole::Pull`]; negative draws particles in.
    pub pull_strength: f32,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            interaction_radius: 1.2,
            push_strength: 0.15,
            pull_strength: -0.05,
        }
    }
}

impl ForceParams {
    /// Signed gain for a role.
    #[inline]
    pub fn strength(&self, role: ForceRole) -> f32 {
        match role {
            ForceRole::Push => self.push_strength,
            ForceRole::Pull => self.pull_strength,
        }
    }
}

/// Applies formation blending, easing and fingertip forces to a position buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleUpdater {
    /// Fraction of the gap to the blended target closed per frame.
    pub easing: f32,
    /// Reach and gains of the force points.
    pub forces: ForceParams,
}

impl Default for ParticleUpdater {
    fn default() -> Self {
        Self {
            easing: 0.1,
            forces: ForceParams::default(),
        }
    }
}

impl ParticleUpdater {
    /// Updater with the given easing rate and force settings.
    pub fn new(easing: f32, forces: ForceParams) -> Self {
        Self { easing, forces }
    }

    /// Run one frame over every particle.
    ///
    /// `positions` must be as long as the target buffers.
    pub fn update(
        &self,
        targets: &TargetShapeSet,
        formation: &FormationState,
        forces: &[ForcePoint],
        positions: &mut [Vec3],
    ) {
        debug_assert_eq!(positions.len(), targets.len());

        let shape = targets.shape(formation.active_shape);
        let chaos = targets.chaos();
        let factor = formation.factor();

        for ((pos, &scatter), &formed) in positions.iter_mut().zip(chaos).zip(shape) {
            let target = scatter + (formed - scatter) * factor;
            *pos += (target - *pos) * self.easing;

            for force in forces {
                self.apply_force(pos, force);
            }
        }
    }

    /// Displace one particle by one force point.
    ///
    /// The displacement is `d * strength * (radius - |d|)` where `d` points
    /// from the force point to the particle. The falloff term `radius - |d|`
    /// is largest at the force point, but the displacement itself is zero
    /// there and at the radius, peaking halfway between.
    #[inline]
    pub fn apply_force(&self, pos: &mut Vec3, force: &ForcePoint) {
        let offset = *pos - force.position;
        let dist = offset.length();
        let radius = self.forces.interaction_radius;

        if dist < radius {
            *pos += offset * self.forces.strength(force.role) * (radius - dist);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeId;

    fn single(sphere: Vec3, chaos: Vec3) -> TargetShapeSet {
        TargetShapeSet::from_parts(vec![sphere], vec![sphere], vec![sphere], vec![chaos]).unwrap()
    }

    fn formed(factor: f32) -> FormationState {
        let mut state = FormationState::default();
        state.set_factor(factor);
        state
    }

    #[test]
    fn test_half_formed_eases_tenth_of_the_way() {
        let targets = single(Vec3::new(2.5, 0.0, 0.0), Vec3::ZERO);
        let mut positions = vec![Vec3::ZERO];

        ParticleUpdater::default().update(&targets, &formed(0.5), &[], &mut positions);

        assert!((positions[0] - Vec3::new(0.125, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_settled_particle_stays_put() {
        let targets = TargetShapeSet::generate(500, Some(2));
        let mut positions = targets.shape(ShapeId::Sphere).to_vec();

        ParticleUpdater::default().update(&targets, &formed(1.0), &[], &mut positions);

        for (p, t) in positions.iter().zip(targets.shape(ShapeId::Sphere)) {
            assert!((*p - *t).length() < 1e-5);
        }
    }

    #[test]
    fn test_zero_factor_targets_chaos() {
        let targets = single(Vec3::new(2.5, 0.0, 0.0), Vec3::new(0.0, 4.0, 0.0));
        let mut positions = vec![Vec3::ZERO];

        ParticleUpdater::default().update(&targets, &formed(0.0), &[], &mut positions);

        assert!((positions[0] - Vec3::new(0.0, 0.4, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_active_shape_selects_buffer() {
        let targets = TargetShapeSet::from_parts(
            vec![Vec3::X],
            vec![Vec3::Y],
            vec![Vec3::Z],
            vec![Vec3::ZERO],
        )
        .unwrap();
        let mut state = formed(1.0);
        state.active_shape = ShapeId::Pyramid;
        let mut positions = vec![Vec3::ZERO];

        ParticleUpdater::default().update(&targets, &state, &[], &mut positions);

        assert!((positions[0] - Vec3::new(0.0, 0.0, 0.1)).length() < 1e-6);
    }

    #[test]
    fn test_push_moves_away() {
        let targets = single(Vec3::ZERO, Vec3::ZERO);
        let mut positions = vec![Vec3::ZERO];
        let forces = [ForcePoint::push(Vec3::new(1.0, 0.0, 0.0))];

        ParticleUpdater::default().update(&targets, &formed(1.0), &forces, &mut positions);

        assert!((positions[0] - Vec3::new(-0.03, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_pull_moves_closer() {
        let updater = ParticleUpdater::default();
        let mut pos = Vec3::ZERO;
        updater.apply_force(&mut pos, &ForcePoint::pull(Vec3::new(1.0, 0.0, 0.0)));

        // -1 * -0.05 * 0.2
        assert!((pos.x - 0.01).abs() < 1e-6);
        assert_eq!(pos.y, 0.0);
    }

    #[test]
    fn test_radius_boundary_exclusive() {
        let updater = ParticleUpdater::default();
        let mut pos = Vec3::ZERO;
        updater.apply_force(&mut pos, &ForcePoint::push(Vec3::new(1.2, 0.0, 0.0)));
        assert_eq!(pos, Vec3::ZERO);

        let mut far = Vec3::new(0.0, 5.0, 0.0);
        updater.apply_force(&mut far, &ForcePoint::push(Vec3::ZERO));
        assert_eq!(far, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn test_force_at_center_is_finite() {
        let updater = ParticleUpdater::default();
        let mut pos = Vec3::new(1.0, 1.0, 1.0);
        updater.apply_force(&mut pos, &ForcePoint::push(Vec3::new(1.0, 1.0, 1.0)));
        assert!(pos.is_finite());
        assert_eq!(pos, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_falloff_peaks_near_center() {
        let updater = ParticleUpdater::default();
        let displacement = |dist: f32| {
            let mut pos = Vec3::new(dist, 0.0, 0.0);
            updater.apply_force(&mut pos, &ForcePoint::push(Vec3::ZERO));
            pos.x - dist
        };
        // d * (r - d) is largest at r / 2
        assert!(displacement(0.6) > displacement(0.2));
        assert!(displacement(0.6) > displacement(1.0));
        assert!(displacement(1.19) > 0.0);
        assert_eq!(displacement(0.0), 0.0);
    }

    #[test]
    fn test_forces_accumulate_in_order() {
        let updater = ParticleUpdater::default();
        let forces = [
            ForcePoint::push(Vec3::new(1.0, 0.0, 0.0)),
            ForcePoint::push(Vec3::new(1.0, 0.0, 0.0)),
        ];

        let mut pos = Vec3::ZERO;
        for f in &forces {
            updater.apply_force(&mut pos, f);
        }

        // second push sees the particle at -0.03, dist 1.03
        let second = -1.03 * 0.15 * (1.2 - 1.03);
        assert!((pos.x - (-0.03 + second)).abs() < 1e-5);
    }

    #[test]
    fn test_many_frames_stay_finite() {
        let targets = TargetShapeSet::generate(1000, Some(8));
        let mut positions = targets.chaos().to_vec();
        let updater = ParticleUpdater::default();
        let mut state = FormationState::default();
        let forces: Vec<ForcePoint> = (0..5)
            .map(|i| {
                let p = Vec3::new(i as f32 - 2.0, 0.5, 0.0);
                if i % 3 == 0 {
                    ForcePoint::pull(p)
                } else {
                    ForcePoint::push(p)
                }
            })
            .collect();

        for frame in 0..300 {
            state.update(frame < 200);
            updater.update(&targets, &state, &forces, &mut positions);
        }
        assert!(positions.iter().all(|p| p.is_finite()));
    }
}
