//! Target formations for the particle cloud.
//!
//! Four position buffers are generated once at startup and never touched
//! again: a Fibonacci-lattice sphere, a filled cube, a filled pyramid, and the
//! scattered chaos cloud particles drift back to when nobody is interacting.
//!
//! # Example
//!
//! ```ignore
//! use morphcloud::shapes::{ShapeId, TargetShapeSet};
//!
//! let targets = TargetShapeSet::generate(10_000, Some(7));
//! let sphere = targets.shape(ShapeId::Sphere);
//! assert_eq!(sphere.len(), 10_000);
//! ```

use crate::error::InitError;
use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Radius of the sphere formation.
pub const SPHERE_RADIUS: f32 = 2.5;
/// Half-size of the cube formation.
pub const CUBE_HALF_SIZE: f32 = 2.0;
/// Height of the pyramid formation, apex to base.
pub const PYRAMID_HEIGHT: f32 = 4.0;
/// Half-width of the pyramid's square base.
pub const PYRAMID_BASE_HALF_WIDTH: f32 = 2.0;
/// Half-size of the cube the chaos cloud is scattered in.
pub const CHAOS_HALF_SIZE: f32 = 7.5;

/// A formation the cloud can converge to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShapeId {
    #[default]
    Sphere,
    Cube,
    Pyramid,
}

impl ShapeId {
    /// Every selectable formation, in hotkey order.
    pub const ALL: [ShapeId; 3] = [ShapeId::Sphere, ShapeId::Cube, ShapeId::Pyramid];

    /// Lowercase name, used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeId::Sphere => "sphere",
            ShapeId::Cube => "cube",
            ShapeId::Pyramid => "pyramid",
        }
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Random source for shape generation.
///
/// With a seed every buffer is reproducible; without one the seed comes from
/// the clock, so each run scatters differently.
pub struct ShapeContext {
    rng: SmallRng,
}

impl ShapeContext {
    /// Create a context from an optional seed.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });

        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Random f32 in the given range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        self.rng.gen_range(min..max)
    }

    /// Random point inside a cube of given half-size, centered at origin.
    pub fn random_in_cube(&mut self, half_size: f32) -> Vec3 {
        Vec3::new(
            self.random_range(-half_size, half_size),
            self.random_range(-half_size, half_size),
            self.random_range(-half_size, half_size),
        )
    }

    /// Random point inside the pyramid, centered vertically on the origin.
    ///
    /// A point is drawn in the bounding box, then its x and z are clamped to
    /// the cross-section at its height, so points pile onto the faces instead
    /// of being rejected.
    pub fn random_in_pyramid(&mut self) -> Vec3 {
        let (px, py, pz) = self.pyramid_sample();
        Vec3::new(px, py - PYRAMID_HEIGHT * 0.5, pz)
    }

    /// Pyramid point before the vertical offset: `py` runs from 0 (base) to
    /// [`PYRAMID_HEIGHT`] (apex).
    pub(crate) fn pyramid_sample(&mut self) -> (f32, f32, f32) {
        let hw = PYRAMID_BASE_HALF_WIDTH;
        let px = self.random_range(-hw, hw);
        let pz = self.random_range(-hw, hw);
        let py = self.random_range(0.0, PYRAMID_HEIGHT);

        let limit = pyramid_half_width_at(py);
        (px.clamp(-limit, limit), py, pz.clamp(-limit, limit))
    }
}

/// Half-width of the pyramid cross-section at height `py` above the base.
#[inline]
pub fn pyramid_half_width_at(py: f32) -> f32 {
    (PYRAMID_HEIGHT - py) / 2.0
}

/// Point `index` of a `count`-point Fibonacci lattice on a sphere.
///
/// Evaluated in f64 and narrowed, so the result only depends on the
/// platform's transcendental functions.
pub fn fibonacci_sphere_point(index: usize, count: usize, radius: f32) -> Vec3 {
    let n = count as f64;
    let phi = (-1.0 + (2.0 * index as f64) / n).acos();
    let theta = (n * std::f64::consts::PI).sqrt() * phi;
    let r = radius as f64;

    Vec3::new(
        (r * theta.cos() * phi.sin()) as f32,
        (r * theta.sin() * phi.sin()) as f32,
        (r * phi.cos()) as f32,
    )
}

/// The four immutable formation buffers, one position per particle.
#[derive(Debug, Clone)]
pub struct TargetShapeSet {
    sphere: Vec<Vec3>,
    cube: Vec<Vec3>,
    pyramid: Vec<Vec3>,
    chaos: Vec<Vec3>,
}

impl TargetShapeSet {
    /// Generate all four formations for `count` particles.
    ///
    /// A count of zero yields empty buffers.
    pub fn generate(count: usize, seed: Option<u64>) -> Self {
        let mut ctx = ShapeContext::new(seed);

        let mut sphere = Vec::with_capacity(count);
        let mut cube = Vec::with_capacity(count);
        let mut pyramid = Vec::with_capacity(count);
        let mut chaos = Vec::with_capacity(count);

        for i in 0..count {
            sphere.push(fibonacci_sphere_point(i, count, SPHERE_RADIUS));
            cube.push(ctx.random_in_cube(CUBE_HALF_SIZE));
            pyramid.push(ctx.random_in_pyramid());
            chaos.push(ctx.random_in_cube(CHAOS_HALF_SIZE));
        }

        Self {
            sphere,
            cube,
            pyramid,
            chaos,
        }
    }

    /// Assemble a set from precomputed buffers.
    ///
    /// All buffers must be the same non-zero length and hold only finite values.
    pub fn from_parts(
        sphere: Vec<Vec3>,
        cube: Vec<Vec3>,
        pyramid: Vec<Vec3>,
        chaos: Vec<Vec3>,
    ) -> Result<Self, InitError> {
        let set = Self {
            sphere,
            cube,
            pyramid,
            chaos,
        };
        set.validate()?;
        Ok(set)
    }

    /// Check buffer lengths and values.
    pub fn validate(&self) -> Result<(), InitError> {
        let expected = self.chaos.len();
        if expected == 0 {
            return Err(InitError::EmptyParticleCount);
        }

        for (name, buffer) in self.named_buffers() {
            if buffer.len() != expected {
                return Err(InitError::BufferLength {
                    shape: name,
                    expected,
                    actual: buffer.len(),
                });
            }
            if let Some(index) = buffer.iter().position(|p| !p.is_finite()) {
                return Err(InitError::NonFiniteTarget { shape: name, index });
            }
        }
        Ok(())
    }

    /// Number of particles per buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.chaos.len()
    }

    /// Whether the set holds no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chaos.is_empty()
    }

    /// Buffer for a selectable formation.
    pub fn shape(&self, id: ShapeId) -> &[Vec3] {
        match id {
            ShapeId::Sphere => &self.sphere,
            ShapeId::Cube => &self.cube,
            ShapeId::Pyramid => &self.pyramid,
        }
    }

    /// The scattered baseline.
    #[inline]
    pub fn chaos(&self) -> &[Vec3] {
        &self.chaos
    }

    fn named_buffers(&self) -> [(&'static str, &[Vec3]); 4] {
        [
            ("sphere", &self.sphere),
            ("cube", &self.cube),
            ("pyramid", &self.pyramid),
            ("chaos", &self.chaos),
        ]
    }
}
