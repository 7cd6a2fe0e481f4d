//! # morphcloud - hand-driven particle formations
//!
//! A point cloud that assembles into shapes while a hand is in view and
//! dissolves back into chaos when it leaves. Fingertips push and pull the
//! particles around them.
//!
//! The crate is the per-frame simulation core. Windowing, rendering and the
//! hand-landmark detector live in the host; morphcloud takes detector frames
//! in and hands a position buffer out.
//!
//! ## Quick Start
//!
//! ```ignore
//! use morphcloud::prelude::*;
//!
//! let mut sim = SimulationState::new(&SimConfig::default())?;
//!
//! // every detector callback
//! let status = sim.tick(Some(&frame));
//! if sim.take_dirty() {
//!     renderer.upload(sim.render_view().as_bytes());
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Formations
//!
//! Four buffers are generated once at startup (see [`shapes`]): a sphere, a
//! cube, a pyramid and a chaos scatter. Each frame every particle eases toward
//! `lerp(chaos, active shape, formation factor)`.
//!
//! ### Formation factor
//!
//! A scalar in `[0, 1]` ([`FormationState`]). It climbs toward 1 while a hand
//! is tracked and decays toward 0 when it is not, slower on the way down.
//!
//! ### Force points
//!
//! The five fingertips of the first hand become [`ForcePoint`]s. Within the
//! interaction radius each one pushes or pulls particles, following a fixed
//! role table (thumb and ring pull, the others push).
//!
//! ### Gestures and hotkeys
//!
//! Pinching thumb and index together selects the cube; an open hand selects
//! the sphere. Keys 1/2/3 select shapes by hand. How the two interact is set
//! by [`SelectionPolicy`].
//!
//! ## Feature Overview
//!
//! | Module | Role |
//! |--------|------|
//! | [`shapes`] | Target formation buffers |
//! | [`formation`] | Formation factor and active shape |
//! | [`hands`] | Detector frames to force points and pinch reading |
//! | [`updater`] | Per-particle blend, ease and force pass |
//! | [`simulation`] | Tick ordering, shape selection, render view |
//! | [`input`] | Hotkey shape selection from winit events |
//! | [`config`] | JSON configuration |
//! | [`time`] | Tick rate sampling |

pub mod config;
pub mod error;
pub mod formation;
pub mod hands;
pub mod input;
pub mod shapes;
pub mod simulation;
pub mod time;
pub mod updater;

pub use bytemuck;
pub use config::SimConfig;
pub use error::{ConfigError, InitError};
pub use formation::{FormationRates, FormationState};
pub use glam::Vec3;
pub use hands::{
    DetectorFrame, ForcePoint, ForceRole, Hand, Landmark, NormalizedInput, Normalizer, RoleTable,
};
pub use input::ShapeHotkeys;
pub use shapes::{ShapeId, TargetShapeSet};
pub use simulation::{DetectorMailbox, RenderView, SelectionPolicy, SimulationState, Status};
pub use updater::{ForceParams, ParticleUpdater};

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use morphcloud::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::SimConfig;
    pub use crate::hands::{DetectorFrame, ForcePoint, ForceRole, Hand, Landmark};
    pub use crate::input::ShapeHotkeys;
    pub use crate::shapes::ShapeId;
    pub use crate::simulation::{DetectorMailbox, SelectionPolicy, SimulationState, Status};
    pub use crate::Vec3;
}
