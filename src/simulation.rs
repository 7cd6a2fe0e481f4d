//! Simulation state and the per-frame tick.
//!
//! [`SimulationState`] owns everything that changes between frames: the
//! position buffer, the formation factor, the active shape and the current
//! force points. A tick runs strictly in order:
//!
//! ```text
//! DetectorFrame ─▶ Normalizer ─▶ shape selection ─▶ FormationState ─▶ ParticleUpdater ─▶ RenderView
//! ```
//!
//! The renderer only ever sees the buffer through a shared borrow between
//! ticks, so it can never observe a half-updated frame.

use crate::config::SimConfig;
use crate::error::InitError;
use crate::formation::FormationState;
use crate::hands::{DetectorFrame, ForcePoint, NormalizedInput, Normalizer};
use crate::shapes::{ShapeId, TargetShapeSet};
use crate::updater::ParticleUpdater;
use crate::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// How hotkey selection and pinch gestures share the active shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionPolicy {
    /// Both paths write whenever they fire; the later write wins. While a
    /// hand is tracked the gesture writes every frame, so hotkeys only stick
    /// until the next tick with a hand.
    #[default]
    LastWriterWins,
    /// Gesture writes every frame as above, and hotkeys are ignored while a
    /// hand was present on the latest tick.
    ManualLockedWhileTracking,
    /// Gesture writes only when a pinch starts (cube) or ends (sphere), so a
    /// hotkey choice persists until the next pinch edge. Ticks without a
    /// hand leave the pinch state untouched.
    GestureRisingEdge,
}

/// Whether the cloud is being driven by a hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Tracking,
    ChaosDrift,
}

impl Status {
    /// Status line shown to the user.
    pub fn text(&self) -> &'static str {
        match self {
            Status::Tracking => "SYSTEM ACTIVE: 5-FINGER INPUT",
            Status::ChaosDrift => "MODE: CHAOS DRIFT",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Where a shape change came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ShapeSource {
    Manual,
    Gesture,
}

/// Read-only view of the position buffer for the renderer.
#[derive(Clone, Copy, Debug)]
pub struct RenderView<'a> {
    positions: &'a [Vec3],
    dirty: bool,
}

impl<'a> RenderView<'a> {
    /// One position per particle.
    #[inline]
    pub fn positions(&self) -> &'a [Vec3] {
        self.positions
    }

    /// Interleaved `x, y, z` floats, `3 * N` long.
    #[inline]
    pub fn as_flat(&self) -> &'a [f32] {
        bytemuck::cast_slice(self.positions)
    }

    /// Raw bytes, ready for a vertex buffer upload.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.positions)
    }

    /// Whether the buffer changed since the renderer last took the flag.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Everything the per-frame pipeline reads and writes.
pub struct SimulationState {
    targets: TargetShapeSet,
    positions: Vec<Vec3>,
    formation: FormationState,
    force_points: Vec<ForcePoint>,
    normalizer: Normalizer,
    updater: ParticleUpdater,
    policy: SelectionPolicy,
    status: Status,
    was_pinching: bool,
    dirty: bool,
    frame: u64,
}

impl SimulationState {
    /// Validate `config`, generate the formations and seed every particle at
    /// its chaos position.
    pub fn new(config: &SimConfig) -> Result<Self, InitError> {
        config.validate()?;
        let targets = TargetShapeSet::generate(config.particle_count, config.seed);
        Self::from_targets(config, targets)
    }

    /// Build from precomputed formations. The particle count is taken from
    /// `targets`; `config.particle_count` is ignored.
    pub fn from_targets(config: &SimConfig, targets: TargetShapeSet) -> Result<Self, InitError> {
        let config = SimConfig {
            particle_count: targets.len().max(1),
            ..config.clone()
        };
        config.validate()?;
        targets.validate()?;

        log::info!(
            "Simulation initialized: {} particles, seed {:?}, policy {:?}",
            targets.len(),
            config.seed,
            config.selection_policy
        );

        Ok(Self {
            positions: targets.chaos().to_vec(),
            targets,
            formation: FormationState::new(config.formation),
            force_points: Vec::new(),
            normalizer: config.normalizer(),
            updater: config.updater(),
            policy: config.selection_policy,
            status: Status::ChaosDrift,
            was_pinching: false,
            dirty: true,
            frame: 0,
        })
    }

    /// Advance one frame. `None` or a frame without hands means no input.
    pub fn tick(&mut self, frame: Option<&DetectorFrame>) -> Status {
        let input = self.normalizer.normalize(frame);
        self.apply_gesture(&input);
        self.formation.update(input.has_input());
        self.force_points = input.force_points;

        self.updater.update(
            &self.targets,
            &self.formation,
            &self.force_points,
            &mut self.positions,
        );
        self.dirty = true;
        self.frame += 1;

        let status = if input.pinch_distance.is_some() {
            Status::Tracking
        } else {
            Status::ChaosDrift
        };
        if status != self.status {
            log::info!("Frame {}: {}", self.frame, status);
            self.status = status;
        }
        status
    }

    /// Tick once if the mailbox holds a frame. Returns `None` when nothing
    /// arrived since the last call.
    pub fn tick_from(&mut self, mailbox: &DetectorMailbox) -> Option<Status> {
        mailbox.take().map(|frame| self.tick(Some(&frame)))
    }

    /// Manual shape selection (hotkeys 1/2/3).
    ///
    /// Returns `false` if the selection policy refused it.
    pub fn select_shape(&mut self, shape: ShapeId) -> bool {
        if self.policy == SelectionPolicy::ManualLockedWhileTracking
            && self.status == Status::Tracking
        {
            log::debug!("Ignoring manual {} selection while a hand is tracked", shape);
            return false;
        }
        self.set_shape(shape, ShapeSource::Manual);
        true
    }

    fn apply_gesture(&mut self, input: &NormalizedInput) {
        match self.policy {
            SelectionPolicy::LastWriterWins | SelectionPolicy::ManualLockedWhileTracking => {
                if let Some(shape) = input.gesture_shape() {
                    self.set_shape(shape, ShapeSource::Gesture);
                }
            }
            SelectionPolicy::GestureRisingEdge => {
                if input.has_input() && input.pinching != self.was_pinching {
                    let shape = if input.pinching {
                        ShapeId::Cube
                    } else {
                        ShapeId::Sphere
                    };
                    self.set_shape(shape, ShapeSource::Gesture);
                }
            }
        }
        // a dropped detector frame is not a release
        if input.has_input() {
            self.was_pinching = input.pinching;
        }
    }

    fn set_shape(&mut self, shape: ShapeId, source: ShapeSource) {
        if self.formation.active_shape != shape {
            log::debug!(
                "Active shape {} -> {} ({:?})",
                self.formation.active_shape,
                shape,
                source
            );
            self.formation.active_shape = shape;
        }
    }

    /// Override the formation factor, clamped to `[0, 1]`.
    pub fn set_formation_factor(&mut self, factor: f32) {
        self.formation.set_factor(factor);
    }

    /// Current buffer and change flag for the renderer.
    pub fn render_view(&self) -> RenderView<'_> {
        RenderView {
            positions: &self.positions,
            dirty: self.dirty,
        }
    }

    /// Read and clear the change flag. Renderers call this before re-uploading.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn formation(&self) -> &FormationState {
        &self.formation
    }

    #[inline]
    pub fn active_shape(&self) -> ShapeId {
        self.formation.active_shape
    }

    /// Force points applied on the latest tick.
    #[inline]
    pub fn force_points(&self) -> &[ForcePoint] {
        &self.force_points
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn targets(&self) -> &TargetShapeSet {
        &self.targets
    }

    #[inline]
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Ticks run so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Mean particle position.
    pub fn centroid(&self) -> Vec3 {
        if self.positions.is_empty() {
            return Vec3::ZERO;
        }
        self.positions.iter().copied().sum::<Vec3>() / self.positions.len() as f32
    }
}

#[derive(Debug, Default)]
struct MailboxSlot {
    frame: Option<DetectorFrame>,
    dropped: u64,
}

/// Latest-wins hand-off from the detector callback to the tick loop.
///
/// The detector may fire from another thread at its own rate. Posting over an
/// unconsumed frame replaces it; the stale one is counted and dropped.
#[derive(Clone, Debug, Default)]
pub struct DetectorMailbox {
    slot: Arc<Mutex<MailboxSlot>>,
}

impl DetectorMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a detector result.
    pub fn post(&self, frame: DetectorFrame) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.frame.replace(frame).is_some() {
            slot.dropped += 1;
        }
    }

    /// Take the pending frame, if any.
    pub fn take(&self) -> Option<DetectorFrame> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .frame
            .take()
    }

    /// Frames overwritten before a tick consumed them.
    pub fn dropped(&self) -> u64 {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).dropped
    }
}
