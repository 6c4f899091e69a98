//! Gesture pose accumulation.
//!
//! Rotation, scale, and drag each run through a [`GestureChannel`]: a
//! committed value plus a live value for the gesture in progress. A
//! "changed" event replaces the live value, an "ended" event folds it into
//! the committed value and resets it to neutral. The three channels are
//! independent, so simultaneous gestures never interfere.
//!
//! # Event model
//!
//! Gesture recognizers report values relative to the start of the current
//! gesture, not per-frame increments:
//!
//! - rotation: total angle in radians since the gesture began
//! - scale: magnification ratio since the gesture began (1.0 = unchanged)
//! - drag: translation since the gesture began, in canvas units
//!
//! Callbacks are expected on a single thread, one at a time.

use std::fmt;
use std::marker::PhantomData;

use kurbo::Vec2;

use crate::pose::Pose;

/// Smallest scale ratio or committed scale accepted.
pub const MIN_SCALE: f64 = 1e-6;

/// How a channel folds a live value into its committed value.
pub trait ChannelKind {
    type Value: Copy + PartialEq + fmt::Debug;

    /// The live value of an idle gesture.
    const NEUTRAL: Self::Value;

    fn combine(committed: Self::Value, live: Self::Value) -> Self::Value;
}

/// Additive rotation in radians.
#[derive(Debug)]
pub enum Rotation {}

/// Multiplicative scale.
#[derive(Debug)]
pub enum Scale {}

/// Additive translation.
#[derive(Debug)]
pub enum Drag {}

impl ChannelKind for Rotation {
    type Value = f64;
    const NEUTRAL: f64 = 0.0;

    fn combine(committed: f64, live: f64) -> f64 {
        committed + live
    }
}

impl ChannelKind for Scale {
    type Value = f64;
    const NEUTRAL: f64 = 1.0;

    fn combine(committed: f64, live: f64) -> f64 {
        (committed * live).max(MIN_SCALE)
    }
}

impl ChannelKind for Drag {
    type Value = Vec2;
    const NEUTRAL: Vec2 = Vec2::ZERO;

    fn combine(committed: Vec2, live: Vec2) -> Vec2 {
        committed + live
    }
}

/// Two-phase state for one gesture kind: committed value plus pending delta.
pub struct GestureChannel<K: ChannelKind> {
    committed: K::Value,
    live: K::Value,
    active: bool,
    _kind: PhantomData<K>,
}

impl<K: ChannelKind> GestureChannel<K> {
    pub fn new() -> Self {
        Self {
            committed: K::NEUTRAL,
            live: K::NEUTRAL,
            active: false,
            _kind: PhantomData,
        }
    }

    /// Replace the live delta. Does not touch the committed value.
    pub fn set_live(&mut self, value: K::Value) {
        self.live = value;
        self.active = true;
    }

    pub fn live(&self) -> K::Value {
        self.live
    }

    pub fn committed(&self) -> K::Value {
        self.committed
    }

    /// Committed value with the live delta applied.
    pub fn effective(&self) -> K::Value {
        K::combine(self.committed, self.live)
    }

    /// Fold the live delta into the committed value and return the result.
    pub fn commit(&mut self) -> K::Value {
        self.committed = self.effective();
        self.live = K::NEUTRAL;
        self.active = false;
        self.committed
    }

    /// True from the first live update until the gesture commits, even
    /// while the live delta happens to be neutral.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn reset(&mut self) {
        self.committed = K::NEUTRAL;
        self.live = K::NEUTRAL;
        self.active = false;
    }
}

impl<K: ChannelKind> Default for GestureChannel<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ChannelKind> Clone for GestureChannel<K> {
    fn clone(&self) -> Self {
        Self {
            committed: self.committed,
            live: self.live,
            active: self.active,
            _kind: PhantomData,
        }
    }
}

impl<K: ChannelKind> fmt::Debug for GestureChannel<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureChannel")
            .field("committed", &self.committed)
            .field("live", &self.live)
            .field("active", &self.active)
            .finish()
    }
}

/// A single event from the gesture recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    RotateChanged(f64),
    RotateEnded,
    ScaleChanged(f64),
    ScaleEnded,
    DragChanged(Vec2),
    DragEnded,
}

/// Merges live gesture deltas with the committed pose.
#[derive(Debug, Clone)]
pub struct PoseAccumulator {
    rotation: GestureChannel<Rotation>,
    scale: GestureChannel<Scale>,
    drag: GestureChannel<Drag>,
    /// Ratio reported by the previous scale-changed event of this gesture.
    last_ratio: f64,
}

impl Default for PoseAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseAccumulator {
    pub fn new() -> Self {
        Self {
            rotation: GestureChannel::new(),
            scale: GestureChannel::new(),
            drag: GestureChannel::new(),
            last_ratio: 1.0,
        }
    }

    /// Dispatch a recognizer event to the matching handler.
    pub fn apply(&mut self, event: GestureEvent) {
        match event {
            GestureEvent::RotateChanged(radians) => self.on_rotate_changed(radians),
            GestureEvent::RotateEnded => self.on_rotate_ended(),
            GestureEvent::ScaleChanged(ratio) => {
                self.on_scale_changed(ratio);
            }
            GestureEvent::ScaleEnded => self.on_scale_ended(),
            GestureEvent::DragChanged(delta) => self.on_drag_changed(delta),
            GestureEvent::DragEnded => self.on_drag_ended(),
        }
    }

    /// Set the live rotation to the gesture's total angle so far.
    pub fn on_rotate_changed(&mut self, delta_radians: f64) {
        if !delta_radians.is_finite() {
            tracing::warn!(delta_radians, "ignoring non-finite rotation delta");
            return;
        }
        self.rotation.set_live(delta_radians);
    }

    pub fn on_rotate_ended(&mut self) {
        let rotation = self.rotation.commit();
        tracing::debug!(rotation, "rotation committed");
    }

    /// Record the gesture's magnification ratio since it began.
    ///
    /// Returns the multiplier relative to the previous call of this gesture
    /// (`ratio / last_ratio`), which is what a per-frame consumer applies.
    /// Non-positive ratios are clamped to [`MIN_SCALE`]; NaN is ignored.
    pub fn on_scale_changed(&mut self, ratio: f64) -> f64 {
        if ratio.is_nan() || ratio == f64::INFINITY {
            tracing::warn!(ratio, "ignoring non-finite scale ratio");
            return 1.0;
        }
        let ratio = if ratio < MIN_SCALE {
            tracing::warn!(ratio, min = MIN_SCALE, "clamping scale ratio");
            MIN_SCALE
        } else {
            ratio
        };

        let incremental = ratio / self.last_ratio;
        self.last_ratio = ratio;
        // Live scale is the whole-gesture ratio, i.e. the product of every
        // increment returned so far.
        self.scale.set_live(ratio);
        incremental
    }

    pub fn on_scale_ended(&mut self) {
        let scale = self.scale.commit();
        self.last_ratio = 1.0;
        tracing::debug!(scale, "scale committed");
    }

    /// Set the live translation to the gesture's offset so far.
    pub fn on_drag_changed(&mut self, translation: Vec2) {
        if !translation.is_finite() {
            tracing::warn!(?translation, "ignoring non-finite drag translation");
            return;
        }
        self.drag.set_live(translation);
    }

    pub fn on_drag_ended(&mut self) {
        let translation = self.drag.commit();
        tracing::debug!(?translation, "translation committed");
    }

    /// Committed pose with every live delta applied. Pure read.
    pub fn effective_pose(&self) -> Pose {
        Pose {
            rotation: self.rotation.effective(),
            scale: self.scale.effective(),
            translation: self.drag.effective(),
        }
    }

    /// Pose as of the most recent gesture end, ignoring live deltas.
    pub fn committed_pose(&self) -> Pose {
        Pose {
            rotation: self.rotation.committed(),
            scale: self.scale.committed(),
            translation: self.drag.committed(),
        }
    }

    /// True while any gesture has an uncommitted delta.
    pub fn has_live_gesture(&self) -> bool {
        self.rotation.is_active() || self.scale.is_active() || self.drag.is_active()
    }

    /// Return to the identity pose, dropping any in-progress gestures.
    pub fn reset(&mut self) {
        self.rotation.reset();
        self.scale.reset();
        self.drag.reset();
        self.last_ratio = 1.0;
        tracing::debug!("pose reset");
    }
}
