//! Face rotation module - the board-spin state machine
//!
//! Idle while `active == target`. A spin picks the neighbouring face as the
//! target and interpolates the presented angle over `spin_ms`, always taking
//! the short way round, then snaps to the target face.

use crate::geometry::face_angle;
use crate::types::{Spin, BOARD_SPIN_MS, SIDE_COUNT};

#[derive(Debug, Clone)]
pub struct FaceRotation {
    active: usize,
    target: usize,
    elapsed_ms: u32,
    angle: f32,
    spin_ms: u32,
}

impl Default for FaceRotation {
    fn default() -> Self {
        Self::new(BOARD_SPIN_MS)
    }
}

impl FaceRotation {
    pub fn new(spin_ms: u32) -> Self {
        Self {
            active: 0,
            target: 0,
            elapsed_ms: 0,
            angle: face_angle(0),
            spin_ms: spin_ms.max(1),
        }
    }

    pub fn active_face(&self) -> usize {
        self.active
    }

    pub fn target_face(&self) -> usize {
        self.target
    }

    /// Presented angle in degrees. Leaves `[0, 360)` briefly while spinning
    /// across face 0.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn is_rotating(&self) -> bool {
        self.active != self.target
    }

    /// The face a spin from the active face would present.
    pub fn target_for(&self, spin: Spin) -> usize {
        (self.active as i32 + spin.sign()).rem_euclid(SIDE_COUNT as i32) as usize
    }

    /// Start a spin. Returns the new target, or `None` while already rotating.
    pub fn begin(&mut self, spin: Spin) -> Option<usize> {
        if self.is_rotating() {
            return None;
        }
        self.target = self.target_for(spin);
        self.elapsed_ms = 0;
        Some(self.target)
    }

    /// Advance the spin animation. Returns true on the frame the spin lands.
    pub fn update(&mut self, dt_ms: u32) -> bool {
        if !self.is_rotating() {
            return false;
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);

        let from = face_angle(self.active);
        let mut delta = face_angle(self.target) - from;
        if delta > 90.0 {
            delta = -90.0;
        } else if delta < -90.0 {
            delta = 90.0;
        }
        self.angle = from + (self.elapsed_ms as f32 / self.spin_ms as f32) * delta;

        if self.elapsed_ms > self.spin_ms {
            self.active = self.target;
            self.angle = face_angle(self.active);
            self.elapsed_ms = 0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_idle_by_default() {
        let mut r = FaceRotation::default();
        assert!(!r.is_rotating());
        assert!(!r.update(100));
        assert_eq!(r.angle(), 0.0);
    }

    #[test]
    fn test_targets_wrap() {
        let r = FaceRotation::default();
        assert_eq!(r.target_for(Spin::Clockwise), 1);
        assert_eq!(r.target_for(Spin::CounterClockwise), 3);
    }

    #[test]
    fn test_refuses_while_rotating() {
        let mut r = FaceRotation::default();
        assert_eq!(r.begin(Spin::Clockwise), Some(1));
        assert_eq!(r.begin(Spin::Clockwise), None);
        assert_eq!(r.target_face(), 1);
    }

    #[test]
    fn test_interpolates_then_snaps() {
        let mut r = FaceRotation::new(200);
        r.begin(Spin::Clockwise);
        assert!(!r.update(100));
        assert_relative_eq!(r.angle(), 45.0);
        assert_eq!(r.active_face(), 0);

        // Exactly at the duration is still in flight.
        assert!(!r.update(100));
        assert_relative_eq!(r.angle(), 90.0);
        assert!(r.update(16));
        assert_eq!(r.active_face(), 1);
        assert_eq!(r.angle(), 90.0);
        assert!(!r.is_rotating());
    }

    #[test]
    fn test_short_way_round() {
        let mut r = FaceRotation::new(200);
        r.begin(Spin::CounterClockwise);
        r.update(100);
        assert_relative_eq!(r.angle(), -45.0);
        r.update(200);
        assert_eq!(r.active_face(), 3);
        assert_eq!(r.angle(), 270.0);

        r.begin(Spin::Clockwise);
        r.update(100);
        assert_relative_eq!(r.angle(), 315.0);
        r.update(200);
        assert_eq!(r.active_face(), 0);
    }
}
