//! Cube module - a single cell of a piece or of the board
//!
//! A cube carries its color plus the transient state a renderer needs:
//! where it is, how it moves once thrown off the board, and how brightly it
//! flashes. Ownership moves piece → board → ejected list over its life.

use glam::Vec3;

use crate::types::EJECT_KILL_Y;

#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    palette: u8,
    position: Vec3,
    velocity: Vec3,
    acceleration: Vec3,
    spin_axis: Vec3,
    /// Degrees per second about `spin_axis`.
    spin_speed: f32,
    spin_angle: f32,
    flash_elapsed_ms: u32,
    flash_ms: u32,
}

impl Cube {
    pub fn new(palette: u8) -> Self {
        Self {
            palette,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            spin_axis: Vec3::Y,
            spin_speed: 0.0,
            spin_angle: 0.0,
            flash_elapsed_ms: 0,
            flash_ms: 0,
        }
    }

    pub fn palette(&self) -> u8 {
        self.palette
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn spin_axis(&self) -> Vec3 {
        self.spin_axis
    }

    pub fn spin_angle(&self) -> f32 {
        self.spin_angle
    }

    /// Give the cube a velocity and a constant acceleration.
    pub fn set_trajectory(&mut self, velocity: Vec3, acceleration: Vec3) {
        self.velocity = velocity;
        self.acceleration = acceleration;
    }

    pub fn set_spin(&mut self, axis: Vec3, degrees_per_sec: f32) {
        self.spin_axis = axis;
        self.spin_speed = degrees_per_sec;
    }

    /// Start (or restart) a flash lasting `duration_ms`.
    pub fn flash(&mut self, duration_ms: u32) {
        self.flash_ms = duration_ms;
        self.flash_elapsed_ms = 0;
    }

    pub fn is_flashing(&self) -> bool {
        self.flash_ms != 0
    }

    /// Flash brightness in `[0, 1]`: rises then falls over the flash duration.
    pub fn flash_level(&self) -> f32 {
        if self.flash_ms == 0 {
            return 0.0;
        }
        let t = self.flash_elapsed_ms as f32 / self.flash_ms as f32;
        (std::f32::consts::PI * (1.0 - t)).sin().max(0.0)
    }

    /// Advance motion, spin and flash by `dt_ms`.
    pub fn advance(&mut self, dt_ms: u32) {
        let dt = dt_ms as f32 / 1000.0;

        if self.velocity != Vec3::ZERO {
            self.position += self.velocity * dt;
        }
        self.velocity += self.acceleration * dt;

        if self.spin_speed != 0.0 {
            self.spin_angle += self.spin_speed * dt;
        }

        if self.flash_ms != 0 {
            self.flash_elapsed_ms = self.flash_elapsed_ms.saturating_add(dt_ms);
            if self.flash_elapsed_ms >= self.flash_ms {
                self.flash_elapsed_ms = 0;
                self.flash_ms = 0;
            }
        }
    }

    /// An ejected cube is dead once it has fallen well below the board.
    pub fn is_dead(&self) -> bool {
        self.position.y < EJECT_KILL_Y
    }
}
