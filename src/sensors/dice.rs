//! Dominant-axis dice classifier.
//!
//! Gravity points down, so the axis carrying ~1 g tells which face is up.
//! A face is entered only when one axis is clearly dominant and the other
//! two are small; it is kept while its axis stays above a lower hold
//! threshold, so a slight tilt does not toggle between face and `Unknown`.
//!
//! | Up axis | Face |
//! |---------|------|
//! | +Z      | 1    |
//! | +X      | 2    |
//! | +Y      | 3    |
//! | −Y      | 4    |
//! | −X      | 5    |
//! | −Z      | 6    |

use crate::events::Vector3;
use crate::filters::{Face, FaceClassifier};

/// Axis magnitude needed to enter a face (g).
const ENTER_G: f32 = 0.8;
/// Axis magnitude needed to stay on the current face (g).
const HOLD_G: f32 = 0.6;
/// Maximum magnitude of the two off-axes when entering a face (g).
const TILT_G: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct Dice {
    face: Face,
}

impl Dice {
    /// Start from a known face (usually [`Face::Unknown`]).
    pub fn new(initial: Face) -> Self {
        Self { face: initial }
    }

    fn axis_value(face: Face, v: Vector3) -> Option<f32> {
        match face {
            Face::One => Some(v.z),
            Face::Six => Some(-v.z),
            Face::Two => Some(v.x),
            Face::Five => Some(-v.x),
            Face::Three => Some(v.y),
            Face::Four => Some(-v.y),
            Face::Unknown => None,
        }
    }

    fn dominant(v: Vector3) -> Face {
        let (ax, ay, az) = (v.x.abs(), v.y.abs(), v.z.abs());
        let (axis, off_a, off_b) = if az >= ax && az >= ay {
            (v.z, ax, ay)
        } else if ax >= ay {
            (v.x, ay, az)
        } else {
            (v.y, ax, az)
        };
        if axis.abs() < ENTER_G || off_a > TILT_G || off_b > TILT_G {
            return Face::Unknown;
        }
        let positive = axis > 0.0;
        if az >= ax && az >= ay {
            if positive { Face::One } else { Face::Six }
        } else if ax >= ay {
            if positive { Face::Two } else { Face::Five }
        } else if positive {
            Face::Three
        } else {
            Face::Four
        }
    }
}

impl Default for Dice {
    fn default() -> Self {
        Self::new(Face::Unknown)
    }
}

impl FaceClassifier for Dice {
    fn feed(&mut self, sample: Vector3) {
        if !sample.is_finite() {
            self.face = Face::Unknown;
            return;
        }
        if let Some(value) = Self::axis_value(self.face, sample) {
            if value >= HOLD_G {
                return;
            }
        }
        self.face = Self::dominant(sample);
    }

    fn current_face(&self) -> Face {
        self.face
    }
}
