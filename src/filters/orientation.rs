//! Orientation tracker: reports dice-face transitions only.

use crate::events::Vector3;

/// Which side of the enclosure faces up. Opposite faces sum to seven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum Face {
    /// Classifier uncertain (tilted, moving, free fall).
    #[default]
    Unknown = 0,
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
}

impl Face {
    /// Integer code published on the radio.
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Black-box face classifier. Implementations may smooth over several
/// samples; the tracker only relies on `feed` followed by `current_face`.
pub trait FaceClassifier {
    fn feed(&mut self, sample: Vector3);
    fn current_face(&self) -> Face;
}

/// Wraps a classifier and remembers the last reported face.
#[derive(Debug, Clone)]
pub struct OrientationTracker<C> {
    classifier: C,
    last_face: Face,
}

impl<C: FaceClassifier> OrientationTracker<C> {
    /// Starts at [`Face::Unknown`], so an uncertain first reading is not
    /// reported.
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            last_face: Face::Unknown,
        }
    }

    /// Feed one sample. Returns the new face when it differs from the last
    /// one reported.
    pub fn feed(&mut self, sample: Vector3) -> Option<Face> {
        self.classifier.feed(sample);
        let face = self.classifier.current_face();
        if face == self.last_face {
            return None;
        }
        self.last_face = face;
        Some(face)
    }

    pub fn last_face(&self) -> Face {
        self.last_face
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }
}
