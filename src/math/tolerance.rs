/// Numeric tolerances shared by every component of a build.
///
/// Constructed once per engine instance and passed by value; nothing in the
/// crate mutates a `Tolerances` after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Two vertices closer than this are the same vertex.
    pub vertex_merge: f64,
    /// Relative determinant threshold below which two segments are parallel.
    pub parallel: f64,
    /// Slack on segment parameters and endpoint coincidence.
    pub parameter: f64,
    /// Angular slack (radians) when testing arc sweeps.
    pub angle: f64,
    /// Distance at which two tile boundaries are considered touching.
    pub contact: f64,
    /// Per-entry slack when comparing transform matrices.
    pub transform: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            vertex_merge: 1e-7,
            parallel: 1e-10,
            parameter: 1e-7,
            angle: 1e-7,
            contact: 1e-5,
            transform: 1e-9,
        }
    }
}

impl Tolerances {
    /// Returns a copy with a different vertex merge radius.
    #[must_use]
    pub fn with_vertex_merge(mut self, value: f64) -> Self {
        self.vertex_merge = value;
        self
    }

    /// Returns a copy with a different parallel threshold.
    #[must_use]
    pub fn with_parallel(mut self, value: f64) -> Self {
        self.parallel = value;
        self
    }

    /// Returns a copy with a different parameter slack.
    #[must_use]
    pub fn with_parameter(mut self, value: f64) -> Self {
        self.parameter = value;
        self
    }

    /// Returns a copy with a different angular slack.
    #[must_use]
    pub fn with_angle(mut self, value: f64) -> Self {
        self.angle = value;
        self
    }

    /// Returns a copy with a different contact distance.
    #[must_use]
    pub fn with_contact(mut self, value: f64) -> Self {
        self.contact = value;
        self
    }

    /// Returns a copy with a different transform comparison slack.
    #[must_use]
    pub fn with_transform(mut self, value: f64) -> Self {
        self.transform = value;
        self
    }
}
