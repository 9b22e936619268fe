use std::time::Duration;

/// Duration of the spin started by a click.
pub const SPIN_DURATION: Duration = Duration::from_secs(1);
/// Pointer offset (in pixels) per degree of tilt.
const TILT_DIVISOR: f64 = 10.0;
/// Approximate terminal cell size in pixels, used to turn cell offsets into
/// pointer offsets.
pub const CELL_PX: (f64, f64) = (8.0, 16.0);

const VERTICES: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Wireframe cube on the home page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeroShape {
    tilt_x: f64,
    tilt_y: f64,
    spin: Option<Duration>,
}

impl HeroShape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tilt toward the pointer. Offsets are in pixels from the shape's center.
    pub fn track_pointer(&mut self, dx: f64, dy: f64) {
        self.tilt_x = dy / TILT_DIVISOR;
        self.tilt_y = dx / TILT_DIVISOR;
    }

    /// Start (or restart) the one-second spin.
    pub fn start_spin(&mut self) {
        self.spin = Some(Duration::ZERO);
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    pub fn advance(&mut self, dt: Duration) {
        if let Some(elapsed) = self.spin.as_mut() {
            *elapsed += dt;
            if *elapsed >= SPIN_DURATION {
                self.spin = None;
            }
        }
    }

    fn spin_progress(&self) -> f64 {
        self.spin
            .map(|e| (e.as_secs_f64() / SPIN_DURATION.as_secs_f64()).min(1.0))
            .unwrap_or(0.0)
    }

    /// Rotation about the X and Y axes, in degrees.
    pub fn rotation(&self) -> (f64, f64) {
        let extra = 360.0 * self.spin_progress();
        (self.tilt_x + extra, self.tilt_y + extra)
    }

    pub fn scale(&self) -> f64 {
        if self.spin.is_some() {
            1.2
        } else {
            1.0
        }
    }

    /// Cube edges projected onto the plane, centered on `(cx, cy)` with half-size `size`.
    pub fn projected_edges(&self, cx: f64, cy: f64, size: f64) -> Vec<((f64, f64), (f64, f64))> {
        let (rx, ry) = self.rotation();
        let (sx, cx_) = rx.to_radians().sin_cos();
        let (sy, cy_) = ry.to_radians().sin_cos();
        let s = size * self.scale();

        let project = |v: [f64; 3]| {
            let [x, y, z] = v;
            // About X.
            let (y, z) = (y * cx_ - z * sx, y * sx + z * cx_);
            // About Y.
            let x = x * cy_ + z * sy;
            (cx + x * s, cy + y * s)
        };

        EDGES
            .iter()
            .map(|&(a, b)| (project(VERTICES[a]), project(VERTICES[b])))
            .collect()
    }
}
