use std::f64::consts::TAU;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

/// Nodes closer than this are linked.
pub const LINK_DISTANCE: f64 = 22.0;
/// Pulse frequency in radians per second.
const PULSE_RATE: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    vx: f64,
    vy: f64,
    phase: f64,
}

/// Drifting nodes linked by proximity, drawn behind the AI Economics page.
#[derive(Debug, Clone)]
pub struct NeuralNetwork {
    width: f64,
    height: f64,
    nodes: Vec<Node>,
    elapsed: f64,
}

impl NeuralNetwork {
    pub fn new(width: f64, height: f64, count: usize, mut rng: StdRng) -> Self {
        let nodes = (0..count)
            .map(|_| Node {
                x: rng.gen_range(0.0..width.max(f64::EPSILON)),
                y: rng.gen_range(0.0..height.max(f64::EPSILON)),
                vx: rng.gen_range(-4.0..4.0),
                vy: rng.gen_range(-2.0..2.0),
                phase: rng.gen_range(0.0..TAU),
            })
            .collect();
        Self {
            width,
            height,
            nodes,
            elapsed: 0.0,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn advance(&mut self, dt: Duration) {
        let secs = dt.as_secs_f64();
        self.elapsed += secs;
        for node in &mut self.nodes {
            node.x += node.vx * secs;
            node.y += node.vy * secs;
            reflect(&mut node.x, &mut node.vx, self.width);
            reflect(&mut node.y, &mut node.vy, self.height);
        }
    }

    /// Index pairs of nodes within [`LINK_DISTANCE`] of each other.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges = Vec::new();
        for (i, a) in self.nodes.iter().enumerate() {
            for (j, b) in self.nodes.iter().enumerate().skip(i + 1) {
                if (a.x - b.x).hypot(a.y - b.y) < LINK_DISTANCE {
                    edges.push((i, j));
                }
            }
        }
        edges
    }

    /// Current pulse level of node `index`, in `[0, 1]`.
    pub fn brightness(&self, index: usize) -> f64 {
        self.nodes
            .get(index)
            .map(|n| 0.5 + 0.5 * (self.elapsed * PULSE_RATE + n.phase).sin())
            .unwrap_or(0.0)
    }
}

fn reflect(pos: &mut f64, vel: &mut f64, max: f64) {
    if *pos < 0.0 {
        *pos = (-*pos).min(max);
        *vel = vel.abs();
    } else if *pos > max {
        *pos = (2.0 * max - *pos).max(0.0);
        *vel = -vel.abs();
    }
}
