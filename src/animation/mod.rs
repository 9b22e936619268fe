//! Decorative page animations and the task that drives them.
//!
//! Each animated page owns an [`ActiveAnimation`]: the scene state plus an
//! [`AnimationHandle`] for the ticker task that requests frames. Dropping the
//! handle aborts the ticker, so leaving a page leaves nothing running behind.
//! Frames carry the generation they were issued for; a frame whose generation
//! does not match the live handle is discarded.

mod hero;
mod network;
mod particles;

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use crate::app::AppEvent;
use crate::router::Page;

pub use hero::{HeroShape, CELL_PX, SPIN_DURATION};
pub use network::{NeuralNetwork, Node, LINK_DISTANCE};
pub use particles::{Particle, ParticleField, PARTICLE_LIFETIME};

/// Logical canvas size shared by every scene.
pub const SCENE_WIDTH: f64 = 100.0;
pub const SCENE_HEIGHT: f64 = 50.0;

/// Nodes in the network background.
const NETWORK_NODES: usize = 18;

// ============================================================================
// Handle
// ============================================================================

/// Owner of a running frame ticker.
#[derive(Debug)]
pub struct AnimationHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl AnimationHandle {
    /// Start a ticker that sends [`AppEvent::AnimationFrame`] every `interval`.
    ///
    /// Frames are dropped rather than queued when the channel is full; the
    /// ticker stops on its own once the receiver is gone.
    pub fn spawn(generation: u64, interval: Duration, tx: mpsc::Sender<AppEvent>) -> Self {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // First tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match tx.try_send(AppEvent::AnimationFrame { generation }) {
                    Ok(()) | Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Closed(_)) => break,
                }
            }
        });
        tracing::debug!(generation, interval_ms = interval.as_millis() as u64, "Animation started");
        Self { generation, task }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.task.abort();
        tracing::debug!(generation = self.generation, "Animation released");
    }
}

// ============================================================================
// Scenes
// ============================================================================

/// Per-page animation state.
#[derive(Debug, Clone)]
pub enum Scene {
    Home {
        particles: ParticleField,
        hero: HeroShape,
    },
    Network(NeuralNetwork),
}

impl Scene {
    /// Fresh scene for `page`, or `None` for pages without animation.
    pub fn for_page(page: Page, particle_cap: usize, rng: StdRng) -> Option<Self> {
        match page {
            Page::Home => Some(Scene::Home {
                particles: ParticleField::new(SCENE_WIDTH, SCENE_HEIGHT, particle_cap, rng),
                hero: HeroShape::new(),
            }),
            Page::AiEconomics => Some(Scene::Network(NeuralNetwork::new(
                SCENE_WIDTH,
                SCENE_HEIGHT,
                NETWORK_NODES,
                rng,
            ))),
            Page::Papers | Page::Research => None,
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        match self {
            Scene::Home { particles, hero } => {
                particles.advance(dt);
                hero.advance(dt);
            }
            Scene::Network(network) => network.advance(dt),
        }
    }

    pub fn hero(&self) -> Option<&HeroShape> {
        match self {
            Scene::Home { hero, .. } => Some(hero),
            Scene::Network(_) => None,
        }
    }

    pub fn hero_mut(&mut self) -> Option<&mut HeroShape> {
        match self {
            Scene::Home { hero, .. } => Some(hero),
            Scene::Network(_) => None,
        }
    }
}

/// A scene together with the ticker that animates it.
#[derive(Debug)]
pub struct ActiveAnimation {
    pub scene: Scene,
    handle: AnimationHandle,
    frame: Duration,
}

impl ActiveAnimation {
    /// Build the scene for `page` and start its ticker.
    pub fn start(
        page: Page,
        generation: u64,
        frame: Duration,
        particle_cap: usize,
        tx: mpsc::Sender<AppEvent>,
    ) -> Option<Self> {
        let scene = Scene::for_page(page, particle_cap, StdRng::from_entropy())?;
        let handle = AnimationHandle::spawn(generation, frame, tx);
        Some(Self {
            scene,
            handle,
            frame,
        })
    }

    pub fn generation(&self) -> u64 {
        self.handle.generation()
    }

    /// Apply a frame. Returns `false` (and does nothing) for a stale generation.
    pub fn on_frame(&mut self, generation: u64) -> bool {
        if generation != self.handle.generation() {
            tracing::trace!(
                generation,
                live = self.handle.generation(),
                "Ignoring stale animation frame"
            );
            return false;
        }
        self.scene.advance(self.frame);
        true
    }
}
