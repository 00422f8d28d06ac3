//! Layout orchestration: solve, then morph.
//!
//! Every layout request solves the radial layout synchronously, then
//! animates the shared graph from its current positions to the solved ones
//! over a fixed number of eased frames. Cancellation is an epoch counter:
//! a new request bumps it, and an in-flight animation re-checks after every
//! tick, backing off before its next position write once it is stale. At
//! most one animation ever advances the graph, and a superseded one resolves
//! with [`LayoutOutcome::Superseded`] instead of an error.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

use graph_orbit_core::{
    compute_radial, CenterPolicy, LayoutError, Point, RadialParams, VisualGraph,
};

use crate::surface::RenderSurface;

/// One layout request: where to center the next solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRequest {
    pub center: CenterPolicy,
}

impl LayoutRequest {
    /// Let the solver pick the center.
    pub fn automatic() -> Self {
        Self {
            center: CenterPolicy::Automatic,
        }
    }

    /// Center on one node, e.g. the double-clicked one.
    pub fn focus(id: &str) -> Self {
        Self {
            center: CenterPolicy::focus(id),
        }
    }
}

/// How a layout call resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutOutcome {
    /// The morph ran to its final frame; the graph sits exactly on the
    /// solved positions.
    Completed,
    /// A newer request took over mid-flight and owns the graph now.
    Superseded,
}

/// Drives radial layouts against the shared graph and the surface.
pub struct LayoutOrchestrator<R> {
    graph: Rc<RefCell<VisualGraph>>,
    surface: Rc<R>,
    params: RadialParams,
    morph_duration: Duration,
    frame_interval: Duration,
    epoch: Cell<u64>,
    animating: Cell<bool>,
}

impl<R: RenderSurface> LayoutOrchestrator<R> {
    pub fn new(
        graph: Rc<RefCell<VisualGraph>>,
        surface: Rc<R>,
        params: RadialParams,
        morph_duration: Duration,
        frame_interval: Duration,
    ) -> Self {
        Self {
            graph,
            surface,
            params,
            morph_duration,
            frame_interval,
            epoch: Cell::new(0),
            animating: Cell::new(false),
        }
    }

    /// Whether a morph is currently advancing the graph.
    pub fn is_animating(&self) -> bool {
        self.animating.get()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.get()
    }

    /// Solve and animate. Solving happens before any animation state is
    /// touched, so a failing request leaves an in-flight morph undisturbed.
    pub async fn layout(&self, request: LayoutRequest) -> Result<LayoutOutcome, LayoutError> {
        let targets = compute_radial(&self.graph.borrow(), &request.center, &self.params)?;
        if targets.is_empty() {
            return Ok(LayoutOutcome::Completed);
        }

        // taking the epoch cancels whatever morph was running
        let epoch = self.epoch.get() + 1;
        self.epoch.set(epoch);
        self.animating.set(true);

        let start: HashMap<String, Point> = self.graph.borrow().positions();
        let frames = frame_count(self.morph_duration, self.frame_interval);
        debug!(epoch, frames, nodes = targets.len(), "morph started");

        let mut ticks = tokio::time::interval(self.frame_interval);
        ticks.tick().await; // the first tick resolves immediately

        for frame in 1..=frames {
            ticks.tick().await;
            if self.epoch.get() != epoch {
                debug!(epoch, frame, "morph superseded");
                return Ok(LayoutOutcome::Superseded);
            }
            let eased = smoothstep(frame as f32 / frames as f32);
            {
                let mut graph = self.graph.borrow_mut();
                for (id, target) in &targets {
                    let from = start.get(id).copied().unwrap_or(*target);
                    // the last frame snaps to the target, no float residue
                    let position = if frame == frames {
                        *target
                    } else {
                        from.lerp(*target, eased)
                    };
                    graph.set_position(id, position);
                }
            }
            self.surface.positions_changed(&self.graph.borrow());
        }

        self.animating.set(false);
        debug!(epoch, "morph completed");
        Ok(LayoutOutcome::Completed)
    }
}

fn frame_count(duration: Duration, interval: Duration) -> u32 {
    let frames = duration.as_secs_f64() / interval.as_secs_f64();
    frames.round().max(1.0) as u32
}

/// Hermite ease-in-out over `t` in `[0, 1]`.
fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
