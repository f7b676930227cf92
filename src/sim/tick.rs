//! Per-frame driver
//!
//! The host calls `Session::frame` once per display refresh with the wall
//! clock time since the previous call. A frame runs the deferred first
//! spawn, steps physics, syncs visuals and draws exactly once.

use super::session::Session;
use crate::consts::*;
use crate::renderer::RenderSurface;
use crate::settings::{Settings, StepMode};

/// Host-driven frame scheduler
#[derive(Debug, Clone)]
pub struct FrameClock {
    pub step_mode: StepMode,
    accumulator: f32,
    /// Seconds until the first spawn, if still waiting
    spawn_timer: Option<f32>,
    frames: u64,
}

impl FrameClock {
    pub fn new(settings: &Settings) -> Self {
        let delay = settings.initial_spawn_delay;
        Self {
            step_mode: settings.step_mode,
            accumulator: 0.0,
            spawn_timer: (delay > 0.0).then_some(delay),
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Count down the start-up delay; true on the frame it runs out
    pub fn spawn_due(&mut self, elapsed: f32) -> bool {
        match self.spawn_timer {
            Some(remaining) if remaining - elapsed <= 0.0 => {
                self.spawn_timer = None;
                true
            }
            Some(remaining) => {
                self.spawn_timer = Some(remaining - elapsed);
                false
            }
            None => false,
        }
    }

    /// Number of fixed steps to run this frame
    pub fn steps_for(&mut self, elapsed: f32) -> u32 {
        match self.step_mode {
            StepMode::PerFrame => 1,
            StepMode::Accumulated => {
                self.accumulator += elapsed.clamp(0.0, MAX_FRAME_DT);

                let mut substeps = 0;
                while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                    self.accumulator -= SIM_DT;
                    substeps += 1;
                }
                substeps
            }
        }
    }
}

impl Session {
    /// Run one animation frame: spawn check, physics, sync, one draw
    pub fn frame<S: RenderSurface>(
        &mut self,
        surface: &mut S,
        elapsed: f32,
    ) -> Result<(), S::Error> {
        if self.clock.spawn_due(elapsed) && self.pending().is_none() {
            self.spawn_piece();
        }

        let steps = self.clock.steps_for(elapsed);
        for _ in 0..steps {
            self.world_mut().step(SIM_DT);
        }
        self.clock.frames += 1;

        self.sync();
        surface.draw(self.scene(), self.camera(), self.light())
    }

    pub fn frames(&self) -> u64 {
        self.clock.frames()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Camera, DirectionalLight, Scene, SceneObject};
    use crate::sim::KeyAction;
    use std::convert::Infallible;

    /// Records every draw call
    #[derive(Default)]
    struct RecordingSurface {
        draws: usize,
        last: Vec<SceneObject>,
    }

    impl RenderSurface for RecordingSurface {
        type Error = Infallible;

        fn draw(
            &mut self,
            scene: &Scene,
            _camera: &Camera,
            _light: &DirectionalLight,
        ) -> Result<(), Infallible> {
            self.draws += 1;
            self.last = scene.objects().to_vec();
            Ok(())
        }
    }

    #[test]
    fn test_one_draw_and_one_step_per_frame() {
        let mut session = Session::new(Settings::immediate(), 1);
        let mut surface = RecordingSurface::default();

        for i in 1..=10 {
            // Elapsed time is ignored in per-frame mode
            session.frame(&mut surface, 0.5).unwrap();
            assert_eq!(surface.draws, i);
            assert_eq!(session.world().steps(), i as u64);
        }
        assert_eq!(session.frames(), 10);
    }

    #[test]
    fn test_accumulated_steps() {
        let settings = Settings {
            step_mode: StepMode::Accumulated,
            ..Settings::immediate()
        };
        let mut clock = FrameClock::new(&settings);

        assert_eq!(clock.steps_for(SIM_DT * 2.5), 2);
        // 0.5 step carried over plus a clamped 0.1 s frame
        assert_eq!(clock.steps_for(10.0), 6);
        assert_eq!(clock.steps_for(0.0), 0);
        for _ in 0..20 {
            assert!(clock.steps_for(1.0) <= MAX_SUBSTEPS);
        }
    }

    #[test]
    fn test_deferred_first_spawn() {
        let settings = Settings {
            initial_spawn_delay: 0.5,
            ..Settings::default()
        };
        let mut session = Session::new(settings, 2);
        let mut surface = RecordingSurface::default();

        session.frame(&mut surface, 0.2).unwrap();
        session.on_key(KeyAction::Drop);
        assert!(session.pending().is_none());
        assert!(session.active().is_empty());

        session.frame(&mut surface, 0.2).unwrap();
        assert!(session.pending().is_none());

        session.frame(&mut surface, 0.2).unwrap();
        assert!(session.pending().is_some());
        // Spawned piece is drawn in the same frame
        let visual = session.pending().unwrap().visual;
        assert!(surface.last.iter().any(|o| o.id == visual));
    }

    #[test]
    fn test_dropped_piece_lands_on_floor() {
        let mut session = Session::new(Settings::immediate(), 11);
        let mut surface = RecordingSurface::default();
        session.spawn_shape(crate::sim::ShapeKind::O);
        let id = session.pending().unwrap().id;
        session.on_key(KeyAction::Drop);

        for _ in 0..300 {
            session.frame(&mut surface, SIM_DT).unwrap();
        }

        let piece = session.active().get(id).unwrap();
        let y = piece.transform(session.world()).unwrap().position.y;
        let floor_top = FLOOR_Y + FLOOR_SEGMENT_SIZE[1] / 2.0;
        assert!(y > floor_top, "piece fell through the floor: {}", y);
        assert!(y < floor_top + 2.0, "piece did not come to rest: {}", y);
    }

    #[test]
    fn test_statics_never_move() {
        let mut session = Session::new(Settings::immediate(), 4);
        let mut surface = RecordingSurface::default();
        let before: Vec<_> = session
            .statics()
            .iter()
            .map(|s| session.world().body_transform(s.body).unwrap())
            .collect();

        for frame in 0..400 {
            if frame % 40 == 0 {
                session.on_key(KeyAction::Drop);
            }
            session.frame(&mut surface, SIM_DT).unwrap();
        }

        for (slab, t) in session.statics().iter().zip(before) {
            assert_eq!(session.world().body_transform(slab.body).unwrap(), t);
            assert_eq!(session.scene().get(slab.visual).unwrap().transform, t);
        }
    }
}
