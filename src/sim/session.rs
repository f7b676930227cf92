//! Game session
//!
//! One session owns one physics world, one scene and at most one pending
//! piece. The spawner, the key handler and the transform sync all live here;
//! the per-frame driver is in `tick`.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use rapier3d::prelude::RigidBodyHandle;

use super::input::KeyAction;
use super::physics::{self, PhysicsWorld};
use super::piece::{Piece, PieceId};
use super::registry::ActivePieces;
use super::shape::ShapeKind;
use super::tick::FrameClock;
use crate::consts::*;
use crate::scene::{Camera, Cube, DirectionalLight, Scene, Transform, VisualId};
use crate::settings::Settings;

/// Immovable floor or wall: a visual paired with a fixed body
#[derive(Debug, Clone, Copy)]
pub struct StaticSlab {
    pub visual: VisualId,
    pub body: RigidBodyHandle,
}

pub struct Session {
    settings: Settings,
    pub seed: u64,
    world: PhysicsWorld,
    scene: Scene,
    camera: Camera,
    light: DirectionalLight,
    rng: Pcg32,
    statics: Vec<StaticSlab>,
    pending: Option<Piece>,
    active: ActivePieces,
    pub(super) clock: FrameClock,
    next_piece_id: u32,
}

impl Session {
    /// Build the world, floor and walls. The first piece appears right away
    /// when `initial_spawn_delay` is zero, otherwise on a later frame.
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut session = Self {
            world: PhysicsWorld::new(Vec3::from(settings.gravity)),
            scene: Scene::new(),
            camera: Camera::new(1.0),
            light: DirectionalLight::default(),
            rng: Pcg32::seed_from_u64(seed),
            statics: Vec::new(),
            pending: None,
            active: ActivePieces::new(settings.max_active_pieces),
            clock: FrameClock::new(&settings),
            next_piece_id: 1,
            seed,
            settings,
        };

        for i in 0..FLOOR_SEGMENTS {
            let center = Vec3::new(FLOOR_START_X + i as f32 * FLOOR_SEGMENT_SIZE[0], FLOOR_Y, 0.0);
            session.add_static(center, Vec3::from(FLOOR_SEGMENT_SIZE), FLOOR_COLOR);
        }
        let wall_y = FLOOR_Y + WALL_SIZE[1] / 2.0;
        for x in [-WALL_X, WALL_X] {
            session.add_static(Vec3::new(x, wall_y, 0.0), Vec3::from(WALL_SIZE), WALL_COLOR);
        }

        log::info!(
            "Session created with seed {} ({} static bodies, {} stepping)",
            seed,
            session.statics.len(),
            session.settings.step_mode.as_str()
        );

        if session.settings.initial_spawn_delay <= 0.0 {
            session.spawn_piece();
        }
        session
    }

    fn add_static(&mut self, center: Vec3, size: Vec3, color: [f32; 4]) {
        let body = self.world.add_static_box(center, size);
        let visual = self.scene.add(
            Transform::from_position(center),
            vec![Cube {
                offset: Vec3::ZERO,
                size,
                color,
            }],
        );
        self.statics.push(StaticSlab { visual, body });
    }

    /// Spawn a uniformly random shape as the new pending piece
    pub fn spawn_piece(&mut self) -> PieceId {
        let shape = ShapeKind::random(&mut self.rng);
        self.spawn_shape(shape)
    }

    /// Spawn `shape` as the new pending piece, replacing any previous one.
    /// The body is not added to the world until the piece is dropped.
    pub fn spawn_shape(&mut self, shape: ShapeKind) -> PieceId {
        let id = PieceId(self.next_piece_id);
        self.next_piece_id += 1;

        let block_size = self.settings.block_size;
        let color = [
            self.rng.random::<f32>(),
            self.rng.random::<f32>(),
            self.rng.random::<f32>(),
            1.0,
        ];
        let offsets = shape.local_offsets(block_size);
        let spawn = Vec3::new(self.settings.spawn_x, self.settings.spawn_height, 0.0);

        let cubes = offsets
            .iter()
            .map(|&offset| Cube {
                offset,
                size: Vec3::splat(block_size),
                color,
            })
            .collect();
        let visual = self.scene.add(Transform::from_position(spawn), cubes);

        let body = physics::dynamic_body(spawn);
        let collider = physics::compound_box_collider(&offsets, block_size, PIECE_MASS);
        let piece = Piece::new(id, shape, visual, offsets, color, body, collider);

        if let Some(old) = self.pending.replace(piece) {
            self.scene.remove(old.visual);
            log::debug!("Pending piece {:?} replaced", old.id);
        }
        log::debug!("Spawned {} piece {:?}", shape.letter(), id);
        id
    }

    /// Handle one key press. Ignored when nothing is pending.
    pub fn on_key(&mut self, action: KeyAction) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        match action {
            KeyAction::MoveLeft | KeyAction::MoveRight => {
                if pending.nudge(action.direction() * self.settings.move_step) {
                    if let Some(t) = pending.transform(&self.world) {
                        self.scene.set_transform(pending.visual, t);
                    }
                }
            }
            KeyAction::Drop => self.drop_pending(),
        }
    }

    /// Commit the pending piece to the world and spawn the next one
    fn drop_pending(&mut self) {
        let Some(piece) = self.pending.take() else {
            return;
        };
        let piece = piece.commit(&mut self.world);
        let id = piece.id;

        for old in self.active.push(piece) {
            if let Some(handle) = old.body_handle() {
                self.world.remove(handle);
            }
            self.scene.remove(old.visual);
            log::info!("Evicted piece {:?} (cap {:?})", old.id, self.active.capacity());
        }
        log::info!("Dropped piece {:?} ({} active)", id, self.active.len());

        self.spawn_piece();
    }

    /// Copy every piece's body pose onto its visual group
    pub fn sync(&mut self) {
        for piece in self.active.iter().chain(self.pending.iter()) {
            if let Some(t) = piece.transform(&self.world) {
                self.scene.set_transform(piece.visual, t);
            }
        }
    }

    /// Settings this session was built with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(super) fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn light(&self) -> &DirectionalLight {
        &self.light
    }

    pub fn statics(&self) -> &[StaticSlab] {
        &self.statics
    }

    pub fn pending(&self) -> Option<&Piece> {
        self.pending.as_ref()
    }

    pub fn active(&self) -> &ActivePieces {
        &self.active
    }
}
