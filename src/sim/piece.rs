//! Player pieces
//!
//! A piece owns exactly one visual group and one compound body. While pending
//! the body lives inside the piece and is moved by direct assignment; once
//! committed it is handed to the world and only the world moves it.

use glam::Vec3;
use rapier3d::prelude::{Collider, ColliderHandle, RigidBody, RigidBodyHandle};

use super::physics::{self, PhysicsWorld};
use super::shape::ShapeKind;
use crate::scene::{Transform, VisualId};

/// Stable piece identifier (allocation order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

/// Lifecycle state. Pending -> Active is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceState {
    Pending,
    Active,
}

/// Where the piece's body currently lives
enum PieceBody {
    /// Not simulated; owned by the piece
    Detached { body: RigidBody, collider: Collider },
    /// Registered with the world
    Registered {
        body: RigidBodyHandle,
        collider: ColliderHandle,
    },
}

pub struct Piece {
    pub id: PieceId,
    pub shape: ShapeKind,
    /// Visual group in the scene
    pub visual: VisualId,
    /// Local offset of each cube, identical for visual and collider
    pub offsets: Vec<Vec3>,
    pub color: [f32; 4],
    body: PieceBody,
}

impl Piece {
    /// Build a pending piece whose body is not yet in any world
    pub fn new(
        id: PieceId,
        shape: ShapeKind,
        visual: VisualId,
        offsets: Vec<Vec3>,
        color: [f32; 4],
        body: RigidBody,
        collider: Collider,
    ) -> Self {
        Self {
            id,
            shape,
            visual,
            offsets,
            color,
            body: PieceBody::Detached { body, collider },
        }
    }

    pub fn state(&self) -> PieceState {
        match self.body {
            PieceBody::Detached { .. } => PieceState::Pending,
            PieceBody::Registered { .. } => PieceState::Active,
        }
    }

    /// World handle of the body, once committed
    pub fn body_handle(&self) -> Option<RigidBodyHandle> {
        match self.body {
            PieceBody::Registered { body, .. } => Some(body),
            PieceBody::Detached { .. } => None,
        }
    }

    /// Current pose of the body
    pub fn transform(&self, world: &PhysicsWorld) -> Option<Transform> {
        match &self.body {
            PieceBody::Detached { body, .. } => Some(physics::body_transform(body)),
            PieceBody::Registered { body, .. } => world.body_transform(*body),
        }
    }

    /// Local offsets of the collider's sub-shapes
    pub fn collider_offsets(&self, world: &PhysicsWorld) -> Vec<Vec3> {
        let collider = match &self.body {
            PieceBody::Detached { collider, .. } => Some(collider),
            PieceBody::Registered { collider, .. } => world.collider(*collider),
        };
        collider.map(physics::sub_shape_offsets).unwrap_or_default()
    }

    /// Shift a pending piece horizontally. Returns false once active.
    pub fn nudge(&mut self, dx: f32) -> bool {
        match &mut self.body {
            PieceBody::Detached { body, .. } => {
                let mut t = *body.translation();
                t.x += dx;
                body.set_translation(t, false);
                true
            }
            PieceBody::Registered { .. } => false,
        }
    }

    /// Hand the body to the world. A no-op for an already active piece.
    pub fn commit(self, world: &mut PhysicsWorld) -> Self {
        let body = match self.body {
            PieceBody::Detached { body, collider } => {
                let (body, collider) = world.insert(body, collider);
                PieceBody::Registered { body, collider }
            }
            registered => registered,
        };
        Self { body, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn pending_piece(shape: ShapeKind, at: Vec3) -> Piece {
        let offsets = shape.local_offsets(BLOCK_SIZE);
        let collider = physics::compound_box_collider(&offsets, BLOCK_SIZE, PIECE_MASS);
        let mut scene = crate::scene::Scene::new();
        let visual = scene.add(Transform::from_position(at), Vec::new());
        Piece::new(
            PieceId(1),
            shape,
            visual,
            offsets,
            [1.0; 4],
            physics::dynamic_body(at),
            collider,
        )
    }

    #[test]
    fn test_nudge_only_while_pending() {
        let mut world = PhysicsWorld::new(Vec3::from(GRAVITY));
        let mut piece = pending_piece(ShapeKind::T, Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(piece.state(), PieceState::Pending);

        assert!(piece.nudge(-1.0));
        assert_eq!(piece.transform(&world).unwrap().position.x, -1.0);

        let mut piece = piece.commit(&mut world);
        assert_eq!(piece.state(), PieceState::Active);
        assert!(!piece.nudge(-1.0));
        assert_eq!(piece.transform(&world).unwrap().position.x, -1.0);
    }

    #[test]
    fn test_commit_registers_once() {
        let mut world = PhysicsWorld::new(Vec3::from(GRAVITY));
        let piece = pending_piece(ShapeKind::O, Vec3::ZERO);
        assert!(piece.body_handle().is_none());
        assert_eq!(world.body_count(), 0);

        let piece = piece.commit(&mut world);
        let handle = piece.body_handle().unwrap();
        assert!(world.contains(handle));
        assert_eq!(world.body_count(), 1);

        // Committing again must not register a second body
        let piece = piece.commit(&mut world);
        assert_eq!(piece.body_handle(), Some(handle));
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn test_collider_offsets_match_visual_offsets() {
        let mut world = PhysicsWorld::new(Vec3::from(GRAVITY));
        let piece = pending_piece(ShapeKind::L, Vec3::ZERO);
        assert_eq!(piece.collider_offsets(&world), piece.offsets);

        let piece = piece.commit(&mut world);
        assert_eq!(piece.collider_offsets(&world), piece.offsets);
    }
}
