//! Rigid-body world
//!
//! Thin owner of the rapier3d pipeline and sets. Everything above this module
//! speaks glam; conversion to nalgebra happens here.

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use crate::scene::Transform;

/// The single physics world of a session
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    /// Number of steps taken so far
    steps: u64,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: to_vector(gravity),
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            steps: 0,
        }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Add an immovable box. `size` is the full edge lengths.
    pub fn add_static_box(&mut self, center: Vec3, size: Vec3) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(to_vector(center))
            .build();
        let half = size * 0.5;
        let collider = ColliderBuilder::cuboid(half.x, half.y, half.z).build();
        self.insert(body, collider).0
    }

    /// Register a body together with its collider
    pub fn insert(
        &mut self,
        body: RigidBody,
        collider: Collider,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body_handle = self.bodies.insert(body);
        let collider_handle = self
            .colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);
        (body_handle, collider_handle)
    }

    /// Remove a body and its attached colliders. Returns false if unknown.
    pub fn remove(&mut self, handle: RigidBodyHandle) -> bool {
        self.bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    /// Advance every registered body by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
        self.steps += 1;
    }

    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    pub fn body_transform(&self, handle: RigidBodyHandle) -> Option<Transform> {
        self.bodies.get(handle).map(body_transform)
    }
}

/// Read a body's pose, registered or not
pub fn body_transform(body: &RigidBody) -> Transform {
    let r = body.rotation();
    Transform {
        position: to_vec3(body.translation()),
        rotation: Quat::from_xyzw(r.i, r.j, r.k, r.w),
    }
}

/// Build a dynamic body at `position`, not yet in any world
pub fn dynamic_body(position: Vec3) -> RigidBody {
    RigidBodyBuilder::dynamic()
        .translation(to_vector(position))
        .build()
}

/// One collider made of one cube per offset, sharing a single total mass
pub fn compound_box_collider(offsets: &[Vec3], block_size: f32, mass: f32) -> Collider {
    let half = block_size * 0.5;
    let shapes = offsets
        .iter()
        .map(|o| {
            (
                Isometry::translation(o.x, o.y, o.z),
                SharedShape::cuboid(half, half, half),
            )
        })
        .collect::<Vec<_>>();
    ColliderBuilder::compound(shapes).mass(mass).build()
}

/// Local offsets of every sub-shape of a compound collider
pub fn sub_shape_offsets(collider: &Collider) -> Vec<Vec3> {
    match collider.shape().as_compound() {
        Some(compound) => compound
            .shapes()
            .iter()
            .map(|(iso, _)| to_vec3(&iso.translation.vector))
            .collect(),
        None => vec![Vec3::ZERO],
    }
}

pub fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_dynamic_body_falls() {
        let mut world = PhysicsWorld::new(Vec3::from(GRAVITY));
        let collider = compound_box_collider(&[Vec3::ZERO], 1.0, 1.0);
        let (handle, _) = world.insert(dynamic_body(Vec3::new(0.0, 3.0, 0.0)), collider);

        for _ in 0..30 {
            world.step(SIM_DT);
        }

        let t = world.body_transform(handle).unwrap();
        assert!(t.position.y < 3.0);
        assert_eq!(world.steps(), 30);
    }

    #[test]
    fn test_static_box_never_moves() {
        let mut world = PhysicsWorld::new(Vec3::from(GRAVITY));
        let floor = world.add_static_box(Vec3::new(0.0, -5.0, 0.0), Vec3::new(8.0, 0.5, 1.0));
        let before = world.body_transform(floor).unwrap();

        let collider = compound_box_collider(&[Vec3::ZERO], 1.0, 1.0);
        world.insert(dynamic_body(Vec3::new(0.0, -3.0, 0.0)), collider);

        for _ in 0..240 {
            world.step(SIM_DT);
        }

        assert_eq!(world.body_transform(floor).unwrap(), before);
    }

    #[test]
    fn test_compound_collider_offsets() {
        let offsets = [Vec3::new(-1.0, 0.0, 0.0), Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)];
        let collider = compound_box_collider(&offsets, 1.0, PIECE_MASS);
        assert_eq!(sub_shape_offsets(&collider), offsets.to_vec());
        assert!((collider.mass() - PIECE_MASS).abs() < 1e-5);
    }

    #[test]
    fn test_remove_body() {
        let mut world = PhysicsWorld::new(Vec3::from(GRAVITY));
        let handle = world.add_static_box(Vec3::ZERO, Vec3::ONE);
        assert_eq!(world.body_count(), 1);
        assert!(world.remove(handle));
        assert!(!world.contains(handle));
        assert!(!world.remove(handle));
        assert_eq!(world.body_count(), 0);
    }
}
