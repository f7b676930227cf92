//! Scene graph, camera and light
//!
//! Plain data consumed by the renderer. Each `SceneObject` is a group of
//! cubes sharing one world transform; pieces and static slabs are both
//! represented this way.

use glam::{Mat4, Quat, Vec3};

use crate::consts::*;

/// Position + orientation shared by visuals and bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

/// Handle to an object registered in a `Scene`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualId(u32);

/// One coloured box inside a group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    /// Offset from the group origin
    pub offset: Vec3,
    /// Full edge lengths
    pub size: Vec3,
    pub color: [f32; 4],
}

/// A group of cubes moved as one
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: VisualId,
    pub transform: Transform,
    pub cubes: Vec<Cube>,
}

/// All visual objects currently shown
#[derive(Debug, Clone)]
pub struct Scene {
    /// Kept sorted by id (ids are allocated increasing)
    objects: Vec<SceneObject>,
    next_id: u32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a new group and return its handle
    pub fn add(&mut self, transform: Transform, cubes: Vec<Cube>) -> VisualId {
        let id = VisualId(self.next_id);
        self.next_id += 1;
        self.objects.push(SceneObject {
            id,
            transform,
            cubes,
        });
        id
    }

    /// Remove a group; returns it if it was present
    pub fn remove(&mut self, id: VisualId) -> Option<SceneObject> {
        let idx = self.index_of(id)?;
        Some(self.objects.remove(idx))
    }

    pub fn get(&self, id: VisualId) -> Option<&SceneObject> {
        self.index_of(id).map(|i| &self.objects[i])
    }

    /// Overwrite a group's transform; unknown ids are ignored
    pub fn set_transform(&mut self, id: VisualId, transform: Transform) {
        if let Some(i) = self.index_of(id) {
            self.objects[i].transform = transform;
        }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn index_of(&self, id: VisualId) -> Option<usize> {
        self.objects.binary_search_by_key(&id, |o| o.id).ok()
    }
}

/// Orthographic camera looking at the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub half_height: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::from(CAMERA_EYE),
            target: Vec3::ZERO,
            half_height: CAMERA_HALF_HEIGHT,
            aspect,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }

    /// Update the aspect ratio (width / height) after a resize
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Unit vector the camera looks along
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        let half_w = self.half_height * self.aspect;
        Mat4::orthographic_rh(
            -half_w,
            half_w,
            -self.half_height,
            self.half_height,
            self.near,
            self.far,
        )
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

/// Single directional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub target: Vec3,
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            position: Vec3::from(LIGHT_POSITION),
            target: Vec3::ZERO,
            intensity: 1.0,
        }
    }
}

impl DirectionalLight {
    /// Unit vector pointing from the surface toward the light
    pub fn to_light(&self) -> Vec3 {
        (self.position - self.target).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> Vec<Cube> {
        vec![Cube {
            offset: Vec3::ZERO,
            size: Vec3::ONE,
            color: [1.0; 4],
        }]
    }

    #[test]
    fn test_add_remove() {
        let mut scene = Scene::new();
        let a = scene.add(Transform::IDENTITY, unit_cube());
        let b = scene.add(Transform::from_position(Vec3::X), unit_cube());
        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);

        assert!(scene.remove(a).is_some());
        assert!(scene.remove(a).is_none());
        assert!(scene.get(a).is_none());
        assert_eq!(scene.get(b).unwrap().transform.position, Vec3::X);
    }

    #[test]
    fn test_set_transform() {
        let mut scene = Scene::new();
        let id = scene.add(Transform::IDENTITY, unit_cube());
        let t = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_z(0.5),
        };
        scene.set_transform(id, t);
        assert_eq!(scene.get(id).unwrap().transform, t);
    }

    #[test]
    fn test_camera_maps_view_bounds_to_ndc() {
        let camera = Camera::new(2.0);
        let vp = camera.view_proj();

        let top_right = vp.project_point3(Vec3::new(10.0, 5.0, 0.0));
        assert!((top_right.x - 1.0).abs() < 1e-4);
        assert!((top_right.y - 1.0).abs() < 1e-4);

        let origin = vp.project_point3(Vec3::ZERO);
        assert!(origin.x.abs() < 1e-4 && origin.y.abs() < 1e-4);
        assert!(origin.z > 0.0 && origin.z < 1.0);
    }

    #[test]
    fn test_camera_resize_ignores_zero() {
        let mut camera = Camera::new(1.0);
        camera.set_aspect(0, 100);
        assert_eq!(camera.aspect, 1.0);
        camera.set_aspect(300, 100);
        assert_eq!(camera.aspect, 3.0);
    }
}
