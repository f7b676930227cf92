//! Scene triangulation
//!
//! Every cube becomes up to six flat-shaded quads. Back faces are culled and
//! triangles are ordered far-to-near, so the pipeline needs no depth buffer.

use glam::{Mat4, Vec3};
use std::cmp::Ordering;

use super::vertex::Vertex;
use crate::scene::{Camera, DirectionalLight, Scene};

/// Light level of faces turned away from the light
const AMBIENT: f32 = 0.15;

/// Unit cube faces: outward normal and four corners
const FACES: [(Vec3, [Vec3; 4]); 6] = [
    (
        Vec3::X,
        [
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
        ],
    ),
    (
        Vec3::NEG_X,
        [
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(-0.5, -0.5, -0.5),
        ],
    ),
    (
        Vec3::Y,
        [
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(-0.5, 0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(0.5, 0.5, -0.5),
        ],
    ),
    (
        Vec3::NEG_Y,
        [
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, 0.5),
        ],
    ),
    (
        Vec3::Z,
        [
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
        ],
    ),
    (
        Vec3::NEG_Z,
        [
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
        ],
    ),
];

struct Triangle {
    depth: f32,
    vertices: [Vertex; 3],
}

/// Lambert term with an ambient floor
fn shade(color: [f32; 4], normal: Vec3, light: &DirectionalLight) -> [f32; 4] {
    let diffuse = (normal.dot(light.to_light()) * light.intensity).max(0.0);
    let k = (AMBIENT + (1.0 - AMBIENT) * diffuse).min(1.0);
    [color[0] * k, color[1] * k, color[2] * k, color[3]]
}

/// Generate NDC triangles for the whole scene, far-to-near
pub fn scene_vertices(scene: &Scene, camera: &Camera, light: &DirectionalLight) -> Vec<Vertex> {
    let view_proj = camera.view_proj();
    let forward = camera.forward();
    let mut triangles = Vec::new();

    for object in scene.objects() {
        let group = object.transform.matrix();
        for cube in &object.cubes {
            let model = group * Mat4::from_translation(cube.offset) * Mat4::from_scale(cube.size);

            for (normal, corners) in &FACES {
                let world_normal = object.transform.rotation * *normal;
                if world_normal.dot(forward) >= 0.0 {
                    continue;
                }

                let color = shade(cube.color, world_normal, light);
                let projected =
                    corners.map(|c| view_proj.project_point3(model.transform_point3(c)));
                let vertex = |i: usize| {
                    let p = projected[i];
                    Vertex::new(p.x, p.y, p.z, color)
                };

                for [a, b, c] in [[0, 1, 2], [0, 2, 3]] {
                    triangles.push(Triangle {
                        depth: (projected[a].z + projected[b].z + projected[c].z) / 3.0,
                        vertices: [vertex(a), vertex(b), vertex(c)],
                    });
                }
            }
        }
    }

    triangles.sort_by(|a, b| b.depth.partial_cmp(&a.depth).unwrap_or(Ordering::Equal));
    triangles.into_iter().flat_map(|t| t.vertices).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Cube, Transform};
    use glam::Quat;

    fn cube(color: [f32; 4]) -> Vec<Cube> {
        vec![Cube {
            offset: Vec3::ZERO,
            size: Vec3::ONE,
            color,
        }]
    }

    #[test]
    fn test_front_facing_cube_shows_one_face() {
        let mut scene = Scene::new();
        scene.add(Transform::IDENTITY, cube([1.0; 4]));

        let vertices = scene_vertices(&scene, &Camera::new(1.0), &DirectionalLight::default());
        assert_eq!(vertices.len(), 6);
        for v in &vertices {
            assert!(v.position[2] > 0.0 && v.position[2] < 1.0);
            assert!(v.position[0].abs() <= 0.1 + 1e-5);
        }
    }

    #[test]
    fn test_rotated_cube_shows_two_faces() {
        let mut scene = Scene::new();
        let transform = Transform {
            position: Vec3::ZERO,
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_4),
        };
        scene.add(transform, cube([1.0; 4]));

        let vertices = scene_vertices(&scene, &Camera::new(1.0), &DirectionalLight::default());
        assert_eq!(vertices.len(), 12);
    }

    #[test]
    fn test_far_objects_drawn_first() {
        let near = [1.0, 0.0, 0.0, 1.0];
        let far = [0.0, 0.0, 1.0, 1.0];
        let mut scene = Scene::new();
        scene.add(Transform::from_position(Vec3::new(0.0, 0.0, 2.0)), cube(near));
        scene.add(Transform::from_position(Vec3::new(0.0, 0.0, -2.0)), cube(far));

        let vertices = scene_vertices(&scene, &Camera::new(1.0), &DirectionalLight::default());
        assert_eq!(vertices.len(), 12);
        assert!(vertices[0].color[2] > 0.0);
        assert_eq!(vertices[0].color[0], 0.0);
        assert_eq!(vertices[11].color[2], 0.0);
    }

    #[test]
    fn test_faces_toward_light_are_brighter() {
        let light = DirectionalLight::default();
        let lit = shade([1.0; 4], Vec3::Y, &light);
        let dark = shade([1.0; 4], Vec3::NEG_Y, &light);
        assert!(lit[0] > dark[0]);
        assert_eq!(dark[0], AMBIENT);
        assert_eq!(lit[3], 1.0);
    }
}
