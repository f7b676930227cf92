//! WebGPU rendering module
//!
//! Scenes are triangulated and lit on the CPU (`mesh`), then drawn by a
//! minimal pass-through pipeline.

pub mod mesh;
pub mod pipeline;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;

use crate::scene::{Camera, DirectionalLight, Scene};

/// Something that can draw a whole scene once per frame
pub trait RenderSurface {
    type Error;

    fn draw(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        light: &DirectionalLight,
    ) -> Result<(), Self::Error>;
}
