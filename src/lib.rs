//! Tetris Tower - stack falling tetrominoes into a physics-driven tower
//!
//! Core modules:
//! - `sim`: Session state, spawner, input handling and the per-frame sync loop
//! - `scene`: Render-side scene graph, camera and light (plain data)
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Persisted gameplay configuration

pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;

pub use settings::{Settings, StepMode};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one step per displayed frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame in accumulated mode
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest elapsed time fed to the accumulator in one frame
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// World gravity (m/s², negative Y is down)
    pub const GRAVITY: [f32; 3] = [0.0, -9.82, 0.0];

    /// Edge length of one cube
    pub const BLOCK_SIZE: f32 = 1.0;
    /// Mass of a whole piece, independent of how many cubes it has
    pub const PIECE_MASS: f32 = 1.0;
    /// Height at which new pieces appear
    pub const SPAWN_HEIGHT: f32 = 4.0;
    /// Horizontal centre of the spawn point
    pub const SPAWN_X: f32 = 0.0;

    /// Floor slabs: count, size and placement
    pub const FLOOR_SEGMENTS: usize = 4;
    pub const FLOOR_SEGMENT_SIZE: [f32; 3] = [2.0, 0.5, 1.0];
    pub const FLOOR_Y: f32 = -5.0;
    pub const FLOOR_START_X: f32 = -3.0;
    pub const FLOOR_COLOR: [f32; 4] = [0.533, 0.533, 0.533, 1.0]; // 0x888888

    /// Side walls bounding the arena
    pub const WALL_X: f32 = 4.25;
    pub const WALL_SIZE: [f32; 3] = [0.5, 10.0, 1.0];
    pub const WALL_COLOR: [f32; 4] = [0.3, 0.3, 0.35, 1.0];

    /// Orthographic camera: half-height of the view volume and clip planes
    pub const CAMERA_HALF_HEIGHT: f32 = 5.0;
    pub const CAMERA_NEAR: f32 = 1.0;
    pub const CAMERA_FAR: f32 = 100.0;
    pub const CAMERA_EYE: [f32; 3] = [0.0, 0.0, 20.0];

    /// Directional light position (shines toward the origin)
    pub const LIGHT_POSITION: [f32; 3] = [5.0, 10.0, 5.0];

    /// Default cap on committed pieces kept in the world
    pub const DEFAULT_MAX_ACTIVE_PIECES: usize = 256;
}
