//! Simulation module
//!
//! Pieces, the physics world and the session that ties them to the scene.
//! No GPU or platform code lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Physics -> visuals is a one-way copy

pub mod input;
pub mod physics;
pub mod piece;
pub mod registry;
pub mod session;
pub mod shape;
pub mod tick;

pub use input::KeyAction;
pub use physics::PhysicsWorld;
pub use piece::{Piece, PieceId, PieceState};
pub use registry::ActivePieces;
pub use session::{Session, StaticSlab};
pub use shape::ShapeKind;
pub use tick::FrameClock;
