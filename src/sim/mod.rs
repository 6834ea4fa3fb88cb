//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod input;
pub mod physics;
pub mod scene;
pub mod spawner;
pub mod star;
pub mod state;

pub use clock::{ClockEvent, Countdown, GameClock};
pub use collision::{WorldShape, shapes_overlap};
pub use input::{AccelSample, TiltInput};
pub use physics::{BodyDesc, BodyId, Contact, EdgeLoop, EntityKind, PhysicsWorld, Shape};
pub use scene::{OutcomeReporter, Scene};
pub use spawner::{Direction, ObstacleSpawner, Segment, StripPair};
pub use star::{Polygon, star_polygon};
pub use state::{GamePhase, Outcome, Session, StartButton};
