//! Simulation module
//!
//! All gameplay logic below the session lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body id)
//! - No rendering or platform dependencies beyond the `Presenter` trait

pub mod collision;
pub mod contact;
pub mod difficulty;
pub mod enemy;
pub mod physics;
pub mod registry;
pub mod runner;
pub mod score;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, box_box_collision};
pub use contact::{CollisionObserver, GameplayEvent, SessionSummary, classify, dispatch_contact};
pub use difficulty::{DifficultyController, DifficultyTable, DifficultyTier};
pub use enemy::{EnemyKind, EnemySpawner};
pub use physics::{Body, BodyDef, BodyId, BodyType, Contact, ContactEvent, PhysicsWorld, Role};
pub use registry::{Entity, EntityKind, EntityRegistry};
pub use runner::{Runner, RunnerCounts};
pub use score::Score;
pub use state::{GameState, MenuCommand, Transition};
pub use tick::{FixedStepDriver, StepThreshold, body_in_bounds, scan_bounds};
