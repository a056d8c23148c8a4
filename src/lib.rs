pub mod app;
pub mod camera;
pub mod camera3d;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod inertia;
pub mod input;
pub mod modifiers;
pub mod parameter;
pub mod plot;
pub mod scheduler;
pub mod time;
pub mod undo;

pub use app::{run, run_with_overrides, App};
pub use controller::{ControllerSettings, ViewportController};
pub use error::{NavigatorError, NavigatorResult};
pub use plot::{NavigationModel, Plot, PlotDocument};
