pub mod error;
pub mod geom;
pub mod sim;

// Prelude
pub use error::FieldError;
pub use geom::line::Line;
pub use geom::plane::Plane;
pub use geom::point::Point;
pub use geom::vector::Vector;
pub use geom::{distance, intersect, midpoint};
pub use sim::collector::{Collector, CollectorFace};
pub use sim::config::{CollectorMaterial, LayoutParams, SimulationConfig};
pub use sim::layout::{LayoutMode, LayoutStrategy};
pub use sim::panel::Panel;
pub use sim::power::{EstimateStatus, HeatingStatus, PowerEstimate};
pub use sim::ray::{Ray, RayState};
pub use sim::simulation::{FieldSimulation, RunSummary};
pub use sim::sun::Sun;
