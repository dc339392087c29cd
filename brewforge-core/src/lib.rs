pub mod codec;
pub mod error;
pub mod export;
pub mod extraction;
pub mod ratio;
pub mod registry;
pub mod slider;
pub mod steps;
pub mod store;
pub mod timeline;
pub mod timer;
pub mod units;

pub use error::BrewError;
pub use registry::Registry;
pub use timeline::{Timeline, TimelinePoint};
