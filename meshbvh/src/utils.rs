mod axis;
mod bounding_box;
mod metrics;

pub use self::axis::*;
pub use self::bounding_box::*;
pub(crate) use self::metrics::*;
