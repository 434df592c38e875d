mod lbvh;
mod sah;

pub use self::lbvh::*;
pub use self::sah::*;
