pub mod asset;
pub mod constraint;
pub mod staged;
pub mod verdict;

pub use asset::*;
pub use constraint::*;
pub use staged::*;
pub use verdict::*;
