pub mod catalog;
pub mod feature;
pub mod upload;

pub use catalog::*;
pub use feature::*;
pub use upload::*;
