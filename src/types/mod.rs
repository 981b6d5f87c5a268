pub mod fundamentals;
pub mod series;
pub mod signals;

pub use fundamentals::*;
pub use series::*;
pub use signals::*;
