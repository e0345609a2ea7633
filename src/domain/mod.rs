pub mod forecast;
pub mod metering;
pub mod session;

pub use forecast::*;
pub use metering::*;
pub use session::*;
