pub mod clock;
pub mod naming;

pub use clock::{Clock, FixedClock, SystemClock};
pub use naming::{output_names, OutputNames, STAMP_FORMAT};
