pub mod environment;
pub mod prelude;
pub mod util;
