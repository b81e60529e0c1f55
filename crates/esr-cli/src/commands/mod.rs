pub mod convert;
pub mod results;
