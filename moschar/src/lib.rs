pub mod bins;
pub mod compare;
pub mod convert;
pub mod error;
pub mod refdata;
pub mod rewrite;
pub mod sim;
pub mod units;

pub(crate) mod log;
