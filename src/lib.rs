pub mod config;
pub mod error;
pub mod etl;
pub mod forecast;
pub mod output;
pub mod record;
pub mod report;

pub use error::{Result, SalesError};
pub use record::{RawRecord, RawTable, SalesRecord, SalesTable};
