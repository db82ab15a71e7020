pub mod builder;
pub mod error;
pub mod store;

pub use builder::{build_report, render_summary};
pub use error::{ReportError, Result};
pub use store::ReportStore;
