mod check;
mod summary;

pub use check::run_check;
pub use summary::run_summary;
