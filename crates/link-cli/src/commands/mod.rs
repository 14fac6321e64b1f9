//! Command implementations

mod check;
mod list;
mod resync;

pub use check::run_check;
pub use list::run_list;
pub use resync::run_resync;
