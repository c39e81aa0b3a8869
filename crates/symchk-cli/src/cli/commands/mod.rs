//! CLI command handlers, one per subcommand.

mod from_dir;
mod from_metadata;
mod from_pe;

pub use from_dir::run_from_dir;
pub use from_metadata::run_from_metadata;
pub use from_pe::run_from_pe;
