pub mod file;
pub mod process;

pub use file::FileLineSource;
pub use process::{run_clear_command, ProcessLineSource};
