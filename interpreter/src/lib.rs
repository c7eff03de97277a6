mod capture;
pub mod error;
pub mod executor;
pub mod memo;
pub mod runner;

pub use error::RunnerError;
pub use executor::{Executor, chomp, wrap_code};
pub use memo::Memo;
pub use runner::{Interpreter, executable_file_name};
