//! CLI command implementations.

pub mod convert;
pub mod run;

pub use convert::ConvertCommand;
pub use run::RunCommand;
