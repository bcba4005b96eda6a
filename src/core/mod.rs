// Core modules shared by the library surfaces and the CLI.
pub mod error;
