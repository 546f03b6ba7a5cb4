//! Batch input and output formats for the command-line driver.

pub mod csv;
