//! Build-pipeline file logger: forwards file records untouched and prints an
//! aligned summary of everything that passed once the stream ends.

pub mod app;
