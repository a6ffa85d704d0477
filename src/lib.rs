pub mod batch;
pub mod config;
pub mod document;
pub mod error;
pub mod importer;
pub mod input;
pub mod progress;
pub mod scanner;
pub mod sink;
