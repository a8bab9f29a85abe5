//! Configuration scanning across scopes

pub mod scanner;
pub mod sections;
pub mod walk;

pub use scanner::ConfigScanner;
