pub mod generator;
pub mod literal;

pub use generator::RustEmitter;
pub use literal::RustLiterals;
