pub mod generator;
pub mod literal;

pub use generator::CppEmitter;
pub use literal::CppLiterals;
