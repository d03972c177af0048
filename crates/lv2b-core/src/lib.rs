pub mod config;
pub mod embed;
pub mod emit;
pub mod error;
pub mod model;
pub mod scan;

pub use config::TargetId;
pub use emit::EmitOptions;
pub use error::{ConfigError, EmitError, ScanError};
pub use model::{Bundle, Resource};

/// Trait for output targets that render discovered bundles into a single source file.
pub trait BundleEmitter {
    fn id(&self) -> TargetId;

    fn emit(&self, bundles: &[Bundle], options: &EmitOptions) -> Result<String, EmitError>;
}
