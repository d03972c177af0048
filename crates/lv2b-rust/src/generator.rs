use log::debug;
use lv2b_core::emit::render_bundles;
use lv2b_core::{Bundle, BundleEmitter, EmitError, EmitOptions, TargetId};

use crate::literal::RustLiterals;

const DEFAULT_HEADER: &str = "\
// Embedded LV2 bundle resources.
//
// Each bundle mirrors one directory of Turtle files, so a host can write them
// to a temporary location instead of relying on an installed LV2 tree.";

/// Emits a Rust module exposing `Bundle::all_bundles()`.
pub struct RustEmitter;

impl BundleEmitter for RustEmitter {
    fn id(&self) -> TargetId {
        TargetId::Rust
    }

    fn emit(&self, bundles: &[Bundle], options: &EmitOptions) -> Result<String, EmitError> {
        debug!("rendering {} bundles as Rust", bundles.len());
        render_bundles(
            "bundles.rs.j2",
            include_str!("../templates/bundles.rs.j2"),
            DEFAULT_HEADER,
            bundles,
            options,
            &RustLiterals,
        )
    }
}
