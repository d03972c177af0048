use log::debug;
use lv2b_core::emit::render_bundles;
use lv2b_core::{Bundle, BundleEmitter, EmitError, EmitOptions, TargetId};

use crate::literal::CppLiterals;

const DEFAULT_HEADER: &str = "\
/*
    Embedded LV2 bundle resources.

    Each bundle mirrors one directory of Turtle files, so a host can write them
    to a temporary location instead of relying on an installed LV2 tree.
*/";

/// Emits a C++ header defining `juce::lv2::Bundle::getAllBundles()`.
pub struct CppEmitter;

impl BundleEmitter for CppEmitter {
    fn id(&self) -> TargetId {
        TargetId::Cpp
    }

    fn emit(&self, bundles: &[Bundle], options: &EmitOptions) -> Result<String, EmitError> {
        debug!("rendering {} bundles as C++", bundles.len());
        render_bundles(
            "bundles.h.j2",
            include_str!("../templates/bundles.h.j2"),
            DEFAULT_HEADER,
            bundles,
            options,
            &CppLiterals,
        )
    }
}
