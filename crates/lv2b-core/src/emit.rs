use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use minijinja::{AutoEscape, Environment, context};
use serde::Deserialize;

use crate::embed::{DEFAULT_CHUNK_SIZE, chunk_text};
use crate::error::EmitError;
use crate::model::Bundle;

/// Line terminator appended once to the end of the rendered output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Newline {
    #[default]
    #[serde(rename = "crlf")]
    CrLf,
    #[serde(rename = "lf")]
    Lf,
}

impl Newline {
    pub fn as_str(self) -> &'static str {
        match self {
            Newline::CrLf => "\r\n",
            Newline::Lf => "\n",
        }
    }
}

impl fmt::Display for Newline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Newline::CrLf => "crlf",
            Newline::Lf => "lf",
        })
    }
}

impl FromStr for Newline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crlf" => Ok(Newline::CrLf),
            "lf" => Ok(Newline::Lf),
            other => Err(format!("unknown newline `{other}` (expected crlf or lf)")),
        }
    }
}

/// Options shared by every output target.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Maximum characters per string literal.
    pub chunk_size: NonZeroUsize,
    /// Custom preamble (usually a license comment) replacing the target's default.
    pub header: Option<String>,
    pub newline: Newline,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            header: None,
            newline: Newline::CrLf,
        }
    }
}

/// How a target spells string literals.
pub trait LiteralStyle {
    /// A short, escaped literal for bundle and resource names.
    fn name_literal(&self, name: &str) -> String;

    /// A literal holding one chunk of resource contents verbatim.
    fn chunk_literal(&self, chunk: &str) -> String;

    /// Combine chunk literals into one expression evaluating to the full contents.
    fn join_chunks(&self, literals: Vec<String>) -> String;
}

/// Replace every tab with four spaces.
pub fn normalize_tabs(text: &str) -> String {
    text.replace('\t', "    ")
}

/// Append the final line terminator to rendered output.
pub fn finish_output(mut rendered: String, newline: Newline) -> String {
    rendered.push_str(newline.as_str());
    rendered
}

/// Build the template context for `bundles`, with every name and content
/// already rendered as target literals.
pub fn bundles_context(
    bundles: &[Bundle],
    options: &EmitOptions,
    style: &impl LiteralStyle,
) -> Vec<minijinja::Value> {
    bundles
        .iter()
        .map(|bundle| {
            let resources: Vec<minijinja::Value> = bundle
                .resources
                .iter()
                .map(|resource| {
                    let literals = chunk_text(&resource.contents, options.chunk_size)
                        .into_iter()
                        .map(|chunk| style.chunk_literal(chunk))
                        .collect();
                    context! {
                        name => style.name_literal(&resource.name),
                        contents => style.join_chunks(literals),
                    }
                })
                .collect();
            context! {
                name => style.name_literal(&bundle.name),
                resources => resources,
            }
        })
        .collect()
}

/// Render a target template around `bundles`.
///
/// Tabs in the template source and in the header are normalized before
/// rendering. Embedded contents are inserted untouched. Older generators
/// expanded tabs across the whole rendered text, contents included; here tabs
/// inside a resource must survive so its chunks concatenate back to the file.
pub fn render_bundles(
    template_name: &str,
    template_source: &str,
    default_header: &str,
    bundles: &[Bundle],
    options: &EmitOptions,
    style: &impl LiteralStyle,
) -> Result<String, EmitError> {
    let source = normalize_tabs(template_source);
    let header = normalize_tabs(options.header.as_deref().unwrap_or(default_header));

    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);

    let rendered = env.render_named_str(
        template_name,
        &source,
        context! {
            header => header.trim_end(),
            bundles => bundles_context(bundles, options, style),
        },
    )?;

    Ok(finish_output(rendered, options.newline))
}
