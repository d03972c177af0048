use lv2b_core::emit::LiteralStyle;

/// Most `#` symbols rustc accepts around a raw string.
pub const MAX_HASHES: usize = 255;

/// Rust literal syntax: raw strings joined with `concat!`.
pub struct RustLiterals;

impl LiteralStyle for RustLiterals {
    fn name_literal(&self, name: &str) -> String {
        format!("{name:?}")
    }

    fn chunk_literal(&self, chunk: &str) -> String {
        raw_literal(chunk)
    }

    fn join_chunks(&self, literals: Vec<String>) -> String {
        if literals.len() == 1 {
            return literals.into_iter().collect();
        }
        format!("concat!({})", literals.join(", "))
    }
}

/// Render `chunk` as a raw string literal whose delimiter cannot occur in it.
///
/// Raw literals cannot hold a bare carriage return and take at most
/// [`MAX_HASHES`] delimiter hashes, so chunks breaking either rule fall back
/// to an escaped ordinary literal.
pub fn raw_literal(chunk: &str) -> String {
    let required = required_hashes(chunk);
    if chunk.contains('\r') || required > MAX_HASHES {
        return format!("{chunk:?}");
    }
    let hashes = "#".repeat(required);
    format!("r{hashes}\"{chunk}\"{hashes}")
}

/// One more hash than the longest run of `#` following a quote, at least one.
fn required_hashes(chunk: &str) -> usize {
    let bytes = chunk.as_bytes();
    let longest = chunk
        .match_indices('"')
        .map(|(index, _)| {
            bytes[index + 1..]
                .iter()
                .take_while(|&&b| b == b'#')
                .count()
        })
        .max()
        .unwrap_or(0);
    longest + 1
}
