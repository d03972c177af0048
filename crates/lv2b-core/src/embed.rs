use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;

use log::debug;

use crate::error::ScanError;
use crate::model::Resource;

/// Maximum number of characters in one emitted string literal.
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = NonZeroUsize::new(8000).unwrap();

/// Read a Turtle file into a [`Resource`] named after its base name.
///
/// The contents are kept exactly as stored on disk. Files that are not valid
/// UTF-8 are rejected rather than lossily converted.
pub fn read_resource(path: &Path) -> Result<Resource, ScanError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ScanError::NonUtf8Name(path.to_path_buf()))?
        .to_string();

    let bytes = fs::read(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let contents =
        String::from_utf8(bytes).map_err(|_| ScanError::Encoding(path.to_path_buf()))?;

    debug!("embedding {} ({} bytes)", path.display(), contents.len());
    Ok(Resource { name, contents })
}

/// Split `text` into consecutive pieces of at most `size` characters.
///
/// Concatenating the pieces yields `text` again. Every piece but the last has
/// exactly `size` characters, and an empty text yields a single empty piece.
pub fn chunk_text(text: &str, size: NonZeroUsize) -> Vec<&str> {
    let size = size.get();
    let mut chunks = Vec::with_capacity(text.len() / size + 1);
    let mut rest = text;
    loop {
        let split = rest
            .char_indices()
            .nth(size)
            .map_or(rest.len(), |(index, _)| index);
        let (head, tail) = rest.split_at(split);
        chunks.push(head);
        if tail.is_empty() {
            break;
        }
        rest = tail;
    }
    chunks
}
