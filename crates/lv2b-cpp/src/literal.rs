use std::borrow::Cow;

use lv2b_core::emit::LiteralStyle;

/// Default raw string delimiter.
pub const DELIMITER: &str = "lv2ttl";

/// C++ literal syntax: adjacent raw strings, which the compiler concatenates.
pub struct CppLiterals;

impl LiteralStyle for CppLiterals {
    fn name_literal(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 2);
        out.push('"');
        for c in name.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c => out.push(c),
            }
        }
        out.push('"');
        out
    }

    fn chunk_literal(&self, chunk: &str) -> String {
        raw_literal(chunk)
    }

    fn join_chunks(&self, literals: Vec<String>) -> String {
        literals.join(" ")
    }
}

/// Render `chunk` as `R"lv2ttl(...)lv2ttl"`.
///
/// When the chunk contains the closing sequence, a numbered delimiter
/// (`lv2ttl1`, `lv2ttl2`, ...) is used instead.
pub fn raw_literal(chunk: &str) -> String {
    let delimiter = delimiter_for(chunk);
    format!("R\"{delimiter}({chunk}){delimiter}\"")
}

fn delimiter_for(chunk: &str) -> Cow<'static, str> {
    let closes = |delimiter: &str| chunk.contains(&format!("){delimiter}\""));
    if !closes(DELIMITER) {
        return Cow::Borrowed(DELIMITER);
    }
    let mut n = 1usize;
    loop {
        let candidate = format!("{DELIMITER}{n}");
        if !closes(&candidate) {
            return Cow::Owned(candidate);
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delimiter() {
        insta::assert_snapshot!(raw_literal("abc"), @r#"R"lv2ttl(abc)lv2ttl""#);
        assert_eq!(raw_literal(""), "R\"lv2ttl()lv2ttl\"");
    }

    #[test]
    fn test_lookalike_keeps_default_delimiter() {
        assert_eq!(
            raw_literal(")lv2ttl )\"lv2ttl\""),
            "R\"lv2ttl()lv2ttl )\"lv2ttl\")lv2ttl\""
        );
    }

    #[test]
    fn test_colliding_delimiter_is_numbered() {
        assert_eq!(
            raw_literal("x)lv2ttl\"y"),
            "R\"lv2ttl1(x)lv2ttl\"y)lv2ttl1\""
        );
        assert_eq!(
            raw_literal(")lv2ttl\" )lv2ttl1\""),
            "R\"lv2ttl2()lv2ttl\" )lv2ttl1\")lv2ttl2\""
        );
    }

    #[test]
    fn test_name_literal_escapes() {
        assert_eq!(CppLiterals.name_literal("manifest.ttl"), "\"manifest.ttl\"");
        assert_eq!(CppLiterals.name_literal("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }

    #[test]
    fn test_join_with_single_space() {
        let joined = CppLiterals.join_chunks(vec![raw_literal("ab"), raw_literal("c")]);
        assert_eq!(joined, "R\"lv2ttl(ab)lv2ttl\" R\"lv2ttl(c)lv2ttl\"");
    }
}
