//! # Textual Persistence Format
//!
//! Line-oriented serialization of the statement set, one statement per line
//! (an N-Triples subset):
//!
//! ```text
//! <subject> <predicate> <object-iri> .
//! <subject> <predicate> "literal" .
//! <subject> <predicate> "literal"@en .
//! <subject> <predicate> "literal"^^<datatype> .
//! ```
//!
//! Blank lines and `#` comment lines are ignored on load. Literal values
//! escape `\"`, `\\`, `\n`, `\r` and `\t`. IRIs percent-escape `%`, angle
//! brackets, quotes, whitespace, and control characters, so entity IRIs
//! built from free-text names (institutions, usernames, topics) always
//! survive a serialize/parse round trip.
//!
//! Saving is a whole-file rewrite, never an incremental append. The file is
//! written to a sibling temporary path and renamed into place, so a crash
//! mid-write leaves the previous file intact. Concurrent processes mutating
//! the same backing file are not coordinated and can lose updates; the format
//! assumes a single writer.

use crate::store::TripleStore;
use crate::types::{Iri, Literal, ScholiaError, Statement, Term};
use std::fmt::Write as _;
use std::path::Path;

// =============================================================================
// SAVE
// =============================================================================

/// Serialize the full statement set and overwrite the file at `path`.
pub fn save(store: &TripleStore, path: &Path) -> Result<(), ScholiaError> {
    let text = to_text(store);

    let file_name = path
        .file_name()
        .ok_or_else(|| ScholiaError::Io(format!("not a file path: {}", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, text)
        .map_err(|e| ScholiaError::Io(format!("write {}: {}", tmp_path.display(), e)))?;
    std::fs::rename(&tmp_path, path)
        .map_err(|e| ScholiaError::Io(format!("rename to {}: {}", path.display(), e)))?;
    Ok(())
}

/// Serialize a store to its textual form.
#[must_use]
pub fn to_text(store: &TripleStore) -> String {
    let mut out = String::new();
    for statement in store.statements() {
        let _ = write!(
            out,
            "<{}> <{}> ",
            escape_iri(statement.subject.as_str()),
            escape_iri(statement.predicate.as_str())
        );
        match &statement.object {
            Term::Iri(iri) => {
                let _ = write!(out, "<{}>", escape_iri(iri.as_str()));
            }
            Term::Literal(lit) => {
                let _ = write!(out, "\"{}\"", escape(&lit.value));
                if let Some(lang) = &lit.lang {
                    let _ = write!(out, "@{lang}");
                } else if let Some(datatype) = &lit.datatype {
                    let _ = write!(out, "^^<{}>", escape_iri(datatype.as_str()));
                }
            }
        }
        out.push_str(" .\n");
    }
    out
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Percent-escape the characters an IRI cannot carry on the wire.
///
/// `>` would terminate the IRI early, a raw newline would break the
/// one-statement-per-line framing, and `%` must be escaped so decoding is
/// unambiguous. The remaining set is the RFC 3987 excluded characters.
fn escape_iri(iri: &str) -> String {
    let mut out = String::with_capacity(iri.len());
    for c in iri.chars() {
        if matches!(c, '%' | '<' | '>' | '"' | '\\' | '|' | '^' | '`' | '{' | '}')
            || c.is_whitespace()
            || c.is_control()
        {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                let _ = write!(out, "%{byte:02X}");
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Decode percent escapes written by [`escape_iri`].
fn unescape_iri(text: &str) -> Result<String, String> {
    if !text.contains('%') {
        return Ok(text.to_string());
    }
    let raw = text.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%' {
            let hex = raw
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .ok_or_else(|| "truncated IRI escape".to_string())?;
            let byte = u8::from_str_radix(hex, 16)
                .map_err(|_| format!("invalid IRI escape '%{hex}'"))?;
            bytes.push(byte);
            i += 3;
        } else {
            bytes.push(raw[i]);
            i += 1;
        }
    }
    String::from_utf8(bytes).map_err(|_| "IRI escape is not valid UTF-8".to_string())
}

// =============================================================================
// LOAD
// =============================================================================

/// Parse the file at `path` into a store.
///
/// An absent file yields an empty store; malformed input yields
/// [`ScholiaError::Parse`] with the offending line number.
pub fn load(path: &Path) -> Result<TripleStore, ScholiaError> {
    if !path.exists() {
        return Ok(TripleStore::new());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| ScholiaError::Io(format!("read {}: {}", path.display(), e)))?;
    parse(&text)
}

/// Parse serialized text into a store.
pub fn parse(text: &str) -> Result<TripleStore, ScholiaError> {
    let mut store = TripleStore::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        store.add(parse_line(trimmed, line)?);
    }
    Ok(store)
}

fn parse_line(text: &str, line: usize) -> Result<Statement, ScholiaError> {
    let mut cursor = Cursor { text, line };
    let subject = cursor.expect_iri()?;
    cursor.skip_ws();
    let predicate = cursor.expect_iri()?;
    cursor.skip_ws();
    let object = cursor.expect_term()?;
    cursor.skip_ws();
    cursor.expect_terminator()?;
    Ok(Statement::new(subject, predicate, object))
}

/// Single-line parse state.
struct Cursor<'a> {
    text: &'a str,
    line: usize,
}

impl Cursor<'_> {
    fn err(&self, message: impl Into<String>) -> ScholiaError {
        ScholiaError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    fn skip_ws(&mut self) {
        self.text = self.text.trim_start();
    }

    fn expect_iri(&mut self) -> Result<Iri, ScholiaError> {
        let rest = self
            .text
            .strip_prefix('<')
            .ok_or_else(|| self.err("expected '<'"))?;
        let end = rest
            .find('>')
            .ok_or_else(|| self.err("unterminated IRI"))?;
        let iri = unescape_iri(&rest[..end]).map_err(|message| self.err(message))?;
        self.text = &rest[end + 1..];
        Ok(Iri::new(iri))
    }

    fn expect_term(&mut self) -> Result<Term, ScholiaError> {
        if self.text.starts_with('<') {
            return Ok(self.expect_iri()?.into());
        }
        if self.text.starts_with('"') {
            return Ok(self.expect_literal()?.into());
        }
        Err(self.err("expected IRI or literal object"))
    }

    fn expect_literal(&mut self) -> Result<Literal, ScholiaError> {
        let rest = self
            .text
            .strip_prefix('"')
            .ok_or_else(|| self.err("expected '\"'"))?;

        let mut value = String::new();
        let mut chars = rest.char_indices();
        let close = loop {
            let Some((pos, c)) = chars.next() else {
                return Err(self.err("unterminated literal"));
            };
            match c {
                '"' => break pos,
                '\\' => {
                    let Some((_, escaped)) = chars.next() else {
                        return Err(self.err("dangling escape"));
                    };
                    match escaped {
                        '\\' => value.push('\\'),
                        '"' => value.push('"'),
                        'n' => value.push('\n'),
                        'r' => value.push('\r'),
                        't' => value.push('\t'),
                        other => return Err(self.err(format!("unknown escape '\\{other}'"))),
                    }
                }
                other => value.push(other),
            }
        };
        self.text = &rest[close + 1..];

        // Optional language or datatype tag
        if let Some(rest) = self.text.strip_prefix('@') {
            let end = rest
                .find(|c: char| c.is_whitespace())
                .unwrap_or(rest.len());
            if end == 0 {
                return Err(self.err("empty language tag"));
            }
            let lang = &rest[..end];
            self.text = &rest[end..];
            return Ok(Literal::lang_tagged(value, lang));
        }
        if let Some(rest) = self.text.strip_prefix("^^") {
            self.text = rest;
            let datatype = self.expect_iri()?;
            return Ok(Literal::typed(value, datatype));
        }
        Ok(Literal::plain(value))
    }

    fn expect_terminator(&mut self) -> Result<(), ScholiaError> {
        let rest = self
            .text
            .strip_prefix('.')
            .ok_or_else(|| self.err("expected '.' terminator"))?;
        if !rest.trim().is_empty() {
            return Err(self.err("trailing content after '.'"));
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab;

    fn sample_store() -> TripleStore {
        let mut store = TripleStore::new();
        store.add(Statement::new(
            vocab::paper_iri(1),
            vocab::rdf_type(),
            vocab::paper_class(),
        ));
        store.add(Statement::new(
            vocab::paper_iri(1),
            vocab::has_title(),
            Literal::lang_tagged("Basic \"ML\"\nIntro", "en"),
        ));
        store.add(Statement::new(
            vocab::paper_iri(1),
            vocab::publication_date(),
            Literal::typed("2022-03-21", vocab::xsd_date()),
        ));
        store
    }

    #[test]
    fn text_roundtrip_preserves_statements() {
        let store = sample_store();
        let text = to_text(&store);
        let restored = parse(&text).expect("parse");

        assert_eq!(restored.len(), store.len());
        let original: Vec<_> = store.statements().collect();
        let reloaded: Vec<_> = restored.statements().collect();
        assert_eq!(original, reloaded);
    }

    #[test]
    fn blank_lines_and_comments_ignored() {
        let text = "\n# graph header\n<http://example.org/a> <http://example.org/p> <http://example.org/x> .\n\n";
        let store = parse(text).expect("parse");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let text = "<http://example.org/a> <http://example.org/p> <http://example.org/x> .\ngarbage\n";
        let err = parse(text).expect_err("must fail");
        match err {
            ScholiaError::Parse { line, .. } => assert_eq!(line, 2),
            other => unreachable!("unexpected error: {other}"),
        }
    }

    #[test]
    fn iri_with_reserved_characters_roundtrips() {
        // Entity IRIs embed free-text names; '>' and whitespace must not
        // break the framing
        let mut store = TripleStore::new();
        store.add(Statement::new(
            vocab::person_iri("bschack"),
            vocab::affiliated_with(),
            vocab::institution_iri("Lehigh > CS Dept"),
        ));
        store.add(Statement::new(
            vocab::institution_iri("Line\nBreak & 100% Weird"),
            vocab::rdf_type(),
            vocab::institution_class(),
        ));

        let text = to_text(&store);
        for line in text.lines() {
            assert!(line.ends_with(" ."));
        }

        let restored = parse(&text).expect("parse");
        let original: Vec<_> = store.statements().collect();
        let reloaded: Vec<_> = restored.statements().collect();
        assert_eq!(original, reloaded);
    }

    #[test]
    fn truncated_iri_escape_rejected() {
        let text = "<http://example.org/a> <http://example.org/p> <http://example.org/x%2> .";
        let err = parse(text).expect_err("must fail");
        assert!(matches!(err, ScholiaError::Parse { line: 1, .. }));
    }

    #[test]
    fn unterminated_literal_rejected() {
        let text = "<http://example.org/a> <http://example.org/p> \"oops .";
        assert!(parse(text).is_err());
    }

    #[test]
    fn trailing_content_rejected() {
        let text = "<http://example.org/a> <http://example.org/p> <http://example.org/x> . extra";
        assert!(parse(text).is_err());
    }

    #[test]
    fn missing_file_loads_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = load(&dir.path().join("absent.ttl")).expect("load");
        assert!(store.is_empty());
    }

    #[test]
    fn save_then_load_roundtrips_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("graph.ttl");

        let store = sample_store();
        save(&store, &path).expect("save");
        let restored = load(&path).expect("load");

        assert_eq!(restored.len(), store.len());
        // Temp file must not linger after the rename
        assert!(!dir.path().join("graph.ttl.tmp").exists());
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("graph.ttl");

        save(&sample_store(), &path).expect("first save");
        let small = TripleStore::new();
        save(&small, &path).expect("second save");

        let restored = load(&path).expect("load");
        assert!(restored.is_empty());
    }
}
