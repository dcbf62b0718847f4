// Line patterns shared by the dependency extractor and the reassembler
use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// `CREATE TABLE [IF NOT EXISTS] [schema.]name`, keywords case-insensitive,
/// identifiers optionally wrapped in backticks or double quotes
static CREATE_TABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:[`"]?\w+[`"]?\.)?[`"]?(\w+)[`"]?"#)
        .expect("CREATE TABLE pattern is valid")
});

static REFERENCES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)REFERENCES\s+(?:[`"]?\w+[`"]?\.)?[`"]?(\w+)[`"]?"#)
        .expect("REFERENCES pattern is valid")
});

static FOREIGN_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)FOREIGN\s+KEY").expect("FOREIGN KEY pattern is valid"));

// `\w` only matches valid UTF-8, so a captured name always decodes cleanly
fn capture_name(re: &Regex, line: &[u8]) -> Option<String> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
}

/// Table name declared by a CREATE TABLE on this line, quotes stripped
pub fn match_create_table(line: impl AsRef<[u8]>) -> Option<String> {
    capture_name(&CREATE_TABLE, line.as_ref())
}

/// Parent table named by a `FOREIGN KEY ... REFERENCES <name>` clause.
///
/// Both parts must sit on the same line; a bare column-level `REFERENCES`
/// without `FOREIGN KEY` is not a match.
pub fn match_foreign_key_reference(line: impl AsRef<[u8]>) -> Option<String> {
    let line = line.as_ref();
    if !FOREIGN_KEY.is_match(line) {
        return None;
    }
    capture_name(&REFERENCES, line)
}
