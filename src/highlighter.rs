// ABOUTME: REPL line-editing helper: history hinting and keyword highlighting

use std::borrow::Cow;

use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::HistoryHinter;
use rustyline::validate::MatchingBracketValidator;
use rustyline_derive::{Completer, Helper, Hinter, Validator};

const KEYWORDS: &[&str] = &[
    "let", "const", "fn", "class", "if", "elif", "else", "for", "in", "while", "try", "catch",
    "finally", "throw", "return", "break", "continue", "new", "self", "and", "or", "not", "nil",
    "true", "false", "include",
];

#[derive(Helper, Completer, Hinter, Validator)]
pub struct VeurekaHelper {
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
    #[rustyline(Validator)]
    validator: MatchingBracketValidator,
}

impl VeurekaHelper {
    pub fn new() -> Self {
        VeurekaHelper {
            hinter: HistoryHinter::new(),
            validator: MatchingBracketValidator::new(),
        }
    }
}

impl Default for VeurekaHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for VeurekaHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let mut out = String::with_capacity(line.len());
        for word in split_keep_whitespace(line) {
            if KEYWORDS.contains(&word) {
                out.push_str("\x1b[36m");
                out.push_str(word);
                out.push_str("\x1b[0m");
            } else if word.starts_with('"') {
                out.push_str("\x1b[33m");
                out.push_str(word);
                out.push_str("\x1b[0m");
            } else {
                out.push_str(word);
            }
        }
        Cow::Owned(out)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[90m{}\x1b[0m", hint))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: CmdKind) -> bool {
        true
    }
}

/// Splits on word boundaries while keeping the separators in the output, so
/// the reassembled string round-trips to the original line exactly.
fn split_keep_whitespace(line: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let bytes = line.as_bytes();
    let is_word = |c: u8| c.is_ascii_alphanumeric() || c == b'_';
    let mut i = 0;
    while i < bytes.len() {
        if is_word(bytes[i]) {
            let word_start = i;
            while i < bytes.len() && is_word(bytes[i]) {
                i += 1;
            }
            if word_start > start {
                out.push(&line[start..word_start]);
            }
            out.push(&line[word_start..i]);
            start = i;
        } else {
            i += 1;
        }
    }
    if start < bytes.len() {
        out.push(&line[start..]);
    }
    out
}
