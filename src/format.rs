//! Layout pass over printed HCL.
//!
//! Nodes built by the rules carry no indentation of their own, and nodes moved
//! between blocks keep the indentation of their old position. This pass
//! re-indents every line by its bracket depth (two spaces per level), trims
//! trailing whitespace and leaves heredoc bodies and block comments alone.

use once_cell::sync::Lazy;
use regex::Regex;

const INDENT: &str = "  ";

static HEREDOC_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<<-?([A-Za-z_][A-Za-z0-9_-]*)\s*$").expect("valid heredoc pattern"));

/// Re-indent a printed document.
pub fn format(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut scanner = Scanner::default();
    let mut heredoc: Option<String> = None;

    for line in text.lines() {
        if let Some(marker) = &heredoc {
            out.push_str(line);
            out.push('\n');
            if line.trim() == marker {
                heredoc = None;
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            out.push('\n');
            continue;
        }

        if scanner.is_verbatim() {
            out.push_str(line.trim_end());
        } else {
            let closers = trimmed
                .chars()
                .take_while(|c| matches!(c, '}' | ']' | ')') || c.is_whitespace())
                .filter(|c| !c.is_whitespace())
                .count();
            for _ in 0..scanner.depth.saturating_sub(closers) {
                out.push_str(INDENT);
            }
            out.push_str(trimmed);
        }
        out.push('\n');

        heredoc = scanner.scan(trimmed);
    }

    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Inside a quoted string.
    Str,
    /// Inside `${ ... }` / `%{ ... }`, counting nested braces.
    Interp(usize),
}

#[derive(Debug, Default)]
struct Scanner {
    depth: usize,
    modes: Vec<Mode>,
    block_comment: bool,
}

impl Scanner {
    /// Lines that continue a block comment or a string are printed as they are.
    fn is_verbatim(&self) -> bool {
        self.block_comment || !self.modes.is_empty()
    }

    /// Track bracket depth across one line. Returns the closing marker when
    /// the line opens a heredoc.
    fn scan(&mut self, line: &str) -> Option<String> {
        let chars: Vec<(usize, char)> = line.char_indices().collect();
        let mut i = 0;

        while i < chars.len() {
            let (offset, c) = chars[i];
            let next = chars.get(i + 1).map(|&(_, c)| c);

            if self.block_comment {
                if c == '*' && next == Some('/') {
                    self.block_comment = false;
                    i += 1;
                }
                i += 1;
                continue;
            }

            match self.modes.last().copied() {
                Some(Mode::Str) => match c {
                    '\\' => i += 1,
                    '"' => {
                        self.modes.pop();
                    }
                    // `$${` and `%%{` are literal text.
                    '$' | '%' if next == Some(c) => i += 1,
                    '$' | '%' if next == Some('{') => {
                        self.modes.push(Mode::Interp(0));
                        i += 1;
                    }
                    _ => {}
                },
                Some(Mode::Interp(open)) => match c {
                    '"' => self.modes.push(Mode::Str),
                    '{' => self.set_interp(open + 1),
                    '}' if open == 0 => {
                        self.modes.pop();
                    }
                    '}' => self.set_interp(open - 1),
                    _ => {}
                },
                None => match c {
                    '#' => return None,
                    '/' if next == Some('/') => return None,
                    '/' if next == Some('*') => {
                        self.block_comment = true;
                        i += 1;
                    }
                    '"' => self.modes.push(Mode::Str),
                    '{' | '[' | '(' => self.depth += 1,
                    '}' | ']' | ')' => self.depth = self.depth.saturating_sub(1),
                    '<' if next == Some('<') => {
                        if let Some(captures) = HEREDOC_START.captures(&line[offset..]) {
                            return Some(captures[1].to_string());
                        }
                        i += 1;
                    }
                    _ => {}
                },
            }
            i += 1;
        }

        None
    }

    fn set_interp(&mut self, open: usize) {
        if let Some(Mode::Interp(current)) = self.modes.last_mut() {
            *current = open;
        }
    }
}
