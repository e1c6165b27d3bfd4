// This file is part of tidesh, a POSIX-style command shell.
// Copyright (C) 2026 The tidesh contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Turns a byte string into a stream of [`Token`]s.
//!
//! The lexer is a single forward-only cursor over the source text. Most of
//! its rules are local (quoting, escaping, operator recognition), but two
//! constructs require cooperation from whoever is executing commands:
//! `$(…)` command substitution splices a child process's stdout into the
//! word being scanned, and `<<<word` here-strings are expanded (variable,
//! tilde, brace, filename) before becoming a redirection target. Both are
//! reached through the [`LexerHost`] capability rather than a global, so the
//! lexer never has to know how commands actually run.

use crate::source::{Location, Source};
use std::collections::HashMap;
use std::rc::Rc;

/// Callback surface the executor provides to the lexer.
///
/// A fresh implementor is handed to [`Lexer::new`] for the life of one
/// top-level parse; it borrows the running [`Session`](tidesh_env) (or
/// whatever owns command execution) so `$(…)` and here-strings can run and
/// expand against live shell state.
pub trait LexerHost {
    /// Runs `command_text` (the contents between the parentheses of a
    /// `$(…)`) and returns its standard output with trailing newlines
    /// stripped.
    fn substitute_command(&mut self, command_text: &str) -> String;

    /// Applies the variable → tilde → brace → filename expansion pipeline
    /// to a single word, returning the resulting fields (usually one).
    fn expand_word(&mut self, word: &str) -> Vec<String>;
}

/// A `LexerHost` that treats `$(…)` as literally empty and performs no
/// expansion; useful for tests and for `lex`-only tooling.
#[derive(Default)]
pub struct NullHost;

impl LexerHost for NullHost {
    fn substitute_command(&mut self, _command_text: &str) -> String {
        String::new()
    }

    fn expand_word(&mut self, word: &str) -> Vec<String> {
        vec![word.to_owned()]
    }
}

/// A lexical token.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TokenKind {
    Word(String),
    IoNumber(u32),
    /// `NAME=VALUE` recognized while scanning a word.
    Assignment { name: String, value: String },
    Comment,
    Pipe,
    RedirectIn,
    RedirectOut,
    RedirectAppend,
    RedirectOutErr,
    /// `<&` or `>&` followed directly by a digit or `-` (fd duplication).
    FdDup,
    /// `<<[-]` registered with the host; `id` indexes into the lexer's
    /// pending-heredoc table so the parser can ask for the body later.
    HereDocMarker { id: u32, strip_tabs: bool },
    /// The fully-collected body of a here-document, emitted once the lexer
    /// reaches and drains the end of the physical line.
    HereDoc { id: u32, body: String },
    /// `<<<word`; `value` is the already fully expanded and space-joined
    /// operand.
    HereString(String),
    ProcessSubIn(String),
    ProcessSubOut(String),
    Background,
    And,
    Or,
    Semicolon,
    LParen,
    RParen,
    Eol,
    Eof,
}

struct PendingHeredoc {
    id: u32,
    marker: String,
    strip_tabs: bool,
}

/// Scans UTF-8 source text into [`Token`]s.
pub struct Lexer<'h> {
    bytes: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    source: Rc<Source>,
    host: &'h mut dyn LexerHost,
    pending_heredocs: Vec<PendingHeredoc>,
    next_heredoc_id: u32,
    /// Bodies collected the last time the end of a physical line was
    /// reached, keyed by the id assigned when the marker was scanned.
    ready_heredocs: HashMap<u32, String>,
    /// Set once an unterminated quote forces a degraded token at EOF.
    pub had_error: bool,
    /// Marker text of a here-document whose body ran off the end of the
    /// input without the closing marker line ever appearing. The caller
    /// (the entry loop, via [`crate::parser::ParseError::MissingHereDocBody`])
    /// uses this to ask for more input rather than treating the command as
    /// syntactically complete.
    pub unterminated_heredoc_marker: Option<String>,
}

impl<'h> Lexer<'h> {
    pub fn new(input: &str, source: Source, host: &'h mut dyn LexerHost) -> Self {
        Lexer {
            bytes: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            source: Rc::new(source),
            host,
            pending_heredocs: Vec::new(),
            next_heredoc_id: 0,
            ready_heredocs: HashMap::new(),
            had_error: false,
            unterminated_heredoc_marker: None,
        }
    }

    fn here(&self) -> Location {
        Location {
            source: Rc::clone(&self.source),
            line: self.line,
            column: self.column,
        }
    }

    fn peek(&self) -> Option<char> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Returns a previously collected here-document body, if the lexer has
    /// drained past the line it belonged to.
    pub fn take_heredoc_body(&mut self, id: u32) -> Option<String> {
        self.ready_heredocs.remove(&id)
    }

    /// Registers a pending here-document so the lexer knows to harvest its
    /// body the next time it drains an end-of-line.
    fn register_heredoc(&mut self, marker: String, strip_tabs: bool) -> u32 {
        let id = self.next_heredoc_id;
        self.next_heredoc_id += 1;
        self.pending_heredocs.push(PendingHeredoc { id, marker, strip_tabs });
        id
    }

    /// Reads the raw remainder of the current physical line (used once a
    /// newline has been consumed and here-document bodies must be read
    /// before ordinary tokenizing can resume).
    fn read_line_raw(&mut self) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            s.push(c);
            self.advance();
        }
        s
    }

    /// Drains every pending here-document by reading body lines up to each
    /// marker, in FIFO registration order. Called once the lexer has just
    /// consumed the newline that ends a physical line.
    fn drain_pending_heredocs(&mut self) {
        let pending = std::mem::take(&mut self.pending_heredocs);
        for doc in pending {
            let id = doc.id;
            let mut body = String::new();
            loop {
                if self.at_eof() {
                    self.unterminated_heredoc_marker = Some(doc.marker.clone());
                    break;
                }
                let line = self.read_line_raw();
                if self.peek() == Some('\n') {
                    self.advance();
                }
                let compare = if doc.strip_tabs {
                    line.trim_start_matches('\t')
                } else {
                    line.as_str()
                };
                if compare == doc.marker {
                    break;
                }
                let content = if doc.strip_tabs {
                    line.trim_start_matches('\t')
                } else {
                    line.as_str()
                };
                body.push_str(content);
                body.push('\n');
            }
            self.ready_heredocs.insert(id, body);
        }
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t') | Some('\r')) {
            self.advance();
        }
    }

    fn is_delimiter(c: char) -> bool {
        matches!(
            c,
            ' ' | '\t' | '\r' | '\n' | '|' | '&' | ';' | '(' | ')' | '<' | '>' | '#'
        )
    }

    /// Returns the next token, or `Eof` once the source is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_blanks();

        let loc = self.here();

        let Some(c) = self.peek() else {
            return Token {
                kind: TokenKind::Eof,
                location: loc,
            };
        };

        if c == '\n' {
            self.advance();
            self.drain_pending_heredocs();
            return Token {
                kind: TokenKind::Eol,
                location: loc,
            };
        }

        if c == '#' {
            while !matches!(self.peek(), None | Some('\n')) {
                self.advance();
            }
            return Token {
                kind: TokenKind::Comment,
                location: loc,
            };
        }

        if c.is_ascii_digit() {
            if let Some(tok) = self.try_io_number(loc.clone()) {
                return tok;
            }
        }

        match c {
            '|' => {
                self.advance();
                if self.peek() == Some('|') {
                    self.advance();
                    return Token {
                        kind: TokenKind::Or,
                        location: loc,
                    };
                }
                Token {
                    kind: TokenKind::Pipe,
                    location: loc,
                }
            }
            '&' => {
                self.advance();
                if self.peek() == Some('&') {
                    self.advance();
                    return Token {
                        kind: TokenKind::And,
                        location: loc,
                    };
                }
                Token {
                    kind: TokenKind::Background,
                    location: loc,
                }
            }
            ';' => {
                self.advance();
                Token {
                    kind: TokenKind::Semicolon,
                    location: loc,
                }
            }
            '(' => {
                self.advance();
                Token {
                    kind: TokenKind::LParen,
                    location: loc,
                }
            }
            ')' => {
                self.advance();
                Token {
                    kind: TokenKind::RParen,
                    location: loc,
                }
            }
            '<' => self.lex_less(loc, 0),
            '>' => self.lex_great(loc, 1),
            _ => self.lex_word(loc),
        }
    }

    fn try_io_number(&mut self, loc: Location) -> Option<Token> {
        let mut n = 0usize;
        let mut len = 0usize;
        while let Some(d) = self.peek_at(len).filter(|c| c.is_ascii_digit()) {
            n = n * 10 + d.to_digit(10).unwrap() as usize;
            len += 1;
        }
        if len == 0 {
            return None;
        }
        if !matches!(self.peek_at(len), Some('<') | Some('>')) {
            return None;
        }
        for _ in 0..len {
            self.advance();
        }
        Some(Token {
            kind: TokenKind::IoNumber(n as u32),
            location: loc,
        })
    }

    fn lex_less(&mut self, loc: Location, _fd: u32) -> Token {
        self.advance(); // consume '<'
        match self.peek() {
            Some('<') => {
                self.advance();
                if self.peek() == Some('<') {
                    self.advance();
                    return self.lex_herestring(loc);
                }
                let strip = if self.peek() == Some('-') {
                    self.advance();
                    true
                } else {
                    false
                };
                self.skip_blanks();
                let marker = self.scan_bare_word();
                let id = self.register_heredoc(marker, strip);
                Token {
                    kind: TokenKind::HereDocMarker { id, strip_tabs: strip },
                    location: loc,
                }
            }
            Some('&') => {
                self.advance();
                Token {
                    kind: TokenKind::FdDup,
                    location: loc,
                }
            }
            Some('(') => {
                self.advance();
                let inner = self.scan_balanced_parens();
                Token {
                    kind: TokenKind::ProcessSubIn(inner),
                    location: loc,
                }
            }
            _ => Token {
                kind: TokenKind::RedirectIn,
                location: loc,
            },
        }
    }

    fn lex_great(&mut self, loc: Location, _fd: u32) -> Token {
        self.advance(); // consume '>'
        match self.peek() {
            Some('>') => {
                self.advance();
                Token {
                    kind: TokenKind::RedirectAppend,
                    location: loc,
                }
            }
            Some('&') => {
                self.advance();
                if matches!(self.peek(), Some(d) if d.is_ascii_digit() || d == '-') {
                    Token {
                        kind: TokenKind::FdDup,
                        location: loc,
                    }
                } else {
                    Token {
                        kind: TokenKind::RedirectOutErr,
                        location: loc,
                    }
                }
            }
            Some('(') => {
                self.advance();
                let inner = self.scan_balanced_parens();
                Token {
                    kind: TokenKind::ProcessSubOut(inner),
                    location: loc,
                }
            }
            _ => Token {
                kind: TokenKind::RedirectOut,
                location: loc,
            },
        }
    }

    fn lex_herestring(&mut self, loc: Location) -> Token {
        self.skip_blanks();
        let word_loc = self.here();
        let word = self.scan_word_text(word_loc);
        let fields = self.host.expand_word(&word);
        Token {
            kind: TokenKind::HereString(fields.join(" ")),
            location: loc,
        }
    }

    /// Reads a run of non-delimiter characters verbatim (used for heredoc
    /// markers, which are not themselves subject to quoting removal beyond
    /// the literal characters written).
    fn scan_bare_word(&mut self) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if Self::is_delimiter(c) {
                break;
            }
            if c == '\'' || c == '"' {
                self.advance();
                continue;
            }
            s.push(c);
            self.advance();
        }
        s
    }

    /// Reads balanced-paren text for `$(…)` / `<(…)` / `>(…)`, leaving the
    /// cursor just past the matching `)`.
    fn scan_balanced_parens(&mut self) -> String {
        let mut depth = 1i32;
        let mut s = String::new();
        while depth > 0 {
            match self.advance() {
                Some('(') => {
                    depth += 1;
                    s.push('(');
                }
                Some(')') => {
                    depth -= 1;
                    if depth > 0 {
                        s.push(')');
                    }
                }
                Some(c) => s.push(c),
                None => break,
            }
        }
        s
    }

    fn lex_word(&mut self, loc: Location) -> Token {
        let word = self.scan_word_text(loc.clone());

        if let Some(eq) = word.find('=') {
            let (name, rest) = word.split_at(eq);
            if eq > 0 && is_name(name) {
                return Token {
                    kind: TokenKind::Assignment {
                        name: name.to_owned(),
                        value: rest[1..].to_owned(),
                    },
                    location: loc,
                };
            }
        }

        Token {
            kind: TokenKind::Word(word),
            location: loc,
        }
    }

    /// Scans one word, resolving quoting, escaping and `$(…)` inline
    /// substitution. Leaves the result as a plain string; variable/tilde/
    /// brace/filename expansion happens later, in the expansion pipeline.
    fn scan_word_text(&mut self, _start: Location) -> String {
        let mut out = String::new();
        loop {
            match self.peek() {
                None => break,
                Some(c) if Self::is_delimiter(c) => break,
                Some('\\') if self.peek_at(1) == Some('$') => {
                    // Kept literally as the two bytes `\$`, mirroring the
                    // double-quoted case, so the variable-expansion stage
                    // can see the escape and suppress expansion of `$`
                    // rather than losing the distinction here.
                    self.advance();
                    self.advance();
                    out.push('\\');
                    out.push('$');
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some(escaped) => out.push(escaped),
                        None => {
                            out.push('\\');
                            break;
                        }
                    }
                }
                Some('\'') => {
                    self.advance();
                    let mut closed = false;
                    while let Some(c) = self.peek() {
                        self.advance();
                        if c == '\'' {
                            closed = true;
                            break;
                        }
                        out.push(c);
                    }
                    if !closed {
                        self.had_error = true;
                        return format!("'{out}");
                    }
                }
                Some('"') => {
                    self.advance();
                    if !self.scan_double_quoted(&mut out) {
                        self.had_error = true;
                        return format!("\"{out}");
                    }
                }
                Some('$') if self.peek_at(1) == Some('(') => {
                    self.advance();
                    self.advance();
                    let inner = self.scan_balanced_parens();
                    let result = self.host.substitute_command(&inner);
                    out.push_str(result.trim_end_matches('\n'));
                }
                Some(c) => {
                    out.push(c);
                    self.advance();
                }
            }
        }
        out
    }

    /// Scans the body of a double-quoted string (the opening `"` has
    /// already been consumed). Returns `false` if EOF was reached before a
    /// closing quote.
    fn scan_double_quoted(&mut self, out: &mut String) -> bool {
        loop {
            match self.peek() {
                None => return false,
                Some('"') => {
                    self.advance();
                    return true;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some('$') => {
                            // `\$` is kept literally as the two bytes `\$` so
                            // later expansion passes still see the escape.
                            out.push('\\');
                            out.push('$');
                            self.advance();
                        }
                        Some(c) => {
                            out.push('\\');
                            out.push(c);
                            self.advance();
                        }
                        None => {
                            out.push('\\');
                        }
                    }
                }
                Some('$') if self.peek_at(1) == Some('(') => {
                    self.advance();
                    self.advance();
                    let inner = self.scan_balanced_parens();
                    let result = self.host.substitute_command(&inner);
                    out.push_str(result.trim_end_matches('\n'));
                }
                Some(c) => {
                    out.push(c);
                    self.advance();
                }
            }
        }
    }
}

/// `NAME` grammar accepted for a word to be recognized as an assignment or a
/// `$NAME` parameter: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<TokenKind> {
        let mut host = NullHost;
        let mut lexer = Lexer::new(src, Source::CommandLine, &mut host);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            let done = tok.kind == TokenKind::Eof;
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn words_and_operators() {
        let toks = tokens("echo hi | cat\n");
        assert_eq!(
            toks,
            vec![
                TokenKind::Word("echo".into()),
                TokenKind::Word("hi".into()),
                TokenKind::Pipe,
                TokenKind::Word("cat".into()),
                TokenKind::Eol,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn assignment_before_word() {
        let toks = tokens("FOO=bar");
        assert_eq!(
            toks,
            vec![
                TokenKind::Assignment {
                    name: "FOO".into(),
                    value: "bar".into()
                },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn io_number_before_redirect() {
        let toks = tokens("2>&1");
        assert_eq!(
            toks,
            vec![TokenKind::IoNumber(2), TokenKind::FdDup, TokenKind::Eof]
        );
    }

    #[test]
    fn single_quotes_are_literal() {
        let toks = tokens("'a b'");
        assert_eq!(toks, vec![TokenKind::Word("a b".into()), TokenKind::Eof]);
    }

    #[test]
    fn unterminated_quote_is_visible_in_word() {
        let toks = tokens("'abc");
        assert_eq!(toks, vec![TokenKind::Word("'abc".into()), TokenKind::Eof]);
    }

    #[test]
    fn command_substitution_is_spliced() {
        struct Echoer;
        impl LexerHost for Echoer {
            fn substitute_command(&mut self, command_text: &str) -> String {
                format!("[{command_text}]\n\n")
            }
            fn expand_word(&mut self, word: &str) -> Vec<String> {
                vec![word.to_owned()]
            }
        }
        let mut host = Echoer;
        let mut lexer = Lexer::new("echo $(foo bar)", Source::CommandLine, &mut host);
        let _ = lexer.next_token();
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Word("[foo bar]".into()));
    }

    #[test]
    fn heredoc_body_is_collected_at_eol() {
        let mut host = NullHost;
        let mut lexer = Lexer::new("cat <<EOF\nhello\nEOF\n", Source::CommandLine, &mut host);
        let _ = lexer.next_token(); // cat
        let marker = lexer.next_token();
        let TokenKind::HereDocMarker { id, .. } = marker.kind else {
            panic!("expected heredoc marker token");
        };
        let eol = lexer.next_token();
        assert_eq!(eol.kind, TokenKind::Eol);
        let body = lexer.take_heredoc_body(id).unwrap();
        assert_eq!(body, "hello\n");
    }
}
