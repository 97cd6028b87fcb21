//! Hand-written scanner (lexer), one token at a time.
//!
//! A direct transliteration of the algorithm in
//! `examples/original_source/bling/scanner/scanner.c`: a single lookahead
//! byte (`ch`), a `next0` that advances it and records line starts as it
//! crosses `\n`, and a big dispatch in [`Scanner::scan`] built from the
//! `switch2`/`switch3`/`switch4` multi-character-operator helpers.
//!
//! Automatic semicolon insertion works exactly as in the original: scanning
//! certain token kinds sets `insert_semi`; `skip_whitespace` then treats a
//! bare `\n` as ordinary whitespace unless `insert_semi` is set, in which
//! case the `\n` byte itself is consumed by `scan` as a synthetic
//! `Semicolon`. `dont_insert_semis` disables the whole mechanism for C-mode
//! source and additionally permits `$` inside identifiers and recognizes
//! `->`, per spec.md's C-dialect note.
//!
//! Unlike the original (which `panic`s on an unterminated comment/string/
//! rune or an illegal byte), `scan` returns a [`CompileError::Scan`] so the
//! driver can report it through the normal diagnostic path instead of
//! aborting the process.

use sl_base::{CompileError, FileSet, Interner, Pos, Result, Symbol};

use crate::token::{Token, TokenKind};

pub struct Scanner<'s> {
    fileset: &'s mut FileSet,
    file: usize,
    interner: &'s mut Interner,
    src: Vec<u8>,
    offset: usize,
    rd_offset: usize,
    ch: Option<u8>,
    insert_semi: bool,
    dont_insert_semis: bool,
}

fn is_letter(ch: Option<u8>) -> bool {
    matches!(ch, Some(b'a'..=b'z') | Some(b'A'..=b'Z') | Some(b'_'))
}

fn is_digit(ch: Option<u8>) -> bool {
    matches!(ch, Some(b'0'..=b'9'))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum NumKind {
    DecInt,
    HexInt,
    Float,
}

fn is_numeric(ch: Option<u8>, kind: NumKind) -> bool {
    match kind {
        NumKind::HexInt => matches!(ch, Some(b'0'..=b'9') | Some(b'a'..=b'f') | Some(b'A'..=b'F')),
        NumKind::DecInt | NumKind::Float => is_digit(ch),
    }
}

impl<'s> Scanner<'s> {
    /// `scanner$init`: copies the file's source (the original `strdup`s it)
    /// and primes `ch` with the first byte.
    pub fn new(fileset: &'s mut FileSet, file: usize, interner: &'s mut Interner, dont_insert_semis: bool) -> Self {
        let src = fileset.file(file).source().as_bytes().to_vec();
        let mut s = Scanner {
            fileset,
            file,
            interner,
            src,
            offset: 0,
            rd_offset: 0,
            ch: None,
            insert_semi: false,
            dont_insert_semis,
        };
        s.next0();
        s
    }

    fn next0(&mut self) {
        self.offset = self.rd_offset;
        if self.ch == Some(b'\n') {
            self.fileset.file_mut(self.file).add_line(self.offset);
        }
        self.ch = self.src.get(self.rd_offset).copied();
        self.rd_offset += 1;
    }

    fn pos_here(&self, offset: usize) -> Pos {
        self.fileset.file(self.file).pos(offset)
    }

    fn intern_slice(&mut self, start: usize, end: usize) -> Symbol {
        let text = std::str::from_utf8(&self.src[start..end]).unwrap_or("");
        self.interner.intern(text)
    }

    fn skip_whitespace(&mut self) {
        while self.ch == Some(b' ')
            || (self.ch == Some(b'\n') && !self.insert_semi)
            || self.ch == Some(b'\t')
        {
            self.next0();
        }
    }

    fn skip_line(&mut self) {
        while self.ch.is_some() && self.ch != Some(b'\n') {
            self.next0();
        }
    }

    /// `switch4`: `=` always wins (→ `tok1`); failing that, `ch2` followed
    /// optionally by `=` selects between `tok2`/`tok3`; otherwise `tok0`.
    fn switch4(&mut self, tok0: TokenKind, tok1: TokenKind, ch2: Option<u8>, tok2: TokenKind, tok3: Option<TokenKind>) -> TokenKind {
        if self.ch == Some(b'=') {
            self.next0();
            return tok1;
        }
        if let Some(ch2) = ch2 {
            if self.ch == Some(ch2) {
                self.next0();
                if let Some(tok3) = tok3 {
                    if self.ch == Some(b'=') {
                        self.next0();
                        return tok3;
                    }
                }
                return tok2;
            }
        }
        tok0
    }

    fn switch3(&mut self, tok0: TokenKind, tok1: TokenKind, ch2: u8, tok2: TokenKind) -> TokenKind {
        self.switch4(tok0, tok1, Some(ch2), tok2, None)
    }

    fn switch2(&mut self, tok0: TokenKind, tok1: TokenKind) -> TokenKind {
        self.switch4(tok0, tok1, None, TokenKind::Illegal, None)
    }

    fn scan_ident(&mut self) -> Symbol {
        let offs = self.offset;
        while is_letter(self.ch) || is_digit(self.ch) || (self.dont_insert_semis && self.ch == Some(b'$')) {
            self.next0();
        }
        self.intern_slice(offs, self.offset)
    }

    fn scan_pragma(&mut self) -> Symbol {
        let offs = self.offset;
        while self.ch.is_some() && self.ch != Some(b'\n') {
            self.next0();
        }
        self.intern_slice(offs, self.offset)
    }

    fn scan_number(&mut self) -> (Symbol, TokenKind) {
        let offs = self.offset;
        let mut kind = NumKind::DecInt;
        if self.ch == Some(b'0') {
            self.next0();
            if self.ch == Some(b'x') {
                kind = NumKind::HexInt;
                self.next0();
            }
        }
        loop {
            if !(is_numeric(self.ch, kind) || self.ch == Some(b'.')) {
                break;
            }
            if self.ch == Some(b'.') {
                if kind == NumKind::DecInt {
                    kind = NumKind::Float;
                } else {
                    break;
                }
            }
            self.next0();
        }
        let tok = match kind {
            NumKind::DecInt | NumKind::HexInt => TokenKind::Int,
            NumKind::Float => TokenKind::Float,
        };
        (self.intern_slice(offs, self.offset), tok)
    }

    fn scan_rune(&mut self) -> Result<Symbol> {
        let offs = self.offset;
        let mut n = 0;
        let mut escape = false;
        loop {
            if n > 0 && self.ch == Some(b'\'') && !escape {
                break;
            }
            if self.ch.is_none() {
                return Err(CompileError::scan(self.pos_here(offs), "rune literal not terminated"));
            }
            escape = self.ch == Some(b'\\') && !escape;
            self.next0();
            n += 1;
        }
        self.next0();
        Ok(self.intern_slice(offs, self.offset))
    }

    fn scan_string(&mut self) -> Result<Symbol> {
        let offs = self.offset;
        let mut n = 0;
        let mut escape = false;
        loop {
            if n > 0 && self.ch == Some(b'"') && !escape {
                break;
            }
            if self.ch.is_none() {
                return Err(CompileError::scan(self.pos_here(offs), "string literal not terminated"));
            }
            escape = self.ch == Some(b'\\') && !escape;
            self.next0();
            n += 1;
        }
        self.next0();
        Ok(self.intern_slice(offs, self.offset))
    }

    fn scan_comment(&mut self) -> Result<()> {
        let offs = self.offset - 1;
        match self.ch {
            Some(b'/') => {
                self.skip_line();
                Ok(())
            }
            Some(b'*') => {
                self.next0();
                while let Some(ch) = self.ch {
                    self.next0();
                    if ch == b'*' && self.ch == Some(b'/') {
                        self.next0();
                        return Ok(());
                    }
                }
                Err(CompileError::scan(self.pos_here(offs), "comment not terminated"))
            }
            _ => unreachable!("scan_comment called without a comment opener"),
        }
    }

    /// `scanner$scan`: scans and returns the next token, looping internally
    /// past skipped comments (`goto scan_again`).
    pub fn scan(&mut self) -> Result<Token> {
        loop {
            self.skip_whitespace();
            let pos = self.pos_here(self.offset);
            let mut insert_semi = false;
            let mut lexeme = Symbol::EMPTY;
            let tok;

            if is_letter(self.ch) {
                let sym = self.scan_ident();
                let text = self.interner.resolve(sym).to_string();
                if text.len() > 1 {
                    match TokenKind::keyword(&text) {
                        Some(kw) => {
                            tok = kw;
                            insert_semi = matches!(
                                kw,
                                TokenKind::Break | TokenKind::Continue | TokenKind::Fallthrough | TokenKind::Return
                            );
                        }
                        None => {
                            tok = TokenKind::Ident;
                            lexeme = sym;
                            insert_semi = true;
                        }
                    }
                } else {
                    tok = TokenKind::Ident;
                    lexeme = sym;
                    insert_semi = true;
                }
            } else if is_digit(self.ch) {
                insert_semi = true;
                let (sym, kind) = self.scan_number();
                lexeme = sym;
                tok = kind;
            } else if self.ch == Some(b'\'') {
                insert_semi = true;
                lexeme = self.scan_rune()?;
                tok = TokenKind::Char;
            } else if self.ch == Some(b'"') {
                insert_semi = true;
                lexeme = self.scan_string()?;
                tok = TokenKind::String;
            } else {
                let ch = self.ch;
                self.next0();
                match ch {
                    None => {
                        insert_semi = true;
                        tok = TokenKind::Eof;
                    }
                    Some(b'\n') => {
                        debug_assert!(self.insert_semi);
                        self.insert_semi = false;
                        return Ok(Token::new(TokenKind::Semicolon, Symbol::EMPTY, pos));
                    }
                    Some(b'#') => {
                        lexeme = self.scan_pragma();
                        tok = TokenKind::Hash;
                    }
                    Some(b'(') => tok = TokenKind::LParen,
                    Some(b')') => {
                        insert_semi = true;
                        tok = TokenKind::RParen;
                    }
                    Some(b',') => tok = TokenKind::Comma,
                    Some(b':') => tok = TokenKind::Colon,
                    Some(b';') => tok = TokenKind::Semicolon,
                    Some(b'?') => tok = TokenKind::QuestionMark,
                    Some(b'[') => tok = TokenKind::LBrack,
                    Some(b']') => {
                        insert_semi = true;
                        tok = TokenKind::RBrack;
                    }
                    Some(b'{') => tok = TokenKind::LBrace,
                    Some(b'}') => {
                        insert_semi = true;
                        tok = TokenKind::RBrace;
                    }
                    Some(b'~') => tok = TokenKind::BitwiseNot,
                    Some(b'!') => tok = self.switch2(TokenKind::Not, TokenKind::NotEqual),
                    Some(b'$') => tok = TokenKind::Dollar,
                    Some(b'%') => tok = self.switch2(TokenKind::Mod, TokenKind::ModAssign),
                    Some(b'&') => tok = self.switch3(TokenKind::And, TokenKind::AndAssign, b'&', TokenKind::Land),
                    Some(b'*') => tok = self.switch2(TokenKind::Mul, TokenKind::MulAssign),
                    Some(b'+') => {
                        tok = self.switch3(TokenKind::Add, TokenKind::AddAssign, b'+', TokenKind::Inc);
                        if tok == TokenKind::Inc {
                            insert_semi = true;
                        }
                    }
                    Some(b'-') => {
                        if self.ch == Some(b'>') && self.dont_insert_semis {
                            self.next0();
                            tok = TokenKind::Arrow;
                        } else {
                            tok = self.switch3(TokenKind::Sub, TokenKind::SubAssign, b'-', TokenKind::Dec);
                            if tok == TokenKind::Dec {
                                insert_semi = true;
                            }
                        }
                    }
                    Some(b'.') => {
                        if self.ch == Some(b'.') {
                            self.next0();
                            if self.ch == Some(b'.') {
                                self.next0();
                                tok = TokenKind::Ellipsis;
                            } else {
                                tok = TokenKind::Illegal;
                            }
                        } else {
                            tok = TokenKind::Period;
                        }
                    }
                    Some(b'/') => {
                        if self.ch == Some(b'/') || self.ch == Some(b'*') {
                            self.scan_comment()?;
                            continue;
                        }
                        tok = self.switch2(TokenKind::Div, TokenKind::DivAssign);
                    }
                    Some(b'<') => {
                        tok = self.switch4(TokenKind::Lt, TokenKind::LtEqual, Some(b'<'), TokenKind::Shl, Some(TokenKind::ShlAssign));
                    }
                    Some(b'=') => tok = self.switch2(TokenKind::Assign, TokenKind::Equal),
                    Some(b'>') => {
                        tok = self.switch4(TokenKind::Gt, TokenKind::GtEqual, Some(b'>'), TokenKind::Shr, Some(TokenKind::ShrAssign));
                    }
                    Some(b'|') => tok = self.switch3(TokenKind::Or, TokenKind::OrAssign, b'|', TokenKind::Lor),
                    Some(other) => {
                        return Err(CompileError::scan(pos, format!("illegal character {:?}", other as char)));
                    }
                }
            }

            if !self.dont_insert_semis {
                self.insert_semi = insert_semi;
            }
            return Ok(Token::new(tok, lexeme, pos));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(src: &str, dont_insert_semis: bool) -> Vec<TokenKind> {
        let mut fileset = FileSet::new();
        let file = fileset.add_file("t.bling", src);
        let mut interner = Interner::new();
        let mut scanner = Scanner::new(&mut fileset, file, &mut interner, dont_insert_semis);
        let mut kinds = Vec::new();
        loop {
            let tok = scanner.scan().expect("scan");
            let eof = tok.kind == TokenKind::Eof;
            kinds.push(tok.kind);
            if eof {
                break;
            }
        }
        kinds
    }

    #[test]
    fn asi_inserts_semicolon_after_return() {
        let kinds = scan_all("return\n", false);
        assert_eq!(kinds, vec![TokenKind::Return, TokenKind::Semicolon, TokenKind::Eof]);
    }

    #[test]
    fn asi_does_not_fire_after_open_paren() {
        let kinds = scan_all("foo(\n)", false);
        assert_eq!(kinds, vec![TokenKind::Ident, TokenKind::LParen, TokenKind::RParen, TokenKind::Semicolon, TokenKind::Eof]);
    }

    #[test]
    fn arrow_only_recognized_in_c_mode() {
        let kinds = scan_all("a->b", true);
        assert_eq!(kinds[1], TokenKind::Arrow);
    }

    #[test]
    fn line_comment_is_skipped() {
        let kinds = scan_all("x // comment\n", false);
        assert_eq!(kinds, vec![TokenKind::Ident, TokenKind::Semicolon, TokenKind::Eof]);
    }

    #[test]
    fn unterminated_string_is_a_scan_error() {
        let mut fileset = FileSet::new();
        let file = fileset.add_file("t.bling", "\"abc");
        let mut interner = Interner::new();
        let mut scanner = Scanner::new(&mut fileset, file, &mut interner, false);
        assert!(scanner.scan().is_err());
    }

    #[test]
    fn hex_and_float_literals_scan_distinct_kinds() {
        let kinds = scan_all("0x1F 3.14", true);
        assert_eq!(kinds[0], TokenKind::Int);
        assert_eq!(kinds[1], TokenKind::Float);
    }
}
