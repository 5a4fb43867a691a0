//! RFC 5322 §3.2 lexical tokens: folding white space, comments, quoted
//! strings, atoms and phrases.

use tracing::warn;

use super::{HeaderParser, TokenKind, is_atext, is_ctext, is_qtext, is_wsp};

impl HeaderParser<'_> {
    /// `FWS = ([*WSP CRLF] 1*WSP) / obs-FWS`
    pub fn parse_fws(&mut self, index: usize) -> usize {
        let mut i = index;
        loop {
            let wsp_end = self.skip_while(i, is_wsp);
            if self.is(wsp_end, b'\r')
                && self.is(wsp_end + 1, b'\n')
                && self.byte(wsp_end + 2).is_some_and(is_wsp)
            {
                i = wsp_end + 2;
                continue;
            }
            return wsp_end;
        }
    }

    /// `CFWS = (1*([FWS] comment) [FWS]) / FWS`
    pub fn parse_cfws(&mut self, index: usize) -> usize {
        let mut i = index;
        loop {
            let after_fws = self.parse_fws(i);
            let after_comment = self.parse_comment(after_fws);
            if after_comment == after_fws {
                return after_fws;
            }
            i = after_comment;
        }
    }

    /// `comment = "(" *([FWS] ccontent) [FWS] ")"`
    ///
    /// Commits a [`TokenKind::Comment`] spanning both parentheses of the
    /// outermost comment; nested comments are covered by it. Nesting deeper
    /// than the configured limit does not match.
    pub fn parse_comment(&mut self, index: usize) -> usize {
        if !self.is(index, b'(') {
            return index;
        }
        if self.depth >= self.max_depth {
            warn!(depth = self.depth, "comment nesting limit reached");
            return index;
        }
        let checkpoint = self.checkpoint();
        self.depth += 1;
        let end = self.comment_content(index + 1);
        self.depth -= 1;
        match end {
            Some(end) => {
                if self.depth == 0 {
                    self.commit(TokenKind::Comment, index, end);
                }
                end
            }
            None => self.fail(index, checkpoint),
        }
    }

    /// Body of a comment after `(`, through the closing `)`.
    fn comment_content(&mut self, mut i: usize) -> Option<usize> {
        loop {
            i = self.parse_fws(i);
            match self.byte(i)? {
                b')' => return Some(i + 1),
                b'(' => {
                    let next = self.parse_comment(i);
                    if next == i {
                        return None;
                    }
                    i = next;
                }
                b'\\' => {
                    let next = self.parse_quoted_pair(i);
                    if next == i {
                        return None;
                    }
                    i = next;
                }
                b if is_ctext(b) => i = self.skip_while(i, is_ctext),
                _ => return None,
            }
        }
    }

    /// `quoted-pair = ("\" (VCHAR / WSP)) / obs-qp`
    ///
    /// Obsolete control characters and non-ASCII characters are accepted
    /// after the backslash.
    pub fn parse_quoted_pair(&mut self, index: usize) -> usize {
        if !self.is(index, b'\\') {
            return index;
        }
        match self.byte(index + 1) {
            Some(_) => self.skip_char(index + 1),
            None => index,
        }
    }

    /// `quoted-string = [CFWS] DQUOTE *([FWS] qcontent) [FWS] DQUOTE [CFWS]`
    pub fn parse_quoted_string(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let end = self.parse_bare_quoted_string(start);
        if end == start {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(end)
    }

    /// `DQUOTE *([FWS] qcontent) [FWS] DQUOTE` without surrounding CFWS.
    pub fn parse_bare_quoted_string(&mut self, index: usize) -> usize {
        if !self.is(index, b'"') {
            return index;
        }
        let mut i = index + 1;
        loop {
            i = self.parse_fws(i);
            match self.byte(i) {
                Some(b'"') => return i + 1,
                Some(b'\\') => {
                    let next = self.parse_quoted_pair(i);
                    if next == i {
                        return index;
                    }
                    i = next;
                }
                Some(b) if is_qtext(b) => i = self.skip_while(i, is_qtext),
                _ => return index,
            }
        }
    }

    /// `atom = [CFWS] 1*atext [CFWS]`
    ///
    /// Commits a [`TokenKind::Atom`] for the `atext` run.
    pub fn parse_atom(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let end = self.skip_while(start, is_atext);
        if end == start {
            return self.fail(index, checkpoint);
        }
        self.commit(TokenKind::Atom, start, end);
        self.parse_cfws(end)
    }

    /// `dot-atom-text = 1*atext *("." 1*atext)`
    pub fn parse_dot_atom_text(&mut self, index: usize) -> usize {
        let mut i = self.skip_while(index, is_atext);
        if i == index {
            return index;
        }
        while self.is(i, b'.') {
            let next = self.skip_while(i + 1, is_atext);
            if next == i + 1 {
                break;
            }
            i = next;
        }
        i
    }

    /// `dot-atom = [CFWS] dot-atom-text [CFWS]`
    pub fn parse_dot_atom(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let end = self.parse_dot_atom_text(start);
        if end == start {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(end)
    }

    /// `word = atom / quoted-string`
    pub fn parse_word(&mut self, index: usize) -> usize {
        let end = self.parse_atom(index);
        if end != index {
            return end;
        }
        self.parse_quoted_string(index)
    }

    /// `phrase = 1*word / obs-phrase`, where
    /// `obs-phrase = word *(word / "." / CFWS)`.
    ///
    /// Commits a [`TokenKind::Phrase`] over the whole match.
    pub fn parse_phrase(&mut self, index: usize) -> usize {
        let mut i = self.parse_word(index);
        if i == index {
            return index;
        }
        loop {
            let next = self.parse_word(i);
            if next != i {
                i = next;
                continue;
            }
            if self.is(i, b'.') {
                i += 1;
                continue;
            }
            let next = self.parse_cfws(i);
            if next == i {
                break;
            }
            i = next;
        }
        self.commit(TokenKind::Phrase, index, i);
        i
    }

    /// `unstructured = (*([FWS] VCHAR) *WSP) / obs-unstruct`
    ///
    /// Accepts any character except a bare CR or LF.
    pub fn parse_unstructured(&mut self, index: usize) -> usize {
        let mut i = index;
        loop {
            i = self.parse_fws(i);
            match self.byte(i) {
                Some(b'\r' | b'\n') | None => return i,
                Some(_) => i = self.skip_char(i),
            }
        }
    }
}
