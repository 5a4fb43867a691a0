//! RFC 5322 §3.4 address specification, with the §4.4 obsolete forms.

use super::{HeaderParser, is_dtext};

impl HeaderParser<'_> {
    /// `local-part = dot-atom / quoted-string / obs-local-part`
    ///
    /// `obs-local-part = word *("." word)` accepts everything the other two
    /// alternatives do, so it is the only one tried.
    pub fn parse_local_part(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let mut i = self.parse_word(index);
        if i == index {
            return index;
        }
        while self.is(i, b'.') {
            let next = self.parse_word(i + 1);
            if next == i + 1 {
                // A dangling dot makes the whole local part invalid.
                return self.fail(index, checkpoint);
            }
            i = next;
        }
        i
    }

    /// `domain = dot-atom / domain-literal / obs-domain`
    ///
    /// `obs-domain = atom *("." atom)` covers `dot-atom`.
    pub fn parse_domain(&mut self, index: usize) -> usize {
        let end = self.parse_domain_literal(index);
        if end != index {
            return end;
        }
        self.parse_obs_domain(index)
    }

    /// `obs-domain = atom *("." atom)`
    pub fn parse_obs_domain(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let mut i = self.parse_atom(index);
        if i == index {
            return index;
        }
        while self.is(i, b'.') {
            let next = self.parse_atom(i + 1);
            if next == i + 1 {
                return self.fail(index, checkpoint);
            }
            i = next;
        }
        i
    }

    /// `domain-literal = [CFWS] "[" *([FWS] dtext) [FWS] "]" [CFWS]`
    pub fn parse_domain_literal(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        if !self.is(start, b'[') {
            return self.fail(index, checkpoint);
        }
        let mut i = start + 1;
        loop {
            i = self.parse_fws(i);
            match self.byte(i) {
                Some(b']') => return self.parse_cfws(i + 1),
                Some(b'\\') => {
                    let next = self.parse_quoted_pair(i);
                    if next == i {
                        return self.fail(index, checkpoint);
                    }
                    i = next;
                }
                Some(b) if is_dtext(b) => i = self.skip_while(i, is_dtext),
                _ => return self.fail(index, checkpoint),
            }
        }
    }

    /// `addr-spec = local-part "@" domain`
    pub fn parse_addr_spec(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let i = self.parse_local_part(index);
        if i == index || !self.is(i, b'@') {
            return self.fail(index, checkpoint);
        }
        let end = self.parse_domain(i + 1);
        if end == i + 1 {
            return self.fail(index, checkpoint);
        }
        end
    }

    /// `angle-addr = [CFWS] "<" addr-spec ">" [CFWS] / obs-angle-addr`
    ///
    /// `obs-angle-addr = [CFWS] "<" obs-route addr-spec ">" [CFWS]`
    pub fn parse_angle_addr(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let open = self.parse_cfws(index);
        if !self.is(open, b'<') {
            return self.fail(index, checkpoint);
        }
        let mut i = open + 1;
        i = self.parse_obs_route(i);
        let end = self.parse_addr_spec(i);
        if end == i || !self.is(end, b'>') {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(end + 1)
    }

    /// `obs-route = obs-domain-list ":"`
    ///
    /// `obs-domain-list = *(CFWS / ",") "@" domain *("," [CFWS] ["@" domain])`
    pub fn parse_obs_route(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let mut i = index;
        loop {
            let next = self.parse_cfws(i);
            if next != i {
                i = next;
            } else if self.is(i, b',') {
                i += 1;
            } else {
                break;
            }
        }
        if !self.is(i, b'@') {
            return self.fail(index, checkpoint);
        }
        let end = self.parse_domain(i + 1);
        if end == i + 1 {
            return self.fail(index, checkpoint);
        }
        i = end;
        while self.is(i, b',') {
            i = self.parse_cfws(i + 1);
            if self.is(i, b'@') {
                let end = self.parse_domain(i + 1);
                if end == i + 1 {
                    return self.fail(index, checkpoint);
                }
                i = end;
            }
        }
        if !self.is(i, b':') {
            return self.fail(index, checkpoint);
        }
        i + 1
    }

    /// `display-name = phrase`
    pub fn parse_display_name(&mut self, index: usize) -> usize {
        self.parse_phrase(index)
    }

    /// `name-addr = [display-name] angle-addr`
    pub fn parse_name_addr(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let i = self.parse_display_name(index);
        let end = self.parse_angle_addr(i);
        if end == i {
            return self.fail(index, checkpoint);
        }
        end
    }

    /// `mailbox = name-addr / addr-spec`
    pub fn parse_mailbox(&mut self, index: usize) -> usize {
        let end = self.parse_name_addr(index);
        if end != index {
            return end;
        }
        self.parse_addr_spec(index)
    }

    /// `mailbox-list = (mailbox *("," mailbox)) / obs-mbox-list`
    ///
    /// `obs-mbox-list = *([CFWS] ",") mailbox *("," [mailbox / CFWS])`
    pub fn parse_mailbox_list(&mut self, index: usize) -> usize {
        self.parse_list_of(index, Self::parse_mailbox)
    }

    /// `group = display-name ":" [group-list] ";" [CFWS]`
    pub fn parse_group(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let i = self.parse_display_name(index);
        if i == index || !self.is(i, b':') {
            return self.fail(index, checkpoint);
        }
        let i = self.parse_group_list(i + 1);
        if !self.is(i, b';') {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(i + 1)
    }

    /// `group-list = mailbox-list / CFWS / obs-group-list`
    ///
    /// `obs-group-list = 1*([CFWS] ",") [CFWS]`. Matching nothing is
    /// allowed since the list is optional in `group`.
    pub fn parse_group_list(&mut self, index: usize) -> usize {
        let end = self.parse_mailbox_list(index);
        if end != index {
            return end;
        }
        let mut i = index;
        loop {
            i = self.parse_cfws(i);
            if !self.is(i, b',') {
                return i;
            }
            i += 1;
        }
    }

    /// `address = mailbox / group`
    pub fn parse_address(&mut self, index: usize) -> usize {
        let end = self.parse_mailbox(index);
        if end != index {
            return end;
        }
        self.parse_group(index)
    }

    /// `address-list = (address *("," address)) / obs-addr-list`
    ///
    /// `obs-addr-list = *([CFWS] ",") address *("," [address / CFWS])`
    pub fn parse_address_list(&mut self, index: usize) -> usize {
        self.parse_list_of(index, Self::parse_address)
    }

    /// `path = angle-addr / ([CFWS] "<" [CFWS] ">" [CFWS])`
    pub fn parse_path(&mut self, index: usize) -> usize {
        let end = self.parse_angle_addr(index);
        if end != index {
            return end;
        }
        let checkpoint = self.checkpoint();
        let open = self.parse_cfws(index);
        if !self.is(open, b'<') {
            return self.fail(index, checkpoint);
        }
        let close = self.parse_cfws(open + 1);
        if !self.is(close, b'>') {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(close + 1)
    }

    /// Comma-separated list with the obsolete empty elements:
    /// `*([CFWS] ",") item *("," [item / CFWS])`.
    pub(super) fn parse_list_of(
        &mut self,
        index: usize,
        item: fn(&mut Self, usize) -> usize,
    ) -> usize {
        let checkpoint = self.checkpoint();
        let mut i = index;
        let first = loop {
            let end = item(self, i);
            if end != i {
                break end;
            }
            let next = self.parse_cfws(i);
            if !self.is(next, b',') {
                return self.fail(index, checkpoint);
            }
            i = next + 1;
        };
        i = first;
        while self.is(i, b',') {
            i += 1;
            let end = item(self, i);
            i = if end == i { self.parse_cfws(i) } else { end };
        }
        i
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::grammar::{HeaderParser, TokenKind};

    fn full<'a>(value: &'a str, production: fn(&mut HeaderParser<'a>, usize) -> usize) -> bool {
        let mut parser = HeaderParser::new(value);
        production(&mut parser, 0) == value.len()
    }

    #[test]
    fn test_addr_spec() {
        assert!(full("john.q.public@example.com", HeaderParser::parse_addr_spec));
        assert!(full("\"quoted local\"@example.com", HeaderParser::parse_addr_spec));
        assert!(full("user@[192.0.2.1]", HeaderParser::parse_addr_spec));
        assert!(!full("user@", HeaderParser::parse_addr_spec));
        assert!(!full("user.@example.com", HeaderParser::parse_addr_spec));
    }

    #[test]
    fn test_mailbox_forms() {
        assert!(full("Joe Q. Public <john.q.public@example.com>", HeaderParser::parse_mailbox));
        assert!(full("<boss@nil.test>", HeaderParser::parse_mailbox));
        assert!(full("Pete(A nice \\) chap) <pete(his account)@silly.test(his host)>", HeaderParser::parse_mailbox));
        assert!(!full("Joe <broken", HeaderParser::parse_mailbox));
    }

    #[test]
    fn test_obs_route() {
        assert!(full("<@route1.test,@route2.test:user@example.com>", HeaderParser::parse_angle_addr));
    }

    #[test]
    fn test_group() {
        assert!(full("A Group:Ed Jones <c@a.test>,joe@where.test,John <jdoe@one.test>;", HeaderParser::parse_group));
        assert!(full("Undisclosed recipients:;", HeaderParser::parse_group));
        assert!(full("Empty : , , ;", HeaderParser::parse_group));
    }

    #[test]
    fn test_address_list_obsolete_empties() {
        assert!(full(", a@b.test, , c@d.test,", HeaderParser::parse_address_list));
        assert!(!full(",,", HeaderParser::parse_address_list));
    }

    #[test]
    fn test_failed_name_addr_leaves_no_phrase() {
        let mut parser = HeaderParser::new("john.smith@example.com").recording();
        assert_eq!(parser.parse_mailbox(0), 22);
        let tokens = parser.into_sorted_tokens();
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Phrase));
    }

    #[test]
    fn test_path() {
        assert!(full("<>", HeaderParser::parse_path));
        assert!(full(" < > ", HeaderParser::parse_path));
        assert!(full("<bounce@example.com>", HeaderParser::parse_path));
    }
}
