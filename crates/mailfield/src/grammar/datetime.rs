//! RFC 5322 §3.3 date and time specification, with the §4.3 obsolete
//! forms (optional folding around every field, two-digit years and named
//! or military zones).

use super::HeaderParser;

const DAY_NAMES: [&[u8; 3]; 7] = [b"MON", b"TUE", b"WED", b"THU", b"FRI", b"SAT", b"SUN"];

const MONTH_NAMES: [&[u8; 3]; 12] = [
    b"JAN", b"FEB", b"MAR", b"APR", b"MAY", b"JUN", b"JUL", b"AUG", b"SEP", b"OCT", b"NOV",
    b"DEC",
];

/// `obs-zone` names other than the single military letters.
const OBS_ZONES: [&str; 10] = [
    "UT", "GMT", "EST", "EDT", "CST", "CDT", "MST", "MDT", "PST", "PDT",
];

impl HeaderParser<'_> {
    /// `date-time = [ day-of-week "," ] date time [CFWS]`
    pub fn parse_date_time(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let mut i = index;
        let after_dow = self.parse_day_of_week(i);
        if after_dow != i {
            if self.is(after_dow, b',') {
                i = after_dow + 1;
            } else {
                return self.fail(index, checkpoint);
            }
        }
        let after_date = self.parse_date(i);
        if after_date == i {
            return self.fail(index, checkpoint);
        }
        let after_time = self.parse_time(after_date);
        if after_time == after_date {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(after_time)
    }

    /// `day-of-week = ([FWS] day-name) / obs-day-of-week`
    ///
    /// `obs-day-of-week = [CFWS] day-name [CFWS]`
    pub fn parse_day_of_week(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let end = self.parse_name3(start, &DAY_NAMES);
        if end == start {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(end)
    }

    /// `date = day month year`
    pub fn parse_date(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let after_day = self.parse_day(index);
        if after_day == index {
            return index;
        }
        let after_month = self.parse_name3(after_day, &MONTH_NAMES);
        if after_month == after_day {
            return self.fail(index, checkpoint);
        }
        let after_year = self.parse_year(after_month);
        if after_year == after_month {
            return self.fail(index, checkpoint);
        }
        after_year
    }

    /// `day = ([FWS] 1*2DIGIT FWS) / obs-day`
    ///
    /// `obs-day = [CFWS] 1*2DIGIT [CFWS]`
    pub fn parse_day(&mut self, index: usize) -> usize {
        self.digits_in_cfws(index, 1, 2)
    }

    /// `year = (FWS 4*DIGIT FWS) / obs-year`
    ///
    /// `obs-year = [CFWS] 2*DIGIT [CFWS]`
    pub fn parse_year(&mut self, index: usize) -> usize {
        self.digits_in_cfws(index, 2, usize::MAX)
    }

    /// `time = time-of-day zone`
    pub fn parse_time(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let after_tod = self.parse_time_of_day(index);
        if after_tod == index {
            return index;
        }
        let after_zone = self.parse_zone(after_tod);
        if after_zone == after_tod {
            return self.fail(index, checkpoint);
        }
        after_zone
    }

    /// `time-of-day = hour ":" minute [ ":" second ]`
    ///
    /// Each field may be wrapped in CFWS (`obs-hour` and friends).
    pub fn parse_time_of_day(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let after_hour = self.digits_in_cfws(index, 2, 2);
        if after_hour == index || !self.is(after_hour, b':') {
            return self.fail(index, checkpoint);
        }
        let after_minute = self.digits_in_cfws(after_hour + 1, 2, 2);
        if after_minute == after_hour + 1 {
            return self.fail(index, checkpoint);
        }
        if self.is(after_minute, b':') {
            let after_second = self.digits_in_cfws(after_minute + 1, 2, 2);
            if after_second == after_minute + 1 {
                return self.fail(index, checkpoint);
            }
            return after_second;
        }
        after_minute
    }

    /// `zone = (FWS ( "+" / "-" ) 4DIGIT) / obs-zone`
    pub fn parse_zone(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        if matches!(self.byte(start), Some(b'+' | b'-')) {
            let end = self.digits(start + 1, 4, 4);
            if end != start + 1 && !self.byte(end).is_some_and(|b| b.is_ascii_digit()) {
                return end;
            }
            return self.fail(index, checkpoint);
        }
        let end = self.keyword_from(start, &OBS_ZONES, |b| b.is_ascii_alphabetic());
        if end != start {
            return end;
        }
        // Military zones: any single letter except J.
        match self.byte(start) {
            Some(b)
                if b.is_ascii_alphabetic()
                    && !b.eq_ignore_ascii_case(&b'j')
                    && !self.byte(start + 1).is_some_and(|n| n.is_ascii_alphabetic()) =>
            {
                start + 1
            }
            _ => self.fail(index, checkpoint),
        }
    }

    /// Matches one of three-letter `names` case-insensitively.
    fn parse_name3(&self, index: usize, names: &[&[u8; 3]]) -> usize {
        let (Some(a), Some(b), Some(c)) =
            (self.byte(index), self.byte(index + 1), self.byte(index + 2))
        else {
            return index;
        };
        let folded = [a & !0x20, b & !0x20, c & !0x20];
        if names.iter().any(|name| **name == folded) {
            index + 3
        } else {
            index
        }
    }

    /// `[CFWS] min*max DIGIT [CFWS]`
    fn digits_in_cfws(&mut self, index: usize, min: usize, max: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let end = self.digits(start, min, max);
        if end == start || self.byte(end).is_some_and(|b| b.is_ascii_digit()) {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(end)
    }
}
