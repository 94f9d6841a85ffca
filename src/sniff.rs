//! Guess the delimiter and quote character of a delimited text file from a
//! short sample of its beginning.

use std::borrow::Cow;

/// number of bytes read from the start of a file for [sniff]
pub const SAMPLE_SIZE: usize = 1024;

/// candidate delimiters, in order of preference when several fit the sample
const DELIMITERS: [u8; 6] = [b',', b'\t', b';', b'|', b':', b' '];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: u8,

    /// spaces right after a delimiter are padding, not part of the next field
    pub skip_initial_space: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            skip_initial_space: false,
        }
    }
}

impl Dialect {
    pub fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut b = csv::ReaderBuilder::new();
        b.delimiter(self.delimiter)
            .quote(self.quote)
            .has_headers(false)
            .flexible(true);
        b
    }

    /// drop the spaces following each delimiter outside of quotes when
    /// `skip_initial_space` is set, so that a quote after the padding still
    /// opens a quoted field
    pub fn normalize<'a>(&self, data: &'a [u8]) -> Cow<'a, [u8]> {
        if !self.skip_initial_space {
            return Cow::Borrowed(data);
        }
        let mut ret = Vec::with_capacity(data.len());
        let mut quoted = false;
        let mut padding = false;
        for &b in data {
            if padding && b == b' ' {
                continue;
            }
            padding = false;
            if b == self.quote {
                quoted = !quoted;
            } else if b == self.delimiter && !quoted {
                padding = true;
            }
            ret.push(b);
        }
        Cow::Owned(ret)
    }
}

/// pick the delimiter that occurs the same, non-zero number of times outside of
/// quotes on every line of `sample`. falls back to [Dialect::default] when no
/// candidate fits, which is always the case for single-column files.
///
/// initial spaces are skipped when most of the chosen delimiters are followed
/// by a space
pub fn sniff(sample: &[u8]) -> Dialect {
    let mut lines: Vec<&[u8]> = sample
        .split(|&b| b == b'\n')
        .map(|l| l.strip_suffix(b"\r").unwrap_or(l))
        .collect();
    // the last line may have been cut off by the sample boundary
    if sample.len() >= SAMPLE_SIZE && lines.len() > 1 {
        lines.pop();
    }
    lines.retain(|l| !l.iter().all(u8::is_ascii_whitespace));

    let mut ret = Dialect::default();
    if !wraps(&lines, b'"') && wraps(&lines, b'\'') {
        ret.quote = b'\'';
    }

    if lines.is_empty() {
        return ret;
    }

    for d in DELIMITERS {
        let first = count_outside(lines[0], d, ret.quote);
        if first > 0
            && lines[1..]
                .iter()
                .all(|l| count_outside(l, d, ret.quote) == first)
        {
            ret.delimiter = d;
            ret.skip_initial_space = d != b' ' && spaced(&lines, d, ret.quote);
            break;
        }
    }
    ret
}

/// positions of `delim` in `line` that are not between quotes
fn outside(
    line: &[u8],
    delim: u8,
    quote: u8,
) -> impl Iterator<Item = usize> + '_ {
    let mut quoted = false;
    line.iter().enumerate().filter_map(move |(i, &b)| {
        if b == quote {
            quoted = !quoted;
        }
        (b == delim && !quoted).then_some(i)
    })
}

fn count_outside(line: &[u8], delim: u8, quote: u8) -> usize {
    outside(line, delim, quote).count()
}

fn spaced(lines: &[&[u8]], delim: u8, quote: u8) -> bool {
    let (mut total, mut padded) = (0, 0);
    for line in lines {
        for i in outside(line, delim, quote) {
            total += 1;
            if line.get(i + 1) == Some(&b' ') {
                padded += 1;
            }
        }
    }
    2 * padded > total
}

/// reports whether `quote` appears around at least one field, opening at the
/// start of a line or after a possible delimiter and closing at the end of a
/// line or before one
fn wraps(lines: &[&[u8]], quote: u8) -> bool {
    let boundary =
        |b: Option<&u8>| b.map_or(true, |b| DELIMITERS.contains(b));
    lines.iter().any(|line| {
        let pos: Vec<usize> = line
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| (b == quote).then_some(i))
            .collect();
        pos.windows(2).any(|w| {
            let (open, close) = (w[0], w[1]);
            let before = open.checked_sub(1).and_then(|i| line.get(i));
            boundary(before) && boundary(line.get(close + 1))
        })
    })
}
