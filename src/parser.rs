use crate::error::StretchError;
use crate::srt::Subtitle;
use crate::timestamp;

use std::io::{BufRead, Lines};
use std::iter::FusedIterator;

/// Reads subtitles one block at a time from a line-oriented source.
///
/// Once the input is exhausted, or a block fails to parse, the parser
/// yields nothing further.
pub struct Parser<R> {
    lines: Lines<R>,
    line_no: usize,
    finished: bool,
}

impl<R: BufRead> Parser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            finished: false,
        }
    }

    /// Reads the next block. `Ok(None)` means the input ended cleanly
    /// before any further block content.
    pub fn read_block(&mut self) -> Result<Option<Subtitle>, StretchError> {
        let index_line = loop {
            match self.next_line()? {
                None => return Ok(None),
                Some(line) if line.is_empty() => continue,
                Some(line) => break line,
            }
        };

        let line = self.line_no;
        let sequence_number = index_line
            .parse::<usize>()
            .map_err(|_| StretchError::MalformedIndex {
                line,
                value: index_line.clone(),
            })?;

        let timing_line = self
            .next_line()?
            .ok_or_else(|| StretchError::MalformedTimestamp {
                line: line + 1,
                reason: "unexpected end of input, expected a timing line".to_string(),
            })?;
        let line = self.line_no;
        let timing = timestamp::parse_timing(&timing_line)
            .map_err(|reason| StretchError::MalformedTimestamp { line, reason })?;

        let mut text = Vec::new();
        while let Some(line) = self.next_line()? {
            if line.is_empty() {
                break;
            }
            text.push(line);
        }

        Ok(Some(Subtitle {
            sequence_number,
            show_at: timing.show_at,
            hide_at: timing.hide_at,
            position: timing.position,
            text,
        }))
    }

    fn next_line(&mut self) -> Result<Option<String>, StretchError> {
        match self.lines.next() {
            Some(line) => {
                self.line_no += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }
}

impl<R: BufRead> Iterator for Parser<R> {
    type Item = Result<Subtitle, StretchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_block() {
            Ok(Some(sub)) => Some(Ok(sub)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: BufRead> FusedIterator for Parser<R> {}
