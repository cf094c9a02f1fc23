//! Reading, writing and rescaling of SRT timestamps.
//!
//! A timing line has the shape `HH:MM:SS,mmm --> HH:MM:SS,mmm`, optionally
//! followed by positioning hints. Digit groups are taken positionally, so
//! values such as `00:75:00,000` are accepted as-is.

use std::time::Duration;

use nom::bytes::complete::{tag, take_while, take_while_m_n};
use nom::character::complete::{char, satisfy};
use nom::combinator::{map_res, recognize};
use nom::error::{convert_error, VerboseError};
use nom::sequence::tuple;
use nom::{Err, IResult};

type ParseResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// The contents of a timing line.
#[derive(Debug, PartialEq)]
pub struct Timing {
    pub show_at: Duration,
    pub hide_at: Duration,
    pub position: Option<String>,
}

/// Parses a full timing line. On failure, returns a human-readable
/// description of where the line deviates from the expected shape.
pub fn parse_timing(line: &str) -> Result<Timing, String> {
    match timing_line(line) {
        Ok((_, timing)) => Ok(timing),
        Err(Err::Error(err)) | Err(Err::Failure(err)) => Err(convert_error(line, err)),
        Err(Err::Incomplete(_)) => {
            unreachable!("Incomplete data received by non-streaming parser.")
        }
    }
}

/// Renders a timestamp as `HH:MM:SS,mmm`. Hours keep counting past 99.
pub fn format(timestamp: Duration) -> String {
    let total_secs = timestamp.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = timestamp.subsec_millis();
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Scales a timestamp by `fps_in / fps_out`, truncating to whole nanoseconds.
pub fn rescale(timestamp: Duration, fps_in: f64, fps_out: f64) -> Duration {
    let coeff = fps_in / fps_out;
    let nanos = timestamp.as_nanos() as f64 * coeff;
    Duration::from_nanos(nanos as u64)
}

fn timing_line(input: &str) -> ParseResult<Timing> {
    let (input, _) = take_while(|c: char| c.is_ascii_whitespace())(input)?;
    let (input, show_at) = timestamp(input)?;
    let (input, _) = arrow(input)?;
    let (input, hide_at) = timestamp(input)?;
    let (rest, _) = take_while(|c: char| c.is_ascii_whitespace())(input)?;

    let position = if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    };

    Ok((
        "",
        Timing {
            show_at,
            hide_at,
            position,
        },
    ))
}

fn arrow(input: &str) -> ParseResult<&str> {
    recognize(tuple((ascii_whitespace, tag("-->"), ascii_whitespace)))(input)
}

fn ascii_whitespace(input: &str) -> ParseResult<char> {
    satisfy(|c: char| c.is_ascii_whitespace())(input)
}

fn timestamp(input: &str) -> ParseResult<Duration> {
    let (input, hours) = digits(2)(input)?;
    let (input, _) = char(':')(input)?;
    let (input, minutes) = digits(2)(input)?;
    let (input, _) = char(':')(input)?;
    let (input, seconds) = digits(2)(input)?;
    let (input, _) = char(',')(input)?;
    let (input, millis) = digits(3)(input)?;

    Ok((
        input,
        Duration::from_millis(
            millis + seconds * 1000 + minutes * 60 * 1000 + hours * 60 * 60 * 1000,
        ),
    ))
}

fn digits<'a>(count: usize) -> impl FnMut(&'a str) -> ParseResult<'a, u64> {
    map_res(
        take_while_m_n(count, count, |c: char| c.is_ascii_digit()),
        |s: &str| s.parse::<u64>(),
    )
}
