use crate::error::StretchError;
use crate::srt::Subtitle;
use crate::timestamp;

use std::io::Write;

const CRLF: &str = "\r\n";

/// Writes a single block. The blank line separating it from the next
/// block is left to the caller.
pub fn write_sub<W: Write>(buf: &mut W, sub: &Subtitle) -> Result<(), StretchError> {
    write!(buf, "{}{}", sub.sequence_number, CRLF)?;
    write!(
        buf,
        "{} --> {}",
        timestamp::format(sub.show_at),
        timestamp::format(sub.hide_at)
    )?;
    if let Some(position) = &sub.position {
        write!(buf, " {}", position)?;
    }
    buf.write_all(CRLF.as_bytes())?;
    for line in &sub.text {
        write!(buf, "{}{}", line, CRLF)?;
    }
    Ok(())
}

pub fn write_separator<W: Write>(buf: &mut W) -> Result<(), StretchError> {
    buf.write_all(CRLF.as_bytes())?;
    Ok(())
}
