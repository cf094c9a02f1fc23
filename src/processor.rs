use crate::error::StretchError;
use crate::parser::Parser;
use crate::serialiser;

use std::io::{self, BufReader, Read, Write};

use tracing::{debug, info, warn};

const BOM: &[u8] = b"\xEF\xBB\xBF";

pub struct StretchOpts {
    pub fps_in: f64,
    pub fps_out: f64,
}

#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub blocks: usize,
    pub had_bom: bool,
}

/// Streams subtitles from `input` to `output`, rescaling every block.
///
/// Blocks are written as soon as they are read. On failure, whatever was
/// written up to that point is left in `output`.
pub fn process<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    opts: &StretchOpts,
) -> Result<Summary, StretchError> {
    let mut summary = Summary::default();

    let mut head = [0u8; 3];
    let filled = read_head(&mut input, &mut head)?;
    let leftover: &[u8] = if head[..filled] == *BOM {
        output.write_all(BOM)?;
        summary.had_bom = true;
        debug!("Copied byte order mark");
        &[]
    } else {
        &head[..filled]
    };
    let reader = BufReader::new(leftover.chain(input));

    for sub in Parser::new(reader) {
        let mut sub = sub?;
        sub.stretch(opts.fps_in, opts.fps_out);
        if sub.hide_at < sub.show_at {
            warn!(
                "Subtitle {} ends before it starts; writing it unchanged",
                sub.sequence_number
            );
        }
        debug!(
            "Subtitle {}: {:?} -> {:?}",
            sub.sequence_number, sub.show_at, sub.hide_at
        );
        serialiser::write_sub(&mut output, &sub)?;
        serialiser::write_separator(&mut output)?;
        summary.blocks += 1;
    }

    output.flush()?;
    info!(
        "Stretched {} subtitles from {} fps to {} fps (byte order mark: {})",
        summary.blocks, opts.fps_in, opts.fps_out, summary.had_bom
    );
    Ok(summary)
}

/// Fills `head` from `input`, stopping early only at end of input.
fn read_head<R: Read>(input: &mut R, head: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < head.len() {
        match input.read(&mut head[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRT_INPUT: &str = "1\r\n00:00:23,065 --> 00:00:25,363\r\nJennifer, this is Carrie\r\nMathison and Peter Quinn.\r\n\r\n\r\n2\r\n00:00:25,442 --> 00:00:28,116  X1:63 X2:223 Y1:43 Y2:58\r\nThey were there with Sandy\r\nwhen it happened.\r\n";

    const SRT_OUTPUT: &str = "1\r\n00:00:23,065 --> 00:00:25,363\r\nJennifer, this is Carrie\r\nMathison and Peter Quinn.\r\n\r\n2\r\n00:00:25,442 --> 00:00:28,116 X1:63 X2:223 Y1:43 Y2:58\r\nThey were there with Sandy\r\nwhen it happened.\r\n\r\n";

    fn run(input: &[u8], fps_in: f64, fps_out: f64) -> (Result<Summary, StretchError>, Vec<u8>) {
        let mut output = Vec::new();
        let opts = StretchOpts { fps_in, fps_out };
        let result = process(input, &mut output, &opts);
        (result, output)
    }

    #[test]
    fn equal_rates_reproduce_the_file() {
        let (result, output) = run(SRT_INPUT.as_bytes(), 25.0, 25.0);

        assert_eq!(
            result.unwrap(),
            Summary {
                blocks: 2,
                had_bom: false
            }
        );
        assert_eq!(String::from_utf8(output).unwrap(), SRT_OUTPUT);
    }

    #[test]
    fn bom_is_copied_first() {
        let mut input = BOM.to_vec();
        input.extend_from_slice(SRT_INPUT.as_bytes());

        let (result, output) = run(&input, 25.0, 25.0);

        assert!(result.unwrap().had_bom);
        assert!(output.starts_with(BOM));
        assert_eq!(&output[BOM.len()..], SRT_OUTPUT.as_bytes());
    }

    struct OneByteReader<'a>(&'a [u8]);

    impl Read for OneByteReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[0];
            self.0 = &self.0[1..];
            Ok(1)
        }
    }

    #[test]
    fn bom_is_found_across_short_reads() {
        let mut input = BOM.to_vec();
        input.extend_from_slice(SRT_INPUT.as_bytes());
        let mut output = Vec::new();
        let opts = StretchOpts {
            fps_in: 25.0,
            fps_out: 25.0,
        };

        let summary = process(OneByteReader(&input), &mut output, &opts).unwrap();

        assert_eq!(
            summary,
            Summary {
                blocks: 2,
                had_bom: true
            }
        );
        assert!(output.starts_with(BOM));
        assert_eq!(&output[BOM.len()..], SRT_OUTPUT.as_bytes());
    }

    #[test]
    fn short_reads_without_bom_keep_every_byte() {
        let mut output = Vec::new();
        let opts = StretchOpts {
            fps_in: 25.0,
            fps_out: 25.0,
        };

        let summary = process(OneByteReader(SRT_INPUT.as_bytes()), &mut output, &opts).unwrap();

        assert_eq!(summary.blocks, 2);
        assert!(!summary.had_bom);
        assert_eq!(String::from_utf8(output).unwrap(), SRT_OUTPUT);
    }

    #[test]
    fn timestamps_are_stretched() {
        let input = "1\r\n00:00:23,065 --> 00:00:25,363\r\nHello\r\n";

        let (result, output) = run(input.as_bytes(), 23.967, 25.0);

        assert_eq!(result.unwrap().blocks, 1);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "1\r\n00:00:22,111 --> 00:00:24,315\r\nHello\r\n\r\n"
        );
    }

    #[test]
    fn empty_input_writes_nothing() {
        let (result, output) = run(b"", 24.0, 25.0);

        assert_eq!(result.unwrap().blocks, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn short_input_without_bom() {
        let (result, output) = run(b"\r\n", 24.0, 25.0);

        assert_eq!(result.unwrap(), Summary::default());
        assert!(output.is_empty());
    }

    #[test]
    fn failure_keeps_earlier_output() {
        let input = "1\r\n00:00:01,000 --> 00:00:02,000\r\nA\r\n\r\nxyz\r\n";

        let (result, output) = run(input.as_bytes(), 25.0, 25.0);

        assert!(matches!(result, Err(StretchError::MalformedIndex { .. })));
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "1\r\n00:00:01,000 --> 00:00:02,000\r\nA\r\n\r\n"
        );
    }
}
