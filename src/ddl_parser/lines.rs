use std::io::BufRead;

/// Feed every line of `reader` to `f` as raw bytes, without its `\n` or `\r\n`.
///
/// Bytes are passed through untouched, so input that is not UTF-8 is accepted.
pub fn for_each_raw_line<R, F>(mut reader: R, mut f: F) -> std::io::Result<()>
where
    R: BufRead,
    F: FnMut(&[u8]),
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        f(strip_line_ending(&buf));
    }
}

pub fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
