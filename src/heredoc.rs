use std::io::{self, BufRead, Write};
use log::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeredocBody {
    pub text: String,
    /// The size cap that stopped collection, if it was hit.
    pub truncated_at: Option<usize>,
}

/// Reads one raw line and strips its newline. Bytes that are not UTF-8 are
/// replaced rather than failing the read. `Ok(None)` means end of input.
pub fn read_raw_line<R: BufRead + ?Sized>(input: &mut R) -> io::Result<Option<String>> {
    let mut buf = Vec::new();
    if input.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Supplies here-document bodies to the command builder.
pub trait HeredocSource {
    fn collect(&mut self, delimiter: &str) -> HeredocBody;
}

/// Source for callers that never expect a here-document; every body is empty.
pub struct NoHeredoc;

impl HeredocSource for NoHeredoc {
    fn collect(&mut self, delimiter: &str) -> HeredocBody {
        debug!("heredoc '{}' requested with no input attached", delimiter);
        HeredocBody::default()
    }
}

/// Reads here-document lines from `input`, prompting on `output` before each.
pub struct HeredocCollector<R, W> {
    input: R,
    output: W,
    prompt: String,
    max_size: usize,
}

impl<R: BufRead, W: Write> HeredocCollector<R, W> {
    pub fn new(input: R, output: W, prompt: &str, max_size: usize) -> Self {
        HeredocCollector {
            input,
            output,
            prompt: prompt.to_string(),
            max_size,
        }
    }

    fn show_prompt(&mut self) {
        // A broken prompt stream must not stop the read.
        let _ = write!(self.output, "{}", self.prompt);
        let _ = self.output.flush();
    }

    fn read_line(&mut self) -> Option<String> {
        match read_raw_line(&mut self.input) {
            Ok(line) => line,
            Err(e) => {
                debug!("heredoc read failed: {}", e);
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> HeredocSource for HeredocCollector<R, W> {
    /// Accumulates lines until one equals `delimiter` exactly or input ends.
    /// The delimiter line is consumed but not included.
    fn collect(&mut self, delimiter: &str) -> HeredocBody {
        let mut body = HeredocBody::default();

        loop {
            self.show_prompt();
            let Some(line) = self.read_line() else {
                debug!("end of input before heredoc delimiter '{}'", delimiter);
                break;
            };
            if line == delimiter {
                break;
            }
            if body.text.len() + line.len() + 1 > self.max_size {
                debug!("heredoc exceeds {} bytes, stopping", self.max_size);
                body.truncated_at = Some(self.max_size);
                break;
            }
            body.text.push_str(&line);
            body.text.push('\n');
        }

        body
    }
}
