use std::io::Write;

use crate::domain::aggregate::Emitted;
use crate::error::Error;

/// Writes emitted identities one per line, flushing each so output streams
/// while the walk is still running.
pub struct LineWriter<W> {
    out: W,
    json: bool,
}

impl<W: Write> LineWriter<W> {
    pub fn new(out: W, json: bool) -> Self {
        Self { out, json }
    }

    pub fn write(&mut self, line: &Emitted) -> Result<(), Error> {
        if self.json {
            serde_json::to_writer(&mut self.out, line).map_err(std::io::Error::from)?;
            writeln!(self.out)?;
        } else {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}
