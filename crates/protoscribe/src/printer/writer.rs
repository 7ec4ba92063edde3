//! Indentation-aware line writer.

use std::fmt::{Arguments, Result, Write};

/// Accumulates output lines at a current nesting depth.
///
/// Each structural body (message, enum, service, oneof, extend) is entered
/// with [`open`](Self::open) and left with [`close`](Self::close), which keeps
/// the depth balanced across the recursive descent.
pub(crate) struct IndentWriter<'a, W: Write> {
    out: &'a mut W,
    indent: &'a str,
    depth: usize,
}

impl<'a, W: Write> IndentWriter<'a, W> {
    pub(crate) fn new(out: &'a mut W, indent: &'a str) -> Self {
        Self {
            out,
            indent,
            depth: 0,
        }
    }

    pub(crate) fn indent(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn write_indent(&mut self) -> Result {
        for _ in 0..self.depth {
            self.out.write_str(self.indent)?;
        }
        Ok(())
    }

    /// Writes one indented, newline-terminated line
    pub(crate) fn line(&mut self, args: Arguments<'_>) -> Result {
        self.write_indent()?;
        self.out.write_fmt(args)?;
        self.out.write_char('\n')
    }

    /// Writes an empty line, never indented
    pub(crate) fn blank(&mut self) -> Result {
        self.out.write_char('\n')
    }

    /// Writes an opening line and enters its body
    pub(crate) fn open(&mut self, args: Arguments<'_>) -> Result {
        self.line(args)?;
        self.indent();
        Ok(())
    }

    /// Leaves the current body and writes its closing brace
    pub(crate) fn close(&mut self) -> Result {
        self.dedent();
        self.line(format_args!("}}"))
    }
}
