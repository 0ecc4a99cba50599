use std::{
    fmt::{self, Display, Formatter},
    io::{stderr, Write},
};

use itertools::Itertools;

pub use cursor::Line;

/// Where on its line a diagnostic points to.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Nowhere,
    AtEnd,
    At(String),
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Location::Nowhere => Ok(()),
            Location::AtEnd => write!(f, " at end"),
            Location::At(lexeme) => write!(f, " at '{lexeme}'"),
        }
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("[line {line}] Error{location}: {message}")]
pub struct Diagnostic {
    pub line: Line,
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: Line, location: Location, message: impl Into<String>) -> Self {
        Self { line, location, message: message.into() }
    }
}

/// Collects the diagnostics of a run and remembers whether any error occurred since the last
/// [`Diagnostics::reset`].
#[derive(Default)]
pub struct Diagnostics {
    reported: Vec<Diagnostic>,
    had_error: bool,
    output: Option<Box<dyn Write>>,
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("reported", &self.reported)
            .field("had_error", &self.had_error)
            .finish()
    }
}

impl Diagnostics {
    /// Echoes every report to standard error as it happens.
    pub fn stderr() -> Self {
        Self::with_output(stderr())
    }

    pub fn with_output(output: impl Write + 'static) -> Self {
        Self { output: Some(Box::new(output)), ..Default::default() }
    }

    pub fn report(&mut self, diagnostic: impl Into<Diagnostic>) {
        let diagnostic = diagnostic.into();
        log::debug!("Reporting {diagnostic:?}");

        if let Some(output) = &mut self.output {
            if let Err(e) = writeln!(output, "{diagnostic}") {
                log::warn!("Failed to write diagnostic: {e}");
            }
        }

        self.had_error = true;
        self.reported.push(diagnostic);
    }

    /// Reports an error that isn't tied to a specific token.
    pub fn error(&mut self, line: Line, message: impl Into<String>) {
        self.report(Diagnostic::new(line, Location::Nowhere, message));
    }

    pub fn has_error(&self) -> bool {
        self.had_error
    }

    pub fn reset(&mut self) {
        self.had_error = false;
        self.reported.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.reported.iter()
    }

    pub fn len(&self) -> usize {
        self.reported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reported.iter().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, io, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn format() {
        assert_eq!(
            Diagnostic::new(Line(1), Location::Nowhere, "Unexpected character.").to_string(),
            "[line 1] Error: Unexpected character."
        );
        assert_eq!(
            Diagnostic::new(Line(3), Location::AtEnd, "Expect expression.").to_string(),
            "[line 3] Error at end: Expect expression."
        );
        assert_eq!(
            Diagnostic::new(Line(2), Location::At(")".to_string()), "Expect expression.")
                .to_string(),
            "[line 2] Error at ')': Expect expression."
        );
    }

    #[test]
    fn report_and_reset() {
        let mut diagnostics = Diagnostics::default();
        assert!(!diagnostics.has_error());

        diagnostics.error(Line(1), "Unexpected character.");
        diagnostics.error(Line(2), "Unterminated string");
        assert!(diagnostics.has_error());
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics.to_string(),
            "[line 1] Error: Unexpected character.\n[line 2] Error: Unterminated string"
        );

        diagnostics.reset();
        assert!(!diagnostics.has_error());
        assert!(diagnostics.is_empty());
        assert_eq!(diagnostics.to_string(), "");
    }

    #[test]
    fn echoes_to_output() {
        let buffer = SharedBuffer::default();
        let mut diagnostics = Diagnostics::with_output(buffer.clone());

        diagnostics.error(Line(4), "Unexpected character.");
        diagnostics.report(Diagnostic::new(Line(5), Location::AtEnd, "Expect expression."));

        assert_eq!(
            String::from_utf8(buffer.0.borrow().clone()).unwrap(),
            "[line 4] Error: Unexpected character.\n[line 5] Error at end: Expect expression.\n"
        );
    }
}
