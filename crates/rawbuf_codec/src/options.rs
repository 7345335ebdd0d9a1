//! Base64 encoding and decoding options.

/// Line length for wrapped Base64 output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineLength {
    /// 64 symbols per line (PEM).
    Columns64,
    /// 76 symbols per line (MIME).
    Columns76,
}

impl LineLength {
    /// Returns the number of symbols per line.
    #[must_use]
    pub const fn symbols(self) -> usize {
        match self {
            Self::Columns64 => 64,
            Self::Columns76 => 76,
        }
    }

    /// Returns the line length for a symbol count, if supported.
    #[must_use]
    pub const fn from_symbols(symbols: usize) -> Option<Self> {
        match symbols {
            64 => Some(Self::Columns64),
            76 => Some(Self::Columns76),
            _ => None,
        }
    }
}

/// Options for Base64 encoding.
///
/// By default output is a single unwrapped line. Terminator flags only take
/// effect together with a line length; with a line length and neither flag
/// set, lines end in `\r\n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Base64EncodingOptions {
    /// Wrap output every this many symbols.
    pub line_length: Option<LineLength>,

    /// End lines with a carriage return.
    pub carriage_return: bool,

    /// End lines with a line feed.
    pub line_feed: bool,
}

impl Base64EncodingOptions {
    /// Creates options for unwrapped output.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            line_length: None,
            carriage_return: false,
            line_feed: false,
        }
    }

    /// Sets the line length.
    #[must_use]
    pub const fn line_length(mut self, length: LineLength) -> Self {
        self.line_length = Some(length);
        self
    }

    /// Sets whether lines end with a carriage return.
    #[must_use]
    pub const fn carriage_return(mut self, value: bool) -> Self {
        self.carriage_return = value;
        self
    }

    /// Sets whether lines end with a line feed.
    #[must_use]
    pub const fn line_feed(mut self, value: bool) -> Self {
        self.line_feed = value;
        self
    }

    /// Returns the bytes written after each full line.
    #[must_use]
    pub const fn terminator(&self) -> &'static [u8] {
        match (self.carriage_return, self.line_feed) {
            (true, false) => b"\r",
            (false, true) => b"\n",
            _ => b"\r\n",
        }
    }
}

/// Options for Base64 decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Base64DecodingOptions {
    /// Skip bytes outside the alphabet instead of failing.
    pub ignore_unknown_characters: bool,
}

impl Base64DecodingOptions {
    /// Creates strict decoding options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ignore_unknown_characters: false,
        }
    }

    /// Sets whether unknown characters are skipped.
    #[must_use]
    pub const fn ignore_unknown_characters(mut self, value: bool) -> Self {
        self.ignore_unknown_characters = value;
        self
    }
}
