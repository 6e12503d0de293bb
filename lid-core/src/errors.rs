/// Basic Error types.
#[derive(Debug)]
pub enum LidError {
    /// IoError from the std library.
    StdIoError(std::io::Error),
    /// The file is shorter than the structure it claims to have.
    ShortRead { have: usize, need: usize },
    /// A tagged region is malformed: missing markers, non-ASCII tag, truncated
    /// HSS record, or a length byte which is not a hex digit.
    BadHeader { msg: String },
    /// A required mini-header field is absent.
    MissingField { tag: &'static str },
    /// `TRI`/`ORI`/`BMN`/`BMR` are not a usable combination, or a settings
    /// override asks for an unsupported mode.
    InvalidConfig { msg: String },
    /// A `CLK` field does not match `YYYY-MM-DD HH:MM:SS`.
    BadClock { value: String },
    /// An error which occurred while decoding a specific data page.
    PageError {
        page: usize,
        offset: u64,
        source: Box<LidError>,
    },
}

impl From<std::io::Error> for LidError {
    fn from(e: std::io::Error) -> Self {
        Self::StdIoError(e)
    }
}

impl LidError {
    /// Wraps this error with the page index and file offset at which it occurred.
    pub fn at_page(self, page: usize, offset: u64) -> Self {
        Self::PageError {
            page,
            offset,
            source: Box::new(self),
        }
    }
}

impl std::fmt::Display for LidError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use self::LidError::*;
        match self {
            StdIoError(x) => write!(fmt, "{}", x),
            ShortRead { have, need } => write!(
                fmt,
                "input is too short (have {} bytes, need at least {})",
                have, need
            ),
            BadHeader { msg } => write!(fmt, "malformed header: {}", msg),
            MissingField { tag } => write!(fmt, "required field {} is missing", tag),
            InvalidConfig { msg } => write!(fmt, "invalid configuration: {}", msg),
            BadClock { value } => write!(fmt, "could not parse clock value {:?}", value),
            PageError {
                page,
                offset,
                source,
            } => write!(
                fmt,
                "page {} (byte offset {}): {}",
                page, offset, source
            ),
        }
    }
}

impl From<LidError> for String {
    fn from(e: LidError) -> String {
        e.to_string()
    }
}

impl std::error::Error for LidError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use self::LidError::*;
        match self {
            StdIoError(x) => x.source(),
            PageError { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
