use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    io,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GribError {
    InternalDataError,
    ParseError(ParseError),
    InvalidValueError(String),
    OperationError(String),
}

impl Error for GribError {}

impl From<ParseError> for GribError {
    fn from(e: ParseError) -> Self {
        Self::ParseError(e)
    }
}

impl Display for GribError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::InternalDataError => write!(f, "Something unexpected happened"),
            Self::ParseError(e) => write!(f, "{e}"),
            Self::InvalidValueError(s) => write!(f, "Invalid value: {s}"),
            Self::OperationError(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParseError {
    ReadError(String),
    UnexpectedEndOfData(usize),
    TruncatedSection { offset: usize, length: usize },
    UnsupportedTemplate(u16),
    InvalidOctetCount(usize),
}

impl Error for ParseError {}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::ReadError(s) => write!(f, "Read error: {s}"),
            Self::UnexpectedEndOfData(i) => write!(f, "Unexpected end of data at {i}"),
            Self::TruncatedSection { offset, length } => {
                write!(f, "Section at {offset} too short for claimed length {length}")
            }
            Self::UnsupportedTemplate(n) => {
                write!(f, "Product definition template {n} is not supported")
            }
            Self::InvalidOctetCount(n) => write!(f, "Cannot read an integer of {n} octets"),
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        Self::ReadError(e.to_string())
    }
}

impl From<BuildError> for ParseError {
    fn from(e: BuildError) -> Self {
        Self::ReadError(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuildError {
    SectionSizeTooSmall(usize),
}

impl Error for BuildError {}

impl Display for BuildError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::SectionSizeTooSmall(i) => write!(f, "Section size is too small: {i}"),
        }
    }
}
