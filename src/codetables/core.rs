use num_enum::{TryFromPrimitive, TryFromPrimitiveError};

/// A code-table entry: either a known name from the table or, when the table
/// has no entry for the octet value, the raw number itself. Keeping the raw
/// number lets records with unrecognized codes survive decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code<Enum, N> {
    Name(Enum),
    Num(N),
}

pub use Code::{Name, Num};

impl<Enum, N> From<Result<Enum, TryFromPrimitiveError<Enum>>> for Code<Enum, N>
where
    Enum: TryFromPrimitive<Primitive = N>,
{
    fn from(result: Result<Enum, TryFromPrimitiveError<Enum>>) -> Self {
        match result {
            Ok(e) => Self::Name(e),
            Err(TryFromPrimitiveError { number: n }) => Self::Num(n),
        }
    }
}

impl<Enum, N> Code<Enum, N>
where
    Enum: Into<N> + Copy,
    N: Copy,
{
    /// The raw octet value, whether or not the table knows it.
    pub fn as_num(&self) -> N {
        match self {
            Self::Name(e) => (*e).into(),
            Self::Num(n) => *n,
        }
    }
}
