use std::{
    error::Error,
    fmt::{self, Debug, Display, Formatter},
};
use tracing::error;

/// Failure categories of the dataset store and the extractor. Every error
/// carries exactly one of these.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum ErrorKind {
    /// A pattern matched nothing or a matched file could not be read/decoded.
    Load,
    /// A box record file contained a malformed record.
    Parse,
    /// An accessor was used before the corresponding load call succeeded.
    NotLoaded,
    /// An image ID outside the loaded range.
    Index,
    /// Image and mask of the same ID differ in size.
    DimensionMismatch,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let s = match self {
            ErrorKind::Load => "load",
            ErrorKind::Parse => "parse",
            ErrorKind::NotLoaded => "not-loaded",
            ErrorKind::Index => "index",
            ErrorKind::DimensionMismatch => "dimension-mismatch",
        };
        write!(f, "{s}")
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct HvError {
    kind: ErrorKind,
    msg: String,
}
impl HvError {
    pub fn new(kind: ErrorKind, msg: &str) -> HvError {
        HvError {
            kind,
            msg: msg.to_string(),
        }
    }
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
    pub fn msg(&self) -> &str {
        &self.msg
    }
}
impl Display for HvError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.msg)
    }
}
impl Error for HvError {}

/// Handview's result type with [`HvError`](HvError) as error type.
pub type HvResult<U> = Result<U, HvError>;

pub fn trace_ok_err<T, E>(x: Result<T, E>) -> Option<T>
where
    E: Debug,
{
    match x {
        Ok(x) => Some(x),
        Err(e) => {
            error!("{e:?}");
            None
        }
    }
}

/// Creates an [`HvError`](HvError) of the given kind with a formatted message.
/// ```rust
/// # use std::error::Error;
/// use hvlib::{hverr, result::{ErrorKind, HvError}};
/// # fn main() -> Result<(), Box<dyn Error>> {
/// assert_eq!(
///     hverr!(ErrorKind::Load, "no match for {}", 1),
///     HvError::new(ErrorKind::Load, format!("no match for {}", 1).as_str())
/// );
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! hverr {
    ($kind:expr, $s:literal) => {
        $crate::result::HvError::new($kind, format!($s).as_str())
    };
    ($kind:expr, $s:literal, $( $exps:expr ),*) => {
        $crate::result::HvError::new($kind, format!($s, $($exps,)*).as_str())
    }
}

pub fn to_hv<E: Debug>(kind: ErrorKind) -> impl Fn(E) -> HvError {
    move |e| {
        hverr!(
            kind,
            "original error type is '{:?}', error message is '{:?}'",
            std::any::type_name::<E>(),
            e
        )
    }
}
