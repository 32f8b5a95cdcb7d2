use crate::context::ProgramId;
use crate::templates::StateKind;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Backend ran out of resources while creating {:?} object.", _0)]
    OutOfResources(StateKind),
    #[fail(display = "Context lost: {}", _0)]
    ContextLost(String),
    #[fail(display = "{} is invalid.", _0)]
    ProgramInvalid(ProgramId),
    #[fail(display = "Backend: {}", _0)]
    Backend(String),
}

impl Error {
    /// Returns true if this error leaves the context usable for the next frame.
    pub fn is_recoverable(&self) -> bool {
        match *self {
            Error::OutOfResources(_) => true,
            Error::ProgramInvalid(_) => true,
            Error::ContextLost(_) | Error::Backend(_) => false,
        }
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;
