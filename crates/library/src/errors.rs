use thiserror::Error;

pub type MathResult<T = ()> = std::result::Result<T, MathError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("arithmetic overflow or underflow")]
    Overflow,

    #[error("division by zero")]
    DivisionByZero,

    #[error("numeric cast out of range")]
    CastOutOfRange,
}
