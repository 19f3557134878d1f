use std::convert::TryInto;
use std::panic::Location;

use primitive_types::U256;
use tracing::debug;

use crate::errors::{MathError, MathResult};

pub trait Cast: Sized {
    #[track_caller]
    #[inline(always)]
    fn cast<T: std::convert::TryFrom<Self>>(self) -> MathResult<T> {
        match self.try_into() {
            Ok(result) => Ok(result),
            Err(_) => {
                let caller = Location::caller();
                debug!("casting error at {}:{}", caller.file(), caller.line());
                Err(MathError::CastOutOfRange)
            }
        }
    }
}

impl Cast for U256 {}
impl Cast for u128 {}
impl Cast for u64 {}
impl Cast for u32 {}
impl Cast for usize {}
