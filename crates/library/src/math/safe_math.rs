use std::panic::Location;

use primitive_types::{U256, U512};
use tracing::debug;

use crate::errors::{MathError, MathResult};

pub trait SafeMath: Sized {
    fn safe_add(self, rhs: Self) -> MathResult<Self>;
    fn safe_sub(self, rhs: Self) -> MathResult<Self>;
    fn safe_mul(self, rhs: Self) -> MathResult<Self>;
    fn safe_div(self, rhs: Self) -> MathResult<Self>;
}

macro_rules! checked_impl {
    ($t:ty) => {
        impl SafeMath for $t {
            #[track_caller]
            #[inline(always)]
            fn safe_add(self, v: $t) -> MathResult<$t> {
                match self.checked_add(v) {
                    Some(result) => Ok(result),
                    None => {
                        let caller = Location::caller();
                        debug!("math error at {}:{}", caller.file(), caller.line());
                        Err(MathError::Overflow)
                    }
                }
            }

            #[track_caller]
            #[inline(always)]
            fn safe_sub(self, v: $t) -> MathResult<$t> {
                match self.checked_sub(v) {
                    Some(result) => Ok(result),
                    None => {
                        let caller = Location::caller();
                        debug!("math error at {}:{}", caller.file(), caller.line());
                        Err(MathError::Overflow)
                    }
                }
            }

            #[track_caller]
            #[inline(always)]
            fn safe_mul(self, v: $t) -> MathResult<$t> {
                match self.checked_mul(v) {
                    Some(result) => Ok(result),
                    None => {
                        let caller = Location::caller();
                        debug!("math error at {}:{}", caller.file(), caller.line());
                        Err(MathError::Overflow)
                    }
                }
            }

            #[track_caller]
            #[inline(always)]
            fn safe_div(self, v: $t) -> MathResult<$t> {
                match self.checked_div(v) {
                    Some(result) => Ok(result),
                    None => {
                        let caller = Location::caller();
                        debug!("math error at {}:{}", caller.file(), caller.line());
                        Err(MathError::DivisionByZero)
                    }
                }
            }
        }
    };
}

checked_impl!(U512);
checked_impl!(U256);
checked_impl!(u128);
checked_impl!(u64);
checked_impl!(u32);
