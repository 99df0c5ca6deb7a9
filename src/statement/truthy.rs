// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

/// The default condition of `Check` and `Wait`.
///
/// `false` and absent values are falsy; every other value is truthy.
pub trait Truthy {
    fn is_truthy(&self) -> bool;

    fn is_falsy(&self) -> bool {
        !self.is_truthy()
    }
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl<T: Truthy + ?Sized> Truthy for Box<T> {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl<T: Truthy + ?Sized> Truthy for Arc<T> {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl<T: Truthy + ?Sized> Truthy for Rc<T> {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

macro_rules! always_truthy {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Truthy for $ty {
                fn is_truthy(&self) -> bool {
                    true
                }
            }
        )*
    };
}

always_truthy!(
    (), char, str, String, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    std::time::Duration,
);

impl<T> Truthy for [T] {
    fn is_truthy(&self) -> bool {
        true
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        true
    }
}

impl Truthy for Cow<'_, str> {
    fn is_truthy(&self) -> bool {
        true
    }
}
