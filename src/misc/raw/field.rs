// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::{convert::TryFrom, fmt, marker::PhantomData};

/// Raw value of a MySql enum-like field.
///
/// * `T` – the wire representation,
/// * `U` – the parsed value.
///
/// Decoding never fails because of an unknown value, it is reported by [`RawField::get`]
/// and the raw value stays available.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct RawField<T, U>(pub T, PhantomData<U>);

impl<T, U> RawField<T, U> {
    /// Wraps the given raw value.
    pub fn new(t: T) -> Self {
        Self(t, PhantomData)
    }

    /// Returns the raw value.
    pub fn raw(&self) -> T
    where
        T: Copy,
    {
        self.0
    }
}

impl<T, U> RawField<T, U>
where
    T: Copy,
    U: TryFrom<T>,
{
    /// Tries to parse the raw value.
    pub fn get(&self) -> Result<U, U::Error> {
        U::try_from(self.0)
    }
}

impl<T, U> From<T> for RawField<T, U> {
    fn from(t: T) -> Self {
        Self::new(t)
    }
}

impl<T, U> fmt::Debug for RawField<T, U>
where
    T: Copy + fmt::Debug,
    U: TryFrom<T> + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Ok(known) => known.fmt(f),
            Err(_) => f
                .debug_tuple(std::any::type_name::<U>())
                .field(&format_args!("unknown {:?}", self.0))
                .finish(),
        }
    }
}
