// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use bitflags::{Bits, Flags};

use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// Raw flags value.
///
/// Unknown bits are kept, [`RawFlags::get`] truncates them.
#[repr(transparent)]
pub struct RawFlags<T: Flags>(pub T::Bits);

impl<T: Flags> RawFlags<T> {
    /// Wraps the given raw value.
    pub fn new(value: T::Bits) -> Self {
        Self(value)
    }

    /// Returns parsed flags. Unknown bits will be truncated.
    pub fn get(&self) -> T {
        T::from_bits_truncate(self.0)
    }

    /// Returns bits that are not known to `T`.
    pub fn unknown_bits(&self) -> T::Bits {
        self.0 & !T::all().bits()
    }
}

impl<T: Flags> Clone for RawFlags<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Flags> Copy for RawFlags<T> {}

impl<T: Flags> PartialEq for RawFlags<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for RawFlags<T>
where
    T: Flags,
    T::Bits: Eq,
{
}

impl<T> Hash for RawFlags<T>
where
    T: Flags,
    T::Bits: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl<T> fmt::Debug for RawFlags<T>
where
    T: Flags + fmt::Debug,
    T::Bits: fmt::LowerHex,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.get())?;
        let unknown_bits = self.unknown_bits();
        if unknown_bits != T::Bits::EMPTY {
            write!(f, " (Unknown bits: {:#x})", unknown_bits)?
        }
        Ok(())
    }
}
