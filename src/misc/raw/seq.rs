// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::{convert::TryFrom, fmt};

use super::RawField;

/// Same as [`RawField`] but for a sequence of values.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct RawSeq<T, U>(pub Vec<T>, std::marker::PhantomData<U>);

impl<T, U> RawSeq<T, U> {
    /// Wraps the given values.
    pub fn new(values: impl Into<Vec<T>>) -> Self {
        Self(values.into(), std::marker::PhantomData)
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Copy, U> RawSeq<T, U> {
    /// Returns the raw value at the given position.
    pub fn get(&self, index: usize) -> Option<RawField<T, U>> {
        self.0.get(index).copied().map(RawField::new)
    }

    /// Iterates over the raw values.
    pub fn iter(&self) -> impl Iterator<Item = RawField<T, U>> + '_ {
        self.0.iter().copied().map(RawField::new)
    }
}

impl<T, U> fmt::Debug for RawSeq<T, U>
where
    T: Copy + fmt::Debug,
    U: TryFrom<T> + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
