// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Wrappers for raw values that came from a binlog and may be unknown to this crate.

pub use self::{field::RawField, flags::RawFlags, seq::RawSeq, text::RawText};

pub mod field;
pub mod flags;
pub mod seq;
pub mod text;
