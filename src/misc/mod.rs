// Copyright (c) 2017 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use bitvec::prelude::*;
use regex::bytes::Regex;

pub mod raw;

pub use self::raw::{RawField, RawFlags, RawSeq, RawText};

/// A set of booleans packed one bit per flag.
///
/// Bits go from low to high within a byte and bytes go from first to last, so membership
/// of the index `i` is `(bytes[i / 8] >> (i % 8)) & 1`.
pub type Bitfield = BitVec<u8, Lsb0>;

/// Creates a bitfield of `bits` flags out of the given bytes (padding bits are dropped).
pub fn bitfield(bytes: &[u8], bits: usize) -> Bitfield {
    let mut bitfield = Bitfield::from_slice(bytes);
    bitfield.truncate(bits);
    bitfield
}

/// Returns the number of bytes needed to store a bitfield of `bits` flags.
pub fn bitfield_len(bits: usize) -> usize {
    bits / 8 + usize::from(bits % 8 != 0)
}

/// Returns length of length-encoded-integer representation of `x`.
pub fn lenenc_int_len(x: u64) -> u64 {
    if x < 251 {
        1
    } else if x < 65_536 {
        3
    } else if x < 16_777_216 {
        4
    } else {
        9
    }
}

lazy_static! {
    static ref VERSION_RE: Regex = Regex::new(r"^(\d+)\.(\d+)\.(\d+)").expect("valid regex");
}

/// Splits server 'version' string into three numeric pieces.
///
/// It'll return `(0, 0, 0)` in case of error.
pub fn split_version<T: AsRef<[u8]>>(version_str: T) -> (u8, u8, u8) {
    let parse = |captures: &regex::bytes::Captures<'_>, i: usize| -> Option<u8> {
        std::str::from_utf8(captures.get(i)?.as_bytes())
            .ok()?
            .parse()
            .ok()
    };

    VERSION_RE
        .captures(version_str.as_ref())
        .and_then(|captures| {
            Some((
                parse(&captures, 1)?,
                parse(&captures, 2)?,
                parse(&captures, 3)?,
            ))
        })
        .unwrap_or((0, 0, 0))
}
