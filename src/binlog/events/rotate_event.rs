// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::borrow::Cow;

use crate::{
    binlog::{consts::BinlogVersion, error::Result, events::FormatDescriptionEvent},
    io::ParseBuf,
    misc::RawText,
};

/// The rotate event is added to the binlog as last event
/// to tell the reader what binlog to request next.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct RotateEvent {
    // post-header
    /// Position of the first event in the next binlog.
    ///
    /// Only present on the wire if binlog version > 1 (`4` otherwise).
    pub position: u64,

    // payload
    /// Name of the next binlog (trailing whitespace is trimmed).
    pub name: RawText,
}

impl RotateEvent {
    /// Position of the first event of a binlog that has no position field.
    pub const DEFAULT_POSITION: u64 = 4;

    /// Decodes the event body (checksum must be stripped).
    pub fn read(data: &[u8], fde: &FormatDescriptionEvent) -> Result<Self> {
        let mut buf = ParseBuf(data);

        let position = if fde.version() > BinlogVersion::Version1 {
            buf.eat_u64_le()?
        } else {
            Self::DEFAULT_POSITION
        };

        let name = buf.eat_all();
        let name: &[u8] = match name.iter().rposition(|x| !x.is_ascii_whitespace()) {
            Some(last) => &name[..=last],
            None => &[],
        };

        Ok(Self {
            position,
            name: RawText::new(name),
        })
    }

    /// Returns the name of the next binlog.
    pub fn name(&self) -> Cow<'_, str> {
        self.name.as_str()
    }
}
