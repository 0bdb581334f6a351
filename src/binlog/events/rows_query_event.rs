// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::borrow::Cow;

use crate::{binlog::error::Result, io::ParseBuf, misc::RawText};

/// Query that caused the following `ROWS_EVENT`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct RowsQueryEvent {
    pub query: RawText,
}

impl RowsQueryEvent {
    /// Decodes the event body (checksum must be stripped).
    pub fn read(data: &[u8]) -> Result<Self> {
        let mut buf = ParseBuf(data);
        // truncated length, the query runs to the end of the body
        buf.skip(1)?;

        Ok(Self {
            query: RawText::new(buf.eat_all()),
        })
    }

    /// Returns the query text (lossy converted).
    pub fn query(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.query.as_bytes())
    }
}
