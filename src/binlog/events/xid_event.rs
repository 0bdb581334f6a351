// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use crate::{
    binlog::{
        consts::EventType,
        error::{BinlogError, Result},
        events::FormatDescriptionEvent,
    },
    io::ParseBuf,
};

/// Xid event.
///
/// Generated for a commit of a transaction that modifies one or more tables of an XA-capable
/// storage engine.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct XidEvent {
    pub xid: u64,
}

impl XidEvent {
    /// Decodes the event body (checksum must be stripped).
    pub fn read(data: &[u8], fde: &FormatDescriptionEvent) -> Result<Self> {
        let mut buf = ParseBuf(data);

        let post_header_len = fde.get_event_type_header_length(EventType::XID_EVENT);
        buf.skip(usize::from(post_header_len))?;

        let xid = buf.eat_u64_le()?;

        if !buf.is_empty() {
            return Err(BinlogError::TrailingBytes {
                event_type: EventType::XID_EVENT,
                count: buf.len(),
            });
        }

        Ok(Self { xid })
    }
}
