// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use crate::{
    binlog::{
        consts::{EventType, IntvarEventType},
        error::{BinlogError, Result},
        events::FormatDescriptionEvent,
    },
    io::ParseBuf,
    misc::RawField,
};

/// Integer based session-variables event.
///
/// Written every time a statement uses an AUTO_INCREMENT column or the LAST_INSERT_ID() function;
/// precedes other events for the statement. This is written only before a QUERY_EVENT
/// and is not used with row-based logging.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct IntvarEvent {
    /// Subtype of this event.
    pub subtype: RawField<u8, IntvarEventType>,
    pub value: u64,
}

impl IntvarEvent {
    /// Decodes the event body (checksum must be stripped).
    pub fn read(data: &[u8], fde: &FormatDescriptionEvent) -> Result<Self> {
        let mut buf = ParseBuf(data);

        let post_header_len = fde.get_event_type_header_length(EventType::INTVAR_EVENT);
        buf.skip(usize::from(post_header_len))?;

        let subtype = buf.eat_u8()?;
        let value = buf.eat_u64_le()?;

        if !buf.is_empty() {
            return Err(BinlogError::TrailingBytes {
                event_type: EventType::INTVAR_EVENT,
                count: buf.len(),
            });
        }

        Ok(Self {
            subtype: RawField::new(subtype),
            value,
        })
    }
}
