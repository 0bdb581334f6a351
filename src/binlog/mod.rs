// Copyright (c) 2020 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Binlog-related structures and functions.
//!
//! Events are decoded against a [`BinlogCtx`], that holds the format description
//! and the table maps seen so far in the stream. All structures of this module contain
//! raw data that may not necessarily be valid. Please consult the MySql documentation.

use std::{convert::TryFrom, sync::Arc};

use self::{
    checksum::{validate_event, BinlogEventFooter},
    consts::{BinlogChecksumAlg, EventType, UnknownChecksumAlg, UnknownEventType},
    error::Result,
    events::{
        FormatDescriptionEvent, IntvarEvent, QueryEvent, RotateEvent, RowsEvent, RowsQueryEvent,
        TableMapEvent, XidEvent,
    },
    header::BinlogEventHeader,
};

pub mod checksum;
pub mod consts;
pub mod ctx;
pub mod error;
pub mod events;
pub mod header;
pub mod reader;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::ctx::BinlogCtx;

/// A binlog file starts with a Binlog File Header `[ fe 'bin' ]`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct BinlogFileHeader;

impl BinlogFileHeader {
    /// Length of a binlog file header.
    pub const LEN: usize = 4;
    /// Value of a binlog file header.
    pub const VALUE: [u8; Self::LEN] = [0xfe, b'b', b'i', b'n'];
}

/// Parsed event data.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum EventData {
    FormatDescriptionEvent(FormatDescriptionEvent),
    QueryEvent(QueryEvent),
    StopEvent,
    RotateEvent(RotateEvent),
    IntvarEvent(IntvarEvent),
    XidEvent(XidEvent),
    /// Shared with the registry of the context that decoded it.
    TableMapEvent(Arc<TableMapEvent>),
    /// Write, update or delete rows event of any version.
    RowsEvent(RowsEvent),
    RowsQueryEvent(RowsQueryEvent),
    /// Known event type without a decoder. Contains the raw body (checksum excluded).
    Unsupported {
        event_type: EventType,
        data: Vec<u8>,
    },
}

impl EventData {
    /// Decodes a validated event body of the given type.
    ///
    /// Context is only read here, see [`Event::read`] for decoding that updates it.
    pub fn read(event_type: EventType, data: &[u8], ctx: &BinlogCtx) -> Result<Self> {
        use EventType::*;

        let fde = ctx.fde();

        let event_data = match event_type {
            FORMAT_DESCRIPTION_EVENT => {
                EventData::FormatDescriptionEvent(FormatDescriptionEvent::read(data)?)
            }
            QUERY_EVENT => EventData::QueryEvent(QueryEvent::read(data, fde)?),
            STOP_EVENT => EventData::StopEvent,
            ROTATE_EVENT => EventData::RotateEvent(RotateEvent::read(data, fde)?),
            INTVAR_EVENT => EventData::IntvarEvent(IntvarEvent::read(data, fde)?),
            XID_EVENT => EventData::XidEvent(XidEvent::read(data, fde)?),
            TABLE_MAP_EVENT => {
                EventData::TableMapEvent(Arc::new(TableMapEvent::read(data, fde)?))
            }
            PRE_GA_WRITE_ROWS_EVENT
            | PRE_GA_UPDATE_ROWS_EVENT
            | PRE_GA_DELETE_ROWS_EVENT
            | WRITE_ROWS_EVENT_V1
            | UPDATE_ROWS_EVENT_V1
            | DELETE_ROWS_EVENT_V1
            | WRITE_ROWS_EVENT
            | UPDATE_ROWS_EVENT
            | DELETE_ROWS_EVENT => EventData::RowsEvent(RowsEvent::read(event_type, data, ctx)?),
            ROWS_QUERY_EVENT => EventData::RowsQueryEvent(RowsQueryEvent::read(data)?),
            event_type => EventData::Unsupported {
                event_type,
                data: data.to_vec(),
            },
        };

        Ok(event_data)
    }
}

/// Decoded binlog event.
///
/// A binlog event starts with a Binlog Event header and is followed by a Binlog Event Type
/// specific data part.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Event {
    /// Common header of an event.
    pub header: BinlogEventHeader,
    /// An event-type specific data.
    pub data: EventData,
    /// Footer this event was validated against.
    pub footer: BinlogEventFooter,
    /// Event checksum.
    ///
    /// Makes sense only if checksum algorithm is defined in `footer`.
    pub checksum: Option<u32>,
}

impl Event {
    /// Validates and decodes an event, updating the context as a side effect.
    ///
    /// A format description event is adopted by `ctx`, a table map event gets registered.
    pub fn read(
        header: BinlogEventHeader,
        header_bytes: &[u8],
        body: &[u8],
        ctx: &mut BinlogCtx,
    ) -> Result<Self> {
        let event_type = EventType::try_from(header.event_type.raw())?;
        let validated = validate_event(header_bytes, &header, body, ctx)?;

        let mut data = EventData::read(event_type, validated.data, ctx)?;
        match &mut data {
            EventData::FormatDescriptionEvent(fde) => {
                fde.footer = validated.footer;
                ctx.adopt_format_description(fde.clone());
            }
            EventData::TableMapEvent(table_map) => {
                ctx.register_table(Arc::clone(table_map));
            }
            _ => (),
        }

        Ok(Self {
            header,
            data,
            footer: validated.footer,
            checksum: validated.checksum,
        })
    }

    /// Returns the type of this event.
    pub fn event_type(&self) -> std::result::Result<EventType, UnknownEventType> {
        self.header.event_type.get()
    }

    /// Returns the checksum algorithm this event was validated with.
    pub fn checksum_alg(
        &self,
    ) -> std::result::Result<Option<BinlogChecksumAlg>, UnknownChecksumAlg> {
        self.footer.get_checksum_alg()
    }
}
