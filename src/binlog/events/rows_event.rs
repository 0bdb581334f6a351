// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::sync::Arc;

use crate::{
    binlog::{
        consts::{EventType, RowsEventFlags, UnknownEventType},
        ctx::BinlogCtx,
        error::Result,
        events::TableMapEvent,
    },
    io::ParseBuf,
    misc::{bitfield, bitfield_len, Bitfield, RawFlags},
};

/// Kind of a row-mutation event.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum RowsEventKind {
    Write,
    Update,
    Delete,
}

impl RowsEventKind {
    /// Returns the kind of a row-mutation event type (`None` for other types).
    pub fn from_event_type(event_type: EventType) -> Option<Self> {
        use EventType::*;

        match event_type {
            PRE_GA_WRITE_ROWS_EVENT | WRITE_ROWS_EVENT_V1 | WRITE_ROWS_EVENT => Some(Self::Write),
            PRE_GA_UPDATE_ROWS_EVENT | UPDATE_ROWS_EVENT_V1 | UPDATE_ROWS_EVENT => {
                Some(Self::Update)
            }
            PRE_GA_DELETE_ROWS_EVENT | DELETE_ROWS_EVENT_V1 | DELETE_ROWS_EVENT => {
                Some(Self::Delete)
            }
            _ => None,
        }
    }
}

/// Common base structure for all row-containing binary log events.
///
/// Row images are kept raw, use [`RowsEvent::table`] to interpret them.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct RowsEvent {
    /// Kind of this event.
    pub kind: RowsEventKind,
    /// Layout version (`0` for pre-GA events, `1` and `2` otherwise).
    pub version: u8,
    /// Table identifier.
    ///
    /// If the table id is `0x00ffffff` it is a dummy event that should have
    /// the end of statement flag set that declares that all table maps can be freed.
    /// Otherwise it refers to a table defined by `TABLE_MAP_EVENT`.
    pub table_id: u64,
    /// Raw rows event flags (see `RowsEventFlags`).
    pub flags: RawFlags<RowsEventFlags>,
    /// Raw extra data (version 2 only).
    pub extra_data: Vec<u8>,
    /// Number of columns.
    pub num_columns: u64,
    /// For DELETE and UPDATE only. Bit-field indicating whether each column is used one bit
    /// per column.
    pub columns_before_image: Option<Bitfield>,
    /// For WRITE and UPDATE only. Bit-field indicating whether each column is used
    /// in the after-image; one bit per column.
    pub columns_after_image: Option<Bitfield>,
    /// A sequence of zero or more rows. The end is determined by the size of the event.
    pub rows_data: Vec<u8>,
    /// Table map this event refers to.
    pub table: Arc<TableMapEvent>,
}

impl RowsEvent {
    /// Decodes the event body (checksum must be stripped).
    ///
    /// Fails with `UnknownTable` if `ctx` has no table map for the referenced table.
    pub fn read(event_type: EventType, data: &[u8], ctx: &BinlogCtx) -> Result<Self> {
        let (kind, version) = match (
            RowsEventKind::from_event_type(event_type),
            event_type.rows_event_version(),
        ) {
            (Some(kind), Some(version)) => (kind, version),
            _ => return Err(UnknownEventType(event_type as u8).into()),
        };

        let mut buf = ParseBuf(data);

        let table_id = if ctx.header_width_for(event_type) == 6 {
            // old server
            u64::from(buf.eat_u32_le()?)
        } else {
            buf.eat_u48_le()?
        };
        let flags = buf.eat_u16_le()?;

        let extra_data: &[u8] = if version == 2 {
            // length includes itself
            let extra_data_len = buf.eat_u16_le()? as usize;
            buf.eat(extra_data_len.saturating_sub(2))?
        } else {
            &[]
        };

        let num_columns = buf.eat_lenenc_len()?;
        let bitmap_len = bitfield_len(num_columns);

        let image_1 = bitfield(buf.eat(bitmap_len)?, num_columns);
        // pre-GA update events carry a single bitmap
        let image_2 = if kind == RowsEventKind::Update && version > 0 {
            Some(bitfield(buf.eat(bitmap_len)?, num_columns))
        } else {
            None
        };

        let rows_data = buf.eat_all();
        let table = Arc::clone(ctx.table_schema(table_id)?);

        let (columns_before_image, columns_after_image) = match kind {
            RowsEventKind::Write => (None, Some(image_1)),
            RowsEventKind::Update => (Some(image_1), image_2),
            RowsEventKind::Delete => (Some(image_1), None),
        };

        Ok(Self {
            kind,
            version,
            table_id,
            flags: RawFlags::new(flags),
            extra_data: extra_data.to_vec(),
            num_columns: num_columns as u64,
            columns_before_image,
            columns_after_image,
            rows_data: rows_data.to_vec(),
            table,
        })
    }

    /// Returns `true` if this is the last event of a statement.
    pub fn is_stmt_end(&self) -> bool {
        self.flags.get().contains(RowsEventFlags::STMT_END)
    }
}
