// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use crate::{
    binlog::{
        consts::{EventFlags, EventType},
        error::{BinlogError, Result},
    },
    io::ParseBuf,
    misc::{RawField, RawFlags},
};

/// The binlog event header starts each event.
///
/// It's 19 bytes long for binlog version >= 4 and 13 bytes long for legacy streams,
/// that have neither `log_pos` nor `flags`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct BinlogEventHeader {
    /// Seconds since unix epoch.
    pub timestamp: u32,
    /// Raw event Type.
    pub event_type: RawField<u8, EventType>,
    /// Server-id of the originating mysql-server.
    ///
    /// Used to filter out events in circular replication.
    pub server_id: u32,
    /// Size of the event (header, post-header, body).
    pub event_size: u32,
    /// Position of the next event (`0` for legacy headers).
    pub log_pos: u32,
    /// Binlog Event Flag (`0` for legacy headers).
    pub flags: RawFlags<EventFlags>,
}

impl BinlogEventHeader {
    /// Binlog event header length for version >= 4.
    pub const LEN: usize = 19;
    /// Binlog event header length before `log_pos` and `flags` were added.
    pub const LEGACY_LEN: usize = 13;

    /// Decodes a header of the given width from the start of `buf`.
    ///
    /// Fails with [`BinlogError::InvalidHeader`] if `buf` is shorter than `width`.
    pub fn read(buf: &[u8], width: usize) -> Result<Self> {
        if buf.len() < width || width < Self::LEGACY_LEN {
            return Err(BinlogError::InvalidHeader {
                expected: width.max(Self::LEGACY_LEN),
                got: buf.len(),
            });
        }

        let mut buf = ParseBuf(&buf[..width]);

        let timestamp = buf.eat_u32_le()?;
        let event_type = buf.eat_u8()?;
        let server_id = buf.eat_u32_le()?;
        let event_size = buf.eat_u32_le()?;
        let (log_pos, flags) = if width > Self::LEGACY_LEN {
            (buf.eat_u32_le()?, buf.eat_u16_le()?)
        } else {
            (0, 0)
        };

        Ok(Self {
            timestamp,
            event_type: RawField::new(event_type),
            server_id,
            event_size,
            log_pos,
            flags: RawFlags::new(flags),
        })
    }

    /// Offset of the first byte of this event in the canonical stream.
    pub fn start_pos(&self) -> u64 {
        u64::from(self.log_pos).saturating_sub(u64::from(self.event_size))
    }

    /// Returns `true` if this is a format description event.
    pub fn is_format_description(&self) -> bool {
        self.event_type.raw() == EventType::FORMAT_DESCRIPTION_EVENT as u8
    }

    /// Returns event timestamp as a UTC date time.
    #[cfg(feature = "time")]
    #[cfg_attr(docsrs, doc(cfg(feature = "time")))]
    pub fn datetime(&self) -> time::OffsetDateTime {
        // u32 seconds are always in range
        time::OffsetDateTime::from_unix_timestamp(i64::from(self.timestamp))
            .unwrap_or(time::OffsetDateTime::UNIX_EPOCH)
    }
}
