// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Sequential binlog file reader.

use saturating::Saturating as S;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use std::{convert::TryFrom, error::Error, io::Read, ops::ControlFlow};

use crate::{
    binlog::{
        consts::EventType,
        ctx::BinlogCtx,
        error::{BinlogError, Result},
        header::BinlogEventHeader,
        BinlogFileHeader, Event,
    },
    io::{read_exact, read_exact_or_eof},
};

/// Window of events delivered by a [`BinlogFile`].
///
/// Zero values are treated as unset. Times are seconds since unix epoch.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkOptions {
    /// Events that start at or after this offset are within the window.
    pub start_pos: Option<u64>,
    /// Walk stops at the first event that ends after this offset.
    pub end_pos: Option<u64>,
    /// Events with this or later timestamp are within the window.
    pub start_time: Option<i64>,
    /// Walk stops at the first event with this or later timestamp.
    pub end_time: Option<i64>,
}

fn non_zero<T: Default + PartialEq>(value: T) -> Option<T> {
    if value == T::default() {
        None
    } else {
        Some(value)
    }
}

impl WalkOptions {
    pub fn with_start_pos(mut self, start_pos: u64) -> Self {
        self.start_pos = non_zero(start_pos);
        self
    }

    pub fn with_end_pos(mut self, end_pos: u64) -> Self {
        self.end_pos = non_zero(end_pos);
        self
    }

    pub fn with_start_time(mut self, start_time: i64) -> Self {
        self.start_time = non_zero(start_time);
        self
    }

    pub fn with_end_time(mut self, end_time: i64) -> Self {
        self.end_time = non_zero(end_time);
        self
    }

    #[cfg(feature = "time")]
    #[cfg_attr(docsrs, doc(cfg(feature = "time")))]
    pub fn with_start_datetime(self, start: time::OffsetDateTime) -> Self {
        self.with_start_time(start.unix_timestamp())
    }

    #[cfg(feature = "time")]
    #[cfg_attr(docsrs, doc(cfg(feature = "time")))]
    pub fn with_end_datetime(self, end: time::OffsetDateTime) -> Self {
        self.with_end_time(end.unix_timestamp())
    }

    /// Parses options from a JSON object, e.g. `{"start_pos": 4, "end_time": 1700000000}`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        Ok(Self::default()
            .with_start_pos(options.start_pos.unwrap_or_default())
            .with_end_pos(options.end_pos.unwrap_or_default())
            .with_start_time(options.start_time.unwrap_or_default())
            .with_end_time(options.end_time.unwrap_or_default()))
    }

    /// Returns `true` if the given event opens the window.
    ///
    /// Always `true` if neither start position nor start time is set.
    pub fn is_start(&self, header: &BinlogEventHeader) -> bool {
        let start_pos = self.start_pos.and_then(non_zero);
        let start_time = self.start_time.and_then(non_zero);

        if start_pos.is_none() && start_time.is_none() {
            return true;
        }

        start_pos.map_or(false, |pos| header.start_pos() >= pos)
            || start_time.map_or(false, |time| i64::from(header.timestamp) >= time)
    }

    /// Returns `true` if the walk must stop at the given event.
    pub fn is_stop(&self, header: &BinlogEventHeader) -> bool {
        self.end_pos
            .and_then(non_zero)
            .map_or(false, |pos| u64::from(header.log_pos) > pos)
            || self
                .end_time
                .and_then(non_zero)
                .map_or(false, |time| i64::from(header.timestamp) >= time)
    }
}

/// State of a [`BinlogFile`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum WalkerState {
    /// File header is not yet checked.
    AwaitingMagic,
    /// Events are being read.
    Streaming,
    /// End of stream, stop condition or a fatal error was reached.
    Finished,
}

/// Binlog file.
///
/// Reads events one by one maintaining the decode context of the stream.
/// It's also an iterator over events that fall into the configured window.
#[derive(Debug)]
pub struct BinlogFile<T> {
    read: T,
    ctx: BinlogCtx,
    options: WalkOptions,
    state: WalkerState,
    offset: u64,
    body: Vec<u8>,
}

impl<T: Read> BinlogFile<T> {
    /// Creates new binlog file that delivers every event.
    ///
    /// It'll try to read binlog file header.
    pub fn new(read: T) -> Result<Self> {
        Self::with_options(read, WalkOptions::default())
    }

    /// Creates new binlog file that delivers events within the given window.
    ///
    /// It'll try to read binlog file header.
    pub fn with_options(read: T, options: WalkOptions) -> Result<Self> {
        let mut this = Self {
            read,
            ctx: BinlogCtx::new(),
            options,
            state: WalkerState::AwaitingMagic,
            offset: 0,
            body: Vec::new(),
        };
        this.read_file_header()?;
        Ok(this)
    }

    fn read_file_header(&mut self) -> Result<()> {
        let mut magic = [0_u8; BinlogFileHeader::LEN];
        read_exact(&mut self.read, &mut magic)?;

        if magic != BinlogFileHeader::VALUE {
            return Err(BinlogError::InvalidFileHeader);
        }

        self.offset = BinlogFileHeader::LEN as u64;
        self.state = WalkerState::Streaming;
        Ok(())
    }

    /// Returns the offset of the next event.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the decode context of this stream.
    pub fn ctx(&self) -> &BinlogCtx {
        &self.ctx
    }

    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    pub fn state(&self) -> WalkerState {
        self.state
    }

    /// Returns the underlying reader.
    pub fn into_inner(self) -> T {
        self.read
    }

    /// Reads the next event within the window.
    ///
    /// Returns `Ok(None)` once the walk is finished. The walk stays usable after
    /// a [recoverable](BinlogError::is_recoverable) error, any other error finishes it.
    pub fn next_event(&mut self) -> Result<Option<Event>> {
        match self.read_next() {
            Ok(event) => Ok(event),
            Err(err) => {
                if !err.is_recoverable() {
                    self.state = WalkerState::Finished;
                }
                Err(err)
            }
        }
    }

    fn read_next(&mut self) -> Result<Option<Event>> {
        while self.state == WalkerState::Streaming {
            let width = self.ctx.header_width();
            let mut header_bytes = vec![0_u8; width];
            if !read_exact_or_eof(&mut self.read, &mut header_bytes)? {
                debug!(offset = self.offset, "end of binlog stream");
                self.state = WalkerState::Finished;
                break;
            }

            let header = BinlogEventHeader::read(&header_bytes, width)?;
            trace!(
                offset = self.offset,
                event_type = header.event_type.raw(),
                event_size = header.event_size,
                log_pos = header.log_pos,
                "binlog event"
            );

            // size of an unknown event can't be trusted
            let event_type = EventType::try_from(header.event_type.raw())?;

            let body_len = (S(header.event_size as usize) - S(width)).0;
            self.read_body(body_len)?;
            self.offset += (width + body_len) as u64;

            if !self.options.is_start(&header) {
                trace!(
                    offset = header.start_pos(),
                    timestamp = header.timestamp,
                    "binlog event outside of the window"
                );
                match event_type {
                    // stream can't be decoded without its description
                    EventType::FORMAT_DESCRIPTION_EVENT => {
                        Event::read(header, &header_bytes, &self.body, &mut self.ctx)?;
                    }
                    EventType::TABLE_MAP_EVENT => {
                        if let Err(err) =
                            Event::read(header, &header_bytes, &self.body, &mut self.ctx)
                        {
                            debug!(
                                offset = header.start_pos(),
                                error = %err,
                                "skipping undecodable table map outside of the window"
                            );
                        }
                    }
                    _ => (),
                }
                continue;
            }

            let event = Event::read(header, &header_bytes, &self.body, &mut self.ctx)?;

            if self.options.is_stop(&header) {
                debug!(
                    log_pos = header.log_pos,
                    timestamp = header.timestamp,
                    "binlog stop condition reached"
                );
                self.state = WalkerState::Finished;
                break;
            }

            return Ok(Some(event));
        }

        Ok(None)
    }

    /// Reads `len` bytes of the event body into the reusable body buffer.
    ///
    /// The buffer only grows with the data actually read.
    fn read_body(&mut self, len: usize) -> Result<()> {
        self.body.clear();
        (&mut self.read).take(len as u64).read_to_end(&mut self.body)?;

        if self.body.len() < len {
            return Err(BinlogError::Truncated {
                needed: len,
                available: self.body.len(),
            });
        }
        Ok(())
    }

    /// Passes every event within the window to the `consumer`.
    ///
    /// The walk ends at the end of the stream, at the stop condition, on the first error
    /// or once the consumer breaks. A recoverable error is returned to the caller,
    /// who may call `walk` again to continue past it.
    pub fn walk<F, E>(&mut self, mut consumer: F) -> Result<()>
    where
        F: FnMut(&Event) -> std::result::Result<ControlFlow<()>, E>,
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        while let Some(event) = self.next_event()? {
            match consumer(&event) {
                Ok(ControlFlow::Continue(())) => (),
                Ok(ControlFlow::Break(())) => {
                    debug!(log_pos = event.header.log_pos, "binlog walk stopped by consumer");
                    self.state = WalkerState::Finished;
                    break;
                }
                Err(err) => {
                    self.state = WalkerState::Finished;
                    return Err(BinlogError::Consumer(err.into()));
                }
            }
        }

        Ok(())
    }
}

impl<T: Read> Iterator for BinlogFile<T> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event().transpose()
    }
}
