// Copyright (c) 2020 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! MySql binlog file decoder.
//!
//! This crate decodes a MySql binary log file into a sequence of typed events.
//! It validates the file header, frames every event using the header width announced
//! by the stream's format description event, verifies event checksums and decodes
//! the bodies of the events that matter for change-data-capture:
//!
//! *   `FORMAT_DESCRIPTION_EVENT`,
//! *   `QUERY_EVENT`, `XID_EVENT`, `INTVAR_EVENT`, `ROTATE_EVENT`, `STOP_EVENT`,
//! *   `TABLE_MAP_EVENT`,
//! *   `WRITE_ROWS_EVENT`, `UPDATE_ROWS_EVENT`, `DELETE_ROWS_EVENT` (versions 0 to 2,
//!     structural fields only),
//! *   `ROWS_QUERY_EVENT`.
//!
//! Other known event types are returned as raw bytes.
//!
//! ```no_run
//! use std::{fs::File, io::BufReader, ops::ControlFlow};
//!
//! use mysql_binlog_reader::{binlog::EventData, BinlogFile, WalkOptions};
//!
//! # fn main() -> mysql_binlog_reader::Result<()> {
//! let file = BufReader::new(File::open("mysql-bin.000001")?);
//! let options = WalkOptions::default().with_start_pos(4).with_end_pos(1_000_000);
//! let mut binlog = BinlogFile::with_options(file, options)?;
//!
//! binlog.walk(|event| {
//!     if let EventData::QueryEvent(query) = &event.data {
//!         println!("{}: {}", event.header.log_pos, query.query());
//!     }
//!     Ok::<_, std::io::Error>(ControlFlow::Continue(()))
//! })?;
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate lazy_static;

pub mod binlog;
pub mod constants;
pub mod io;
pub mod misc;

#[doc(inline)]
pub use crate::binlog::{
    error::{BinlogError, Result},
    reader::{BinlogFile, WalkOptions},
    BinlogCtx, Event, EventData,
};
