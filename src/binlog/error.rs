// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::{error::Error, io};

use crate::{
    binlog::consts::{EventType, UnknownChecksumAlg, UnknownEventType},
    constants::UnknownColumnType,
};

/// Result of binlog decoding.
pub type Result<T> = std::result::Result<T, BinlogError>;

/// Binlog decoding error.
#[derive(Debug, thiserror::Error)]
pub enum BinlogError {
    #[error("IO error: {}", _0)]
    Io(#[from] io::Error),
    #[error("invalid binlog file header")]
    InvalidFileHeader,
    #[error("truncated input: {} bytes needed, {} available", needed, available)]
    Truncated { needed: usize, available: usize },
    #[error("invalid event header: {} bytes expected, {} given", expected, got)]
    InvalidHeader { expected: usize, got: usize },
    #[error("event size mismatch: {} declared, {} read", expected, got)]
    SizeMismatch { expected: usize, got: usize },
    #[error(
        "binlog checksum mismatch: expected {:#010x}, computed {:#010x}",
        expected,
        computed
    )]
    ChecksumMismatch { expected: u32, computed: u32 },
    #[error(transparent)]
    UnknownChecksumAlg(#[from] UnknownChecksumAlg),
    #[error(transparent)]
    UnknownEventType(#[from] UnknownEventType),
    #[error("unknown table id {}", _0)]
    UnknownTable(u64),
    #[error("unknown query status variable key {}", _0)]
    UnknownStatusVar(u8),
    #[error(transparent)]
    UnknownColumnType(#[from] UnknownColumnType),
    #[error("invalid length-encoded integer prefix {:#04x}", _0)]
    InvalidPackedInt(u8),
    #[error("invalid fixed-length integer width {}", _0)]
    InvalidIntWidth(usize),
    #[error("unexpected NULL length-encoded value")]
    UnexpectedNull,
    #[error("invalid null bitmap: {} bytes expected, {} given", expected, got)]
    InvalidNullBitmap { expected: usize, got: usize },
    #[error("{} bytes remaining after {:?} body", count, event_type)]
    TrailingBytes { event_type: EventType, count: usize },
    #[error("consumer error: {}", _0)]
    Consumer(Box<dyn Error + Send + Sync + 'static>),
}

impl BinlogError {
    /// Returns `true` if the stream position is still trustworthy after this error,
    /// so that a caller may choose to continue reading.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BinlogError::UnknownTable(_) | BinlogError::UnknownStatusVar(_)
        )
    }
}

impl From<BinlogError> for io::Error {
    fn from(err: BinlogError) -> Self {
        match err {
            BinlogError::Io(err) => err,
            BinlogError::Truncated { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, err),
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
