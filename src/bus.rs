// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serial bus transport.
//!
//! Reads ESP2 frames from a byte stream and yields decoded [`Message`]s.
//! The reader resynchronizes on the `A5 5A` sync sequence, so it can be
//! attached to a bus mid-traffic; garbage bytes and frames with a bad
//! checksum are skipped with a debug log instead of surfacing as errors.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::Result;
use crate::telegram::{Message, FRAME_LEN, SYNC};

/// Serial baud rate of the FAM14 bus gateway.
pub const DEFAULT_BAUD: u32 = 57600;

/// Read chunk size. ESP2 traffic is slow; frames arrive well below this.
const CHUNK: usize = 64;

/// A resynchronizing ESP2 frame reader over any byte stream.
///
/// # Examples
///
/// ```
/// use eltakor_lib::bus::BusReader;
/// use eltakor_lib::telegram::{Message, Org, Telegram};
/// use eltakor_lib::types::Address;
///
/// # async fn example() -> eltakor_lib::Result<()> {
/// let telegram = Telegram {
///     org: Org::Rps,
///     address: Address::new(0xFEDB_0001),
///     data: [0x70, 0, 0, 0],
///     status: 0x30,
///     outgoing: true,
/// };
/// let bytes = telegram.encode();
/// let mut reader = BusReader::new(&bytes[..]);
/// assert_eq!(reader.next_message().await?, Some(Message::Telegram(telegram)));
/// assert_eq!(reader.next_message().await?, None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BusReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> BusReader<R> {
    /// Creates a reader over a byte stream.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(CHUNK),
        }
    }

    /// Reads the next message from the bus.
    ///
    /// Returns `Ok(None)` once the underlying stream reaches end of file
    /// (which a live serial port never does).
    ///
    /// # Errors
    ///
    /// Returns an error only for transport-level I/O failures; malformed
    /// frames are skipped, not reported.
    pub async fn next_message(&mut self) -> Result<Option<Message>> {
        loop {
            self.align_on_sync();

            if self.buf.len() >= FRAME_LEN {
                match Message::parse(&self.buf[..FRAME_LEN]) {
                    Ok(message) => {
                        self.buf.drain(..FRAME_LEN);
                        return Ok(Some(message));
                    }
                    Err(err) => {
                        tracing::debug!(%err, "Dropping malformed frame");
                        self.buf.remove(0);
                        continue;
                    }
                }
            }

            let mut chunk = [0u8; CHUNK];
            let n = self.reader.read(&mut chunk).await?;
            if n == 0 {
                return Ok(None);
            }
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    /// Discards leading bytes until the buffer starts with the sync
    /// sequence (or is too short to tell).
    fn align_on_sync(&mut self) {
        let mut skipped = 0usize;
        while self.buf.len() >= 2 && self.buf[0..2] != SYNC {
            self.buf.remove(0);
            skipped += 1;
        }
        if skipped > 0 {
            tracing::debug!(skipped, "Skipped bytes while searching for frame sync");
        }
    }
}

/// Opens the serial port of a FAM14 gateway and wraps it in a
/// [`BusReader`].
///
/// The bus uses 8 data bits, no parity, one stop bit.
///
/// # Errors
///
/// Returns an error if the port cannot be opened.
pub fn open_serial(path: &str, baud: u32) -> Result<BusReader<tokio_serial::SerialStream>> {
    use tokio_serial::SerialPortBuilderExt as _;

    let stream = tokio_serial::new(path, baud)
        .data_bits(tokio_serial::DataBits::Eight)
        .parity(tokio_serial::Parity::None)
        .stop_bits(tokio_serial::StopBits::One)
        .open_native_async()?;
    tracing::info!(path, baud, "Opened bus serial port");
    Ok(BusReader::new(stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telegram::{checksum, Org, Telegram};
    use crate::types::Address;

    fn rps_telegram(address: u32) -> Telegram {
        Telegram {
            org: Org::Rps,
            address: Address::new(address),
            data: [0x70, 0, 0, 0],
            status: 0x30,
            outgoing: true,
        }
    }

    #[tokio::test]
    async fn reads_consecutive_frames() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&rps_telegram(0xFEDB_0001).encode());
        bytes.extend_from_slice(&rps_telegram(0xFEDB_0002).encode());

        let mut reader = BusReader::new(&bytes[..]);
        let first = reader.next_message().await.unwrap().unwrap();
        let second = reader.next_message().await.unwrap().unwrap();
        assert_eq!(first, Message::Telegram(rps_telegram(0xFEDB_0001)));
        assert_eq!(second, Message::Telegram(rps_telegram(0xFEDB_0002)));
        assert_eq!(reader.next_message().await.unwrap(), None);
    }

    #[tokio::test]
    async fn resynchronizes_across_garbage() {
        let mut bytes = vec![0x00, 0x13, 0xA5, 0x42];
        bytes.extend_from_slice(&rps_telegram(0xFEDB_0001).encode());

        let mut reader = BusReader::new(&bytes[..]);
        let msg = reader.next_message().await.unwrap().unwrap();
        assert_eq!(msg, Message::Telegram(rps_telegram(0xFEDB_0001)));
    }

    #[tokio::test]
    async fn skips_frames_with_bad_checksum() {
        let mut corrupt = rps_telegram(0xFEDB_0001).encode();
        corrupt[13] = corrupt[13].wrapping_add(1);

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&corrupt);
        bytes.extend_from_slice(&rps_telegram(0xFEDB_0002).encode());

        let mut reader = BusReader::new(&bytes[..]);
        let msg = reader.next_message().await.unwrap().unwrap();
        assert_eq!(msg, Message::Telegram(rps_telegram(0xFEDB_0002)));
    }

    #[tokio::test]
    async fn eof_on_partial_frame() {
        let frame = rps_telegram(0xFEDB_0001).encode();
        let mut reader = BusReader::new(&frame[..7]);
        assert_eq!(reader.next_message().await.unwrap(), None);
    }

    #[tokio::test]
    async fn reads_non_telegram_traffic() {
        let mut frame = [0u8; FRAME_LEN];
        frame[0] = SYNC[0];
        frame[1] = SYNC[1];
        frame[2] = 0x0B;
        frame[3] = 0xF0;
        frame[11] = 127;
        frame[13] = checksum(&frame[2..13]);

        let mut reader = BusReader::new(&frame[..]);
        assert_eq!(
            reader.next_message().await.unwrap(),
            Some(Message::DiscoveryRequest { address: 127 })
        );
    }
}
