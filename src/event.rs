//! Kernel `input_event` wire format and the handful of constants the
//! router needs to recognise key and sync events on the interception-tools
//! pipe.

use bytemuck::{Pod, Zeroable};
use std::io::{self, Read, Write};

pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const SYN_REPORT: u16 = 0x00;

pub const KEY_RELEASE: i32 = 0;
pub const KEY_PRESS: i32 = 1;
pub const KEY_REPEAT: i32 = 2;

/// Bit-exact mirror of the kernel's `struct input_event` on 64-bit Linux,
/// where both members of the embedded `timeval` are 64 bits wide.
///
/// `Pod`/`Zeroable` let us read and write this struct directly as bytes
/// without touching the fields, which is what lets `read_event`/
/// `write_event` stay a couple of lines each.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Pod, Zeroable)]
pub struct RawEvent {
    pub tv_sec: i64,
    pub tv_usec: i64,
    pub type_: u16,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    pub fn key(code: u16, value: i32) -> Self {
        RawEvent {
            tv_sec: 0,
            tv_usec: 0,
            type_: EV_KEY,
            code,
            value,
        }
    }

    pub fn syn_report() -> Self {
        RawEvent {
            tv_sec: 0,
            tv_usec: 0,
            type_: EV_SYN,
            code: SYN_REPORT,
            value: 0,
        }
    }

    pub fn is_key(&self) -> bool {
        self.type_ == EV_KEY
    }

    pub fn is_syn_report(&self) -> bool {
        self.type_ == EV_SYN && self.code == SYN_REPORT
    }
}

/// Reads exactly one `input_event` from `r`. Returns `Ok(None)` on a clean
/// EOF between events (the pipe closed), propagating any partial-read as
/// an `UnexpectedEof` error since a torn event is a protocol violation,
/// not a shutdown.
pub fn read_event<R: Read>(r: &mut R) -> io::Result<Option<RawEvent>> {
    let mut buf = [0u8; std::mem::size_of::<RawEvent>()];
    let mut filled = 0;
    loop {
        match r.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input stream closed mid-event",
                ))
            }
            Ok(n) => {
                filled += n;
                if filled == buf.len() {
                    return Ok(Some(*bytemuck::from_bytes(&buf)));
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Writes a single event, not followed by a sync report. Callers that
/// emit a burst of key events are responsible for terminating it with
/// `write_syn_report`, matching how the kernel groups events between
/// `SYN_REPORT`s.
pub fn write_event<W: Write>(w: &mut W, ev: RawEvent) -> io::Result<()> {
    w.write_all(bytemuck::bytes_of(&ev))
}

pub fn write_syn_report<W: Write>(w: &mut W) -> io::Result<()> {
    write_event(w, RawEvent::syn_report())
}

/// Where the router and macro planner send outgoing events. A trait
/// rather than a bare `Write` so tests can assert on the sequence of
/// key events emitted without going through a byte buffer, and so a
/// real stdout writer and an in-memory recorder look identical to
/// callers.
pub trait EventSink {
    fn emit(&mut self, ev: RawEvent) -> io::Result<()>;

    fn emit_syn_report(&mut self) -> io::Result<()> {
        self.emit(RawEvent::syn_report())
    }

    fn emit_key(&mut self, code: u16, value: i32) -> io::Result<()> {
        self.emit(RawEvent::key(code, value))?;
        self.emit_syn_report()
    }
}

/// Adapts any `Write` (stdout, a file, a test buffer) into an
/// `EventSink`.
pub struct WriterSink<W: Write>(pub W);

impl<W: Write> EventSink for WriterSink<W> {
    fn emit(&mut self, ev: RawEvent) -> io::Result<()> {
        write_event(&mut self.0, ev)
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<RawEvent>,
}

#[cfg(test)]
impl EventSink for RecordingSink {
    fn emit(&mut self, ev: RawEvent) -> io::Result<()> {
        self.events.push(ev);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_bytes() {
        let ev = RawEvent::key(30, KEY_PRESS);
        let mut buf = Vec::new();
        write_event(&mut buf, ev).unwrap();
        let mut cursor = &buf[..];
        let parsed = read_event(&mut cursor).unwrap().unwrap();
        assert_eq!(parsed, ev);
    }

    #[test]
    fn clean_eof_before_any_bytes_returns_none() {
        let mut cursor: &[u8] = &[];
        assert_eq!(read_event(&mut cursor).unwrap(), None);
    }

    #[test]
    fn torn_event_is_an_error() {
        let mut cursor: &[u8] = &[0u8; 4];
        assert!(read_event(&mut cursor).is_err());
    }
}
