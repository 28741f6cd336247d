use crate::command::{Command, CommandKind, FrameEvent};
use tracing::{debug, trace};

/// Parser position within a message. There is no terminal state; a completed
/// message returns the parser to `Start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Start,
    CommandPrefix,
    PreFrame,
    Frame,
    Exposure,
    ExposureName,
    Stereo,
}

/// Incremental protocol parser reconstructing commands from an unterminated
/// byte stream.
///
/// One byte per [`feed`](StreamParser::feed) call; a message may span
/// arbitrarily many calls. Malformed input never errors — the parser resets
/// to `Start` and the next CR LF resynchronizes the stream.
#[derive(Debug)]
pub struct StreamParser {
    state: ParseState,
    pending: Option<CommandKind>,
    event: FrameEvent,
    accumulator: u32,
    last_byte: u8,
}

impl StreamParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::Start,
            pending: None,
            event: FrameEvent::default(),
            accumulator: 0,
            last_byte: 0,
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Consume one byte, returning a command only when the CR LF terminator
    /// has just completed a message.
    pub fn feed(&mut self, byte: u8) -> Option<Command> {
        // The terminator completes the message regardless of current state.
        if byte == b'\n' && self.last_byte == b'\r' {
            return self.complete();
        }

        match self.state {
            ParseState::Start => {
                self.pending = None;
                self.event = FrameEvent::default();
                self.accumulator = 0;
                self.state = ParseState::CommandPrefix;
            }
            ParseState::CommandPrefix => match (self.last_byte, byte) {
                (b'S', b'H') => {
                    self.pending = Some(CommandKind::Shoot);
                    self.accumulator = 0;
                    self.state = ParseState::PreFrame;
                }
                (b'P', b'F') => {
                    self.pending = Some(CommandKind::Position);
                    self.accumulator = 0;
                    self.state = ParseState::PreFrame;
                }
                (b'C', b'C') => {
                    self.pending = Some(CommandKind::CaptureComplete);
                    self.accumulator = 0;
                    self.state = ParseState::PreFrame;
                }
                // Delete carries no fields; completion happens purely on the
                // terminator, so the state stays put until the CR falls into
                // the arm below.
                (b'D', b'E') => {
                    self.pending = Some(CommandKind::Delete);
                }
                _ => {
                    trace!(last = self.last_byte, byte, "unrecognized prefix, resync");
                    self.state = ParseState::Start;
                }
            },
            ParseState::PreFrame => {
                if byte == b' ' {
                    self.state = ParseState::Frame;
                } else {
                    trace!(byte, "missing frame separator, resync");
                    self.pending = None;
                    self.state = ParseState::Start;
                }
            }
            ParseState::Frame => {
                if byte == b' ' {
                    self.event.frame = self.accumulator;
                    self.accumulator = 0;
                    self.state = ParseState::Exposure;
                } else {
                    self.accumulate_digit(byte);
                }
            }
            ParseState::Exposure => {
                if byte == b' ' {
                    self.event.exposure = self.accumulator;
                    self.accumulator = 0;
                    self.state = ParseState::ExposureName;
                } else {
                    self.accumulate_digit(byte);
                }
            }
            ParseState::ExposureName => {
                if byte == b' ' {
                    self.accumulator = 0;
                    self.state = ParseState::Stereo;
                } else {
                    // Silent drop past the 16-character cap.
                    let _ = self.event.exposure_name.try_push(char::from(byte));
                }
            }
            // Only the terminator ends the stereo field.
            ParseState::Stereo => self.accumulate_digit(byte),
        }

        self.last_byte = byte;
        None
    }

    fn complete(&mut self) -> Option<Command> {
        if self.state == ParseState::Stereo {
            self.event.stereo_position = self.accumulator;
        }
        self.state = ParseState::Start;

        let command = match self.pending.take()? {
            CommandKind::Shoot => Command::Shoot(self.event),
            CommandKind::Delete => Command::Delete,
            CommandKind::CaptureComplete => Command::CaptureComplete(self.event),
            CommandKind::Position => Command::Position(self.event),
        };
        debug!(?command, "message completed");
        Some(command)
    }

    fn accumulate_digit(&mut self, byte: u8) {
        if byte.is_ascii_digit() {
            // Decimal shift, wrapping past u32::MAX by design.
            self.accumulator = self
                .accumulator
                .wrapping_mul(10)
                .wrapping_add(u32::from(byte - b'0'));
        }
    }
}

impl Default for StreamParser {
    fn default() -> Self {
        Self::new()
    }
}
