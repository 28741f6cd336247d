use arrayvec::ArrayString;
use serde::{Deserialize, Serialize};

/// Wire limit for the exposure pass label; bytes past this are dropped.
pub const EXPOSURE_NAME_MAX_LEN: usize = 16;

pub type ExposureName = ArrayString<EXPOSURE_NAME_MAX_LEN>;

/// Registry key for a command without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    Shoot,
    Delete,
    CaptureComplete,
    Position,
}

/// Payload shared by the frame-carrying commands.
///
/// Numeric fields are accumulated on the wire by decimal digit-shifting with
/// no overflow guard; values past `u32::MAX` wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameEvent {
    pub frame: u32,
    pub exposure: u32,
    pub exposure_name: ExposureName,
    pub stereo_position: u32,
}

impl FrameEvent {
    pub fn for_frame(frame: u32) -> Self {
        Self {
            frame,
            ..Self::default()
        }
    }
}

/// A complete protocol message received from the host application.
///
/// `Delete` is a unit variant: the wire format defines no payload for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Shoot(FrameEvent),
    Delete,
    CaptureComplete(FrameEvent),
    Position(FrameEvent),
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Shoot(_) => CommandKind::Shoot,
            Command::Delete => CommandKind::Delete,
            Command::CaptureComplete(_) => CommandKind::CaptureComplete,
            Command::Position(_) => CommandKind::Position,
        }
    }

    /// Frame payload; `None` for `Delete`.
    pub fn frame_event(&self) -> Option<&FrameEvent> {
        match self {
            Command::Shoot(event)
            | Command::CaptureComplete(event)
            | Command::Position(event) => Some(event),
            Command::Delete => None,
        }
    }
}
