//! # Framelink
//!
//! Stop-motion capture link for controllers talking to a host application
//! over a byte-oriented serial line, with a hardware-free simulation path
//! for exercising the exchange in tests.
//!
//! ## Features
//!
//! - **Incremental protocol parser**: byte-at-a-time state machine that
//!   reconstructs discrete commands from an unterminated stream and
//!   resynchronizes silently on garbage
//! - **Callback dispatch**: ordered per-kind subscriber lists plus a
//!   catch-all default subscriber
//! - **Command encoding**: outbound shoot/delete/play/live messages into
//!   fixed-capacity buffers
//! - **Capture simulation**: timer-driven engine reproducing the
//!   shoot/confirm/reposition cadence without a live connection
//! - **Embedded-friendly**: bounded memory, no blocking, poll-driven
//!
//! ## Quick Start
//!
//! ```rust
//! use framelink::StreamParser;
//!
//! let mut parser = StreamParser::new();
//! let mut received = None;
//!
//! for &byte in b"SH 12 1 main 0\r\n" {
//!     if let Some(command) = parser.feed(byte) {
//!         received = Some(command);
//!     }
//! }
//!
//! let event = received.unwrap().frame_event().copied().unwrap();
//! assert_eq!(event.frame, 12);
//! ```
//!
//! ## Architecture
//!
//! - [`command`] - protocol message model
//! - [`parser`] - incremental byte-stream parser
//! - [`registry`] - subscriber registration and dispatch
//! - [`encoder`] - outbound command formatting
//! - [`simulation`] - capture cadence simulator
//! - [`link`] - orchestrator over serial-port and clock collaborators

#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod encoder;
pub mod link;
pub mod parser;
pub mod registry;
pub mod simulation;

// Re-export main public types for convenience
pub use command::{Command, CommandKind, FrameEvent};
pub use link::{CaptureLink, Clock, SerialPort};
pub use parser::{ParseState, StreamParser};
pub use registry::{CallbackRegistry, RegistryError};
pub use simulation::{SimulationConfig, SimulationEngine, SimulationPhase};
