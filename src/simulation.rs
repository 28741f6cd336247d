use crate::command::{Command, FrameEvent};
use crate::registry::CallbackRegistry;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub const DEFAULT_CAPTURE_DELAY_MS: u64 = 500;
pub const DEFAULT_POSITION_DELAY_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationPhase {
    Idle,
    Shoot,
    Capture,
    Position,
    FrameComplete,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub total_frames: u32,
    /// Cadence pause after each completed frame, milliseconds.
    pub frame_delay_ms: u64,
    /// Walk the shot frames back with delete commands once done.
    pub delete_on_completion: bool,
    /// Restart at frame 1 after the pass completes.
    pub looped: bool,
}

/// Timer-driven state machine synthesizing a realistic shoot/confirm/
/// reposition cadence, dispatched straight into a [`CallbackRegistry`] with
/// no bytes involved.
///
/// Advance it with [`tick`](SimulationEngine::tick) from the same loop that
/// polls the serial link; timestamps only need to be monotonic, elapsed time
/// is computed with wraparound-tolerant subtraction.
#[derive(Debug)]
pub struct SimulationEngine {
    /// Delay between a shoot and its capture-complete, milliseconds.
    pub capture_delay_ms: u64,
    /// Delay between capture-complete and the reposition, milliseconds.
    pub position_delay_ms: u64,
    config: SimulationConfig,
    active: bool,
    deleting: bool,
    current_frame: u32,
    phase: SimulationPhase,
    last_event_ms: u64,
}

impl SimulationEngine {
    pub fn new() -> Self {
        Self {
            capture_delay_ms: DEFAULT_CAPTURE_DELAY_MS,
            position_delay_ms: DEFAULT_POSITION_DELAY_MS,
            config: SimulationConfig {
                total_frames: 0,
                frame_delay_ms: 0,
                delete_on_completion: false,
                looped: false,
            },
            active: false,
            deleting: false,
            current_frame: 1,
            phase: SimulationPhase::Idle,
            last_event_ms: 0,
        }
    }

    /// Reset counters and begin synthesizing the capture cadence.
    pub fn start(&mut self, config: SimulationConfig, now_ms: u64) {
        debug!(?config, "simulation started");
        self.config = config;
        self.active = true;
        self.deleting = false;
        self.current_frame = 1;
        self.phase = SimulationPhase::Idle;
        self.last_event_ms = now_ms;
    }

    /// Halt advancement before the next tick. Idempotent.
    pub fn stop(&mut self) {
        if self.active {
            debug!("simulation stopped");
        }
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    /// Advance one step, dispatching any command the current phase produces.
    pub fn tick(&mut self, now_ms: u64, registry: &mut CallbackRegistry) {
        if !self.active {
            return;
        }

        let event = FrameEvent::for_frame(self.current_frame.max(1));

        match self.phase {
            SimulationPhase::Idle => {
                if !self.deleting && self.current_frame <= self.config.total_frames {
                    self.advance(SimulationPhase::Shoot, now_ms);
                } else if self.deleting && self.current_frame > 0 {
                    self.advance(SimulationPhase::Delete, now_ms);
                } else if self.config.delete_on_completion && !self.deleting {
                    self.deleting = true;
                } else if self.config.looped {
                    self.current_frame = 1;
                    self.deleting = false;
                }
            }
            SimulationPhase::Shoot => {
                registry.dispatch(&Command::Shoot(event));
                self.advance(SimulationPhase::Capture, now_ms);
            }
            SimulationPhase::Capture => {
                if self.elapsed(now_ms) >= self.capture_delay_ms {
                    registry.dispatch(&Command::CaptureComplete(event));
                    self.advance(SimulationPhase::Position, now_ms);
                }
            }
            SimulationPhase::Position => {
                if self.elapsed(now_ms) >= self.position_delay_ms {
                    registry.dispatch(&Command::Position(event));
                    if !self.deleting {
                        self.current_frame += 1;
                    }
                    self.advance(SimulationPhase::FrameComplete, now_ms);
                }
            }
            SimulationPhase::FrameComplete => {
                if self.elapsed(now_ms) >= self.config.frame_delay_ms {
                    self.advance(SimulationPhase::Idle, now_ms);
                }
            }
            SimulationPhase::Delete => {
                registry.dispatch(&Command::Delete);
                self.current_frame = self.current_frame.saturating_sub(1);
                self.advance(SimulationPhase::Position, now_ms);
            }
        }
    }

    fn advance(&mut self, phase: SimulationPhase, now_ms: u64) {
        trace!(from = ?self.phase, to = ?phase, frame = self.current_frame, "phase transition");
        self.phase = phase;
        self.last_event_ms = now_ms;
    }

    fn elapsed(&self, now_ms: u64) -> u64 {
        now_ms.wrapping_sub(self.last_event_ms)
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}
