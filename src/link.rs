use crate::command::{Command, CommandKind};
use crate::encoder;
use crate::parser::StreamParser;
use crate::registry::{CallbackRegistry, RegistryError};
use crate::simulation::{SimulationConfig, SimulationEngine};
use tracing::trace;

/// Byte source/sink collaborator, typically a UART driver.
pub trait SerialPort {
    fn bytes_available(&self) -> usize;
    fn read_byte(&mut self) -> u8;
    fn write_bytes(&mut self, bytes: &[u8]);
}

/// Monotonic clock collaborator.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Orchestrator tying the parser, registry, and simulation engine to a
/// serial port and a clock. Owns all state explicitly; there are no
/// process-wide singletons.
///
/// Drive it by calling [`poll`](CaptureLink::poll) from the main loop. Each
/// poll is cooperative and non-blocking: at most one byte moves through the
/// parser and the simulation advances one tick.
pub struct CaptureLink<P: SerialPort, C: Clock> {
    port: P,
    clock: C,
    parser: StreamParser,
    registry: CallbackRegistry,
    simulation: SimulationEngine,
}

impl<P: SerialPort, C: Clock> CaptureLink<P, C> {
    pub fn new(port: P, clock: C) -> Self {
        Self {
            port,
            clock,
            parser: StreamParser::new(),
            registry: CallbackRegistry::new(),
            simulation: SimulationEngine::new(),
        }
    }

    /// Subscribe to commands of one kind. See [`CallbackRegistry::register`].
    pub fn register<F>(&mut self, kind: CommandKind, callback: F) -> Result<(), RegistryError>
    where
        F: FnMut(&Command) + 'static,
    {
        self.registry.register(kind, callback)
    }

    /// Install the catch-all subscriber, replacing any previous one.
    pub fn register_default<F>(&mut self, callback: F)
    where
        F: FnMut(&Command) + 'static,
    {
        self.registry.register_default(callback);
    }

    /// One cooperative step: read at most one byte through the parser,
    /// dispatch any completed command, then tick the simulation.
    pub fn poll(&mut self) {
        if self.port.bytes_available() > 0 {
            let byte = self.port.read_byte();
            if let Some(command) = self.parser.feed(byte) {
                self.registry.dispatch(&command);
            }
        }
        self.simulation.tick(self.clock.now_ms(), &mut self.registry);
    }

    /// Ask the host to shoot `frame_count` frames.
    pub fn shoot_frame(&mut self, frame_count: u32) {
        self.write(encoder::shoot(frame_count).as_bytes());
    }

    /// Ask the host to delete the last frame.
    pub fn delete_frame(&mut self) {
        self.write(encoder::delete().as_bytes());
    }

    /// Toggle playback on the host.
    pub fn toggle_play(&mut self) {
        self.write(encoder::toggle_play().as_bytes());
    }

    /// Switch the host to the live feed.
    pub fn go_live(&mut self) {
        self.write(encoder::go_live().as_bytes());
    }

    /// Begin synthesizing the capture cadence instead of waiting for real
    /// host traffic. Subscribers see the same dispatches either way.
    pub fn start_simulation(&mut self, config: SimulationConfig) {
        let now_ms = self.clock.now_ms();
        self.simulation.start(config, now_ms);
    }

    pub fn stop_simulation(&mut self) {
        self.simulation.stop();
    }

    pub fn simulation(&self) -> &SimulationEngine {
        &self.simulation
    }

    /// Mutable access for tuning the capture/position delays.
    pub fn simulation_mut(&mut self) -> &mut SimulationEngine {
        &mut self.simulation
    }

    fn write(&mut self, bytes: &[u8]) {
        trace!(len = bytes.len(), "writing command bytes");
        self.port.write_bytes(bytes);
    }
}
