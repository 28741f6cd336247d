use framelink::{CaptureLink, Clock, Command, CommandKind, RegistryError, SerialPort};

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Default)]
struct PortState {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

/// In-memory serial port; the test keeps a clone sharing the same buffers.
#[derive(Clone, Default)]
struct MockPort(Rc<RefCell<PortState>>);

impl MockPort {
    fn push(&self, bytes: &[u8]) {
        self.0.borrow_mut().rx.extend(bytes.iter().copied());
    }

    fn written(&self) -> Vec<u8> {
        self.0.borrow().tx.clone()
    }
}

impl SerialPort for MockPort {
    fn bytes_available(&self) -> usize {
        self.0.borrow().rx.len()
    }

    fn read_byte(&mut self) -> u8 {
        self.0.borrow_mut().rx.pop_front().unwrap_or(0)
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.0.borrow_mut().tx.extend_from_slice(bytes);
    }
}

#[derive(Clone, Default)]
struct ManualClock(Rc<Cell<u64>>);

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

type Log = Rc<RefCell<Vec<Command>>>;

fn new_link() -> (CaptureLink<MockPort, ManualClock>, MockPort) {
    let port = MockPort::default();
    let link = CaptureLink::new(port.clone(), ManualClock::default());
    (link, port)
}

fn log_into(log: &Log) -> impl FnMut(&Command) + 'static {
    let log = Rc::clone(log);
    move |command| log.borrow_mut().push(*command)
}

fn drain(link: &mut CaptureLink<MockPort, ManualClock>, port: &MockPort) {
    while port.bytes_available() > 0 {
        link.poll();
    }
}

#[test]
fn test_shoot_line_dispatches_exactly_once() {
    let (mut link, port) = new_link();
    let matched: Log = Rc::new(RefCell::new(Vec::new()));
    let all: Log = Rc::new(RefCell::new(Vec::new()));

    link.register(CommandKind::Shoot, log_into(&matched)).unwrap();
    link.register_default(log_into(&all));

    port.push(b"SH 12 34 name1 5\r\n");
    drain(&mut link, &port);

    assert_eq!(matched.borrow().len(), 1);
    let event = *matched.borrow()[0].frame_event().unwrap();
    assert_eq!(event.frame, 12);
    assert_eq!(event.exposure, 34);
    assert_eq!(event.exposure_name.as_str(), "name1");
    assert_eq!(event.stereo_position, 5);

    // The default subscriber saw the same single command.
    assert_eq!(all.borrow().len(), 1);
}

#[test]
fn test_delete_line_dispatches_empty_command() {
    let (mut link, port) = new_link();
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    link.register(CommandKind::Delete, log_into(&log)).unwrap();

    port.push(b"DE\r\n");
    drain(&mut link, &port);

    assert_eq!(*log.borrow(), vec![Command::Delete]);
}

#[test]
fn test_unknown_prefix_dispatches_nothing() {
    let (mut link, port) = new_link();
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    link.register_default(log_into(&log));

    port.push(b"XX\r\n");
    drain(&mut link, &port);

    assert!(log.borrow().is_empty());
}

#[test]
fn test_long_exposure_name_is_capped() {
    let (mut link, port) = new_link();
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    link.register_default(log_into(&log));

    port.push(b"PF 1 1 averyverylongexposurename 2\r\n");
    drain(&mut link, &port);

    let event = *log.borrow()[0].frame_event().unwrap();
    assert_eq!(event.exposure_name.len(), 16);
    assert_eq!(event.exposure_name.as_str(), "averyverylongexp");
    assert_eq!(event.stereo_position, 2);
}

#[test]
fn test_poll_consumes_one_byte_per_call() {
    let (mut link, port) = new_link();
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    link.register_default(log_into(&log));

    let line = b"DE\r\n";
    port.push(line);

    for _ in 0..line.len() - 1 {
        link.poll();
        assert!(log.borrow().is_empty());
    }
    assert_eq!(port.bytes_available(), 1);

    link.poll();
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(port.bytes_available(), 0);
}

#[test]
fn test_outgoing_commands_write_protocol_bytes() {
    let (mut link, port) = new_link();

    link.shoot_frame(5);
    link.delete_frame();
    link.toggle_play();
    link.go_live();

    assert_eq!(port.written(), b"S 5\r\nD\r\nP\r\nL\r\n".to_vec());
}

#[test]
fn test_registration_limit_is_reported() {
    let (mut link, _port) = new_link();

    for _ in 0..framelink::registry::MAX_SUBSCRIBERS {
        link.register(CommandKind::Shoot, |_| {}).unwrap();
    }
    assert_eq!(
        link.register(CommandKind::Shoot, |_| {}),
        Err(RegistryError::SubscriberLimit)
    );
}

#[test]
fn test_garbage_resyncs_on_next_terminator() {
    let (mut link, port) = new_link();
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    link.register_default(log_into(&log));

    port.push(b"QQ 9 garbage\r\nCC 4 2 beauty 1\r\n");
    drain(&mut link, &port);

    assert_eq!(log.borrow().len(), 1);
    assert_eq!(log.borrow()[0].kind(), CommandKind::CaptureComplete);
    assert_eq!(log.borrow()[0].frame_event().unwrap().frame, 4);
}
