// Oyars Event Ingestion
// One reader task per source device feeding a single consumer queue

use std::os::unix::io::AsRawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use evdev::Device;

use crate::input::device::DeviceError;
use crate::input::event::RawEvent;

/// Poll timeout for each reader iteration; bounds how long a reader takes
/// to observe the shutdown flag.
const READER_POLL_MS: i32 = 100;

/// A grabbed source device owned by one reader task.
///
/// The grab is released when the reader is dropped, which runs on normal
/// shutdown and during panic unwinding alike; leaving a device grabbed
/// would render the keyboard unusable.
pub struct SourceReader {
    device: Device,
    grabbed: bool,
}

impl SourceReader {
    /// Open a reader over a device, optionally taking the exclusive grab.
    ///
    /// Ungrabs first to recover from a previous instance that crashed
    /// while holding the grab.
    pub fn new(mut device: Device, grab: bool) -> Result<Self, DeviceError> {
        if grab {
            let _ = device.ungrab();
            device.grab()?;
        }
        Ok(Self {
            device,
            grabbed: grab,
        })
    }

    /// Source device name
    pub fn name(&self) -> String {
        self.device.name().unwrap_or("Unknown").to_string()
    }

    fn poll_readable(&self, timeout_ms: i32) -> std::io::Result<bool> {
        let mut fds = [libc::pollfd {
            fd: self.device.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        }];

        let result = unsafe { libc::poll(fds.as_mut_ptr(), 1, timeout_ms) };
        if result < 0 {
            let err = std::io::Error::last_os_error();
            // EINTR just means a signal was delivered; treat as a timeout
            if err.kind() == std::io::ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(err);
        }
        Ok(result > 0 && fds[0].revents & libc::POLLIN != 0)
    }

    /// Reader loop: decode events and push them into the queue until the
    /// shutdown flag is set or the consumer goes away.
    pub fn run(mut self, tx: Sender<RawEvent>, running: Arc<AtomicBool>) {
        let name = self.name();
        while running.load(Ordering::SeqCst) {
            match self.poll_readable(READER_POLL_MS) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    log::error!("reader '{}' poll failed: {}", name, e);
                    break;
                }
            }

            let events = match self.device.fetch_events() {
                Ok(events) => events,
                Err(e) => {
                    log::error!("reader '{}' read failed: {}", name, e);
                    break;
                }
            };

            for event in events {
                let raw = RawEvent::new(event.event_type().0, event.code(), event.value());
                if tx.send(raw).is_err() {
                    // consumer gone; nothing left to do
                    return;
                }
            }
        }
    }

    fn release_grab(&mut self) {
        if self.grabbed {
            if let Err(e) = self.device.ungrab() {
                log::warn!("failed to release grab: {}", e);
            }
            self.grabbed = false;
        }
    }
}

impl Drop for SourceReader {
    fn drop(&mut self) {
        self.release_grab();
    }
}

/// The single ordered event queue fed by all source readers.
///
/// Events from the same source preserve source order; events from
/// different sources interleave in arrival order.
pub struct EventQueue {
    receiver: Receiver<RawEvent>,
    handles: Vec<JoinHandle<()>>,
}

impl EventQueue {
    /// Wait for the next event, up to `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<RawEvent, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Number of reader tasks feeding the queue
    pub fn reader_count(&self) -> usize {
        self.handles.len()
    }

    /// Wait for all readers to exit and release their grabs.
    ///
    /// Callers set the shutdown flag first; each reader observes it within
    /// one poll interval.
    pub fn join(self) {
        drop(self.receiver);
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}

/// Grab all devices and spawn one reader task per device.
///
/// Grabs are acquired up front so that a failure on any device surfaces
/// before a single event is consumed.
pub fn spawn_readers(
    devices: Vec<Device>,
    grab: bool,
    running: &Arc<AtomicBool>,
) -> Result<EventQueue, DeviceError> {
    let mut readers = Vec::with_capacity(devices.len());
    for device in devices {
        readers.push(SourceReader::new(device, grab)?);
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let mut handles = Vec::with_capacity(readers.len());
    for reader in readers {
        let tx = tx.clone();
        let running = Arc::clone(running);
        log::info!("reading events from '{}'", reader.name());
        handles.push(std::thread::spawn(move || reader.run(tx, running)));
    }

    Ok(EventQueue {
        receiver: rx,
        handles,
    })
}
