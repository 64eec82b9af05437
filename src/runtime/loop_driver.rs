//! Frame loop driver
//!
//! The host pushes monotonic timestamps in; the driver turns them into `dt`
//! and refuses to step once it is stopped or its view is no longer visible.

/// Is the owning view still on screen?
pub type Visibility = Box<dyn Fn() -> bool>;

/// What a frame should do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameTick {
    /// Driver is disarmed, nothing to do
    Stopped,
    /// View went away; the driver has stopped itself
    Hidden,
    /// Step the simulation by `dt` seconds
    Step { dt: f32 },
}

pub struct LoopDriver {
    running: bool,
    last_ts: Option<f64>,
    visible: Visibility,
}

impl LoopDriver {
    pub fn new(visible: impl Fn() -> bool + 'static) -> Self {
        Self {
            running: false,
            last_ts: None,
            visible: Box::new(visible),
        }
    }

    /// Driver for a surface that is always shown (headless runs)
    pub fn always_visible() -> Self {
        Self::new(|| true)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Arm the driver; the next frame has `dt = 0`
    pub fn start(&mut self) {
        self.running = true;
        self.last_ts = None;
    }

    /// Disarm; safe to call repeatedly
    pub fn stop(&mut self) {
        self.running = false;
        self.last_ts = None;
    }

    /// Accept a frame at `ts_ms` (monotonic milliseconds)
    pub fn advance(&mut self, ts_ms: f64) -> FrameTick {
        if !self.running {
            return FrameTick::Stopped;
        }

        let last = *self.last_ts.get_or_insert(ts_ms);
        self.last_ts = Some(ts_ms);
        let dt = ((ts_ms - last).max(0.0) / 1000.0) as f32;

        if !(self.visible)() {
            log::debug!("View hidden, stopping frame loop");
            self.stop();
            return FrameTick::Hidden;
        }

        FrameTick::Step { dt }
    }
}
