use std::time::Instant;

use kiss3d::event::{Action, Key, WindowEvent};
use tracing::{debug, info};

use crate::config::{ZOOM_INITIAL, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};

// Key config, all in one place
const CHARS_ZOOM_IN: [char; 2] = ['+', '='];
const CHARS_ZOOM_OUT: [char; 2] = ['-', '_'];
const KEY_EXIT: Key = Key::Escape;

pub struct Controller {
    zoom: f32,
    exit_requested: bool,
    fps_counter: FpsCounter,
}

pub struct FpsCounter {
    instant: Instant,
    counter: usize,
    window_size_millis: usize,
    previous_fps: f64,
}

impl FpsCounter {
    pub fn new(window_size_millis: usize) -> Self {
        FpsCounter {
            instant: Instant::now(),
            counter: 0,
            previous_fps: 0.0,
            window_size_millis,
        }
    }

    pub fn reset(&mut self) {
        self.instant = Instant::now();
        self.counter = 0;
    }

    pub fn value(&self) -> f64 {
        self.previous_fps
    }

    /// Counts a frame. Returns the new rate whenever a measurement window closes.
    pub fn increment(&mut self) -> Option<f64> {
        self.counter += 1;

        let elapsed = self.instant.elapsed();
        if elapsed.as_millis() > self.window_size_millis as u128 {
            self.previous_fps = (1000 * self.counter) as f64 / elapsed.as_millis() as f64;
            self.reset();
            return Some(self.previous_fps);
        }
        None
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Controller {
            zoom: ZOOM_INITIAL,
            exit_requested: false,
            fps_counter: FpsCounter::new(1000),
        }
    }

    pub fn process_event(&mut self, event: &WindowEvent) {
        match *event {
            WindowEvent::Char(c) if CHARS_ZOOM_IN.contains(&c) => self.zoom_in(),
            WindowEvent::Char(c) if CHARS_ZOOM_OUT.contains(&c) => self.zoom_out(),
            WindowEvent::Key(KEY_EXIT, Action::Press, _) => {
                info!("Exit requested");
                self.exit_requested = true;
            }
            _ => {}
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = f32::max(ZOOM_MIN, self.zoom - ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = f32::min(ZOOM_MAX, self.zoom + ZOOM_STEP);
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn fps(&self) -> f64 {
        self.fps_counter.value()
    }

    pub fn increment_frame_counter(&mut self) {
        if let Some(fps) = self.fps_counter.increment() {
            debug!("Frame rate: {:.1} fps", fps);
        }
    }
}
