/// Lifecycle of the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for the first particle set.
    Idle,
    /// A frame may run and the host should ask for the next one.
    Running,
    /// Torn down. Terminal: no frame runs and nothing is rescheduled.
    Cancelled,
}

/// Host-agnostic frame loop state.
///
/// The host asks [`FrameLoop::begin_frame`] before doing any work in a frame
/// callback and [`FrameLoop::should_reschedule`] before requesting the next one,
/// so a cancellation between the two is always honored.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    state: LoopState,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            frames: 0,
        }
    }

    /// Idle → Running. Returns false if the loop was already cancelled.
    pub fn start(&mut self) -> bool {
        match self.state {
            LoopState::Idle => {
                self.state = LoopState::Running;
                true
            }
            LoopState::Running => true,
            LoopState::Cancelled => false,
        }
    }

    /// Whether this frame should run. Counts the frames that did.
    pub fn begin_frame(&mut self) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        self.frames += 1;
        true
    }

    pub fn should_reschedule(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn cancel(&mut self) {
        self.state = LoopState::Cancelled;
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames run since start.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}
