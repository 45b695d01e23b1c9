//! Interrupt controller doubles.

use std::sync::Mutex;

use vusim_core::soc::InterruptSink;

mockall::mock! {
    pub Interrupts {}

    impl InterruptSink for Interrupts {
        fn raise(&self, line: u32);
    }
}

/// Interrupt controller that records every raised line in order.
#[derive(Debug, Default)]
pub struct RecordingInterrupts {
    lines: Mutex<Vec<u32>>,
}

impl RecordingInterrupts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines raised so far.
    pub fn raised(&self) -> Vec<u32> {
        self.lines.lock().unwrap().clone()
    }
}

impl InterruptSink for RecordingInterrupts {
    fn raise(&self, line: u32) {
        self.lines.lock().unwrap().push(line);
    }
}
