//! Where rendered values go.

use crate::models::RenderFrame;

/// Receives every applied value: bar width in percent, raw value for the
/// accessibility attribute, and label text.
pub trait RenderSink {
    fn render(&self, frame: &RenderFrame);
}

impl<F> RenderSink for F
where
    F: Fn(&RenderFrame),
{
    fn render(&self, frame: &RenderFrame) {
        self(frame)
    }
}

/// Sink for hosts that only care about events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn render(&self, _frame: &RenderFrame) {}
}
