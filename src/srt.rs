use crate::timestamp;

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Subtitle {
    pub(crate) sequence_number: usize,
    pub(crate) show_at: Duration,
    pub(crate) hide_at: Duration,
    /// Trailing text of the timing line, kept verbatim.
    pub(crate) position: Option<String>,
    pub(crate) text: Vec<String>,
}

impl Subtitle {
    /// Rescales both timestamps from the `fps_in` timeline to the `fps_out` timeline.
    pub fn stretch(&mut self, fps_in: f64, fps_out: f64) {
        self.show_at = timestamp::rescale(self.show_at, fps_in, fps_out);
        self.hide_at = timestamp::rescale(self.hide_at, fps_in, fps_out);
    }
}
