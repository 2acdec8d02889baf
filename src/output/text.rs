use super::{Formatter, RunReport};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &RunReport) -> String {
        let s = &report.stats;
        let mut out = format!(
            "{}: {:.2}s, {} frames processed, overruns: {} sample / {} swap",
            report.input,
            report.duration_secs(),
            s.frames_processed,
            s.sample_overruns,
            s.swap_overruns
        );
        if self.verbose {
            out.push_str(&format!(
                "\n  {} Hz, {} frames/buffer, {} buffers handed off, {} DAC underruns, started: {}",
                report.sample_rate,
                report.buffer_size,
                s.buffers_handed_off,
                report.underruns,
                s.playback_started
            ));
        }
        out
    }
}
