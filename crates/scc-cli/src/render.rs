//! Score playback and sample rate conversion

use scc_driver::SccDriver;

use crate::score::{Action, Score};

/// Averages runs of input samples down to a lower output rate.
#[derive(Debug, Clone)]
pub struct BoxDecimator {
    ratio: f64,
    phase: f64,
    acc: i64,
    count: u32,
}

impl BoxDecimator {
    /// Convert from `input_rate` to `output_rate` Hz (`output_rate <= input_rate`).
    pub fn new(input_rate: u32, output_rate: u32) -> Self {
        Self {
            ratio: input_rate as f64 / output_rate.max(1) as f64,
            phase: 0.0,
            acc: 0,
            count: 0,
        }
    }

    /// Feed input samples, appending finished output samples to `out`.
    pub fn process(&mut self, input: &[i16], out: &mut Vec<i16>) {
        for &sample in input {
            self.acc += sample as i64;
            self.count += 1;
            self.phase += 1.0;
            if self.phase >= self.ratio {
                self.phase -= self.ratio;
                out.push((self.acc / self.count as i64) as i16);
                self.acc = 0;
                self.count = 0;
            }
        }
    }
}

/// Play `score` through `driver` for `ticks` song ticks at `tick_rate` Hz.
///
/// Returns mono samples at `output_rate` Hz.
pub fn render(
    driver: &mut SccDriver,
    score: &Score,
    ticks: u32,
    tick_rate: u32,
    output_rate: u32,
) -> Vec<i16> {
    let native_rate = driver.rate();
    let mut decimator = BoxDecimator::new(native_rate, output_rate);
    let mut out = Vec::with_capacity((ticks as u64 * output_rate as u64 / tick_rate as u64) as usize);
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut events = score.events.iter().peekable();
    let mut rendered: u64 = 0;

    for tick in 0..ticks {
        while let Some(event) = events.next_if(|e| e.tick <= tick) {
            match event.action {
                Action::Command { command } => {
                    driver.dispatch(event.channel, command);
                }
                Action::Effect { effect, value } => {
                    if !driver.handle_effect(event.channel, effect, value) {
                        tracing::warn!("tick {tick}: effect {effect:#04x} is not supported, skipped");
                    }
                }
            }
        }
        driver.tick();

        // spread the remainder so long renders do not drift
        let target = (tick as u64 + 1) * native_rate as u64 / tick_rate as u64;
        let frames = (target - rendered) as usize;
        rendered = target;
        left.resize(frames, 0);
        right.resize(frames, 0);
        driver.acquire(&mut left, &mut right);
        decimator.process(&left, &mut out);
    }
    out
}
