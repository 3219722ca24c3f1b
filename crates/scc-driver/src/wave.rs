//! Waveform upload

use scc_core::WAVE_LENGTH;

use crate::register_pool::ChipBus;

/// Write channel `ch`'s synth output into the chip's waveform memory.
///
/// The backend picks the destination window, so on the standard SCC channel 5
/// lands in channel 4's window. Samples in `0..=255` become signed bytes.
pub(crate) fn update_wave(bus: &mut ChipBus, ch: usize, output: &[i32]) {
    let Some(window) = bus.core().map(|core| core.wave_window(ch)) else {
        return;
    };
    let start = (window * WAVE_LENGTH) as u32;
    for (i, &sample) in output.iter().take(WAVE_LENGTH).enumerate() {
        bus.write(start + i as u32, (sample as u8).wrapping_sub(128) as u16);
    }
}
