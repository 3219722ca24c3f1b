//! Driver lifecycle, audio acquisition and host-facing controls

use std::sync::Arc;

use scc_common::{
    Instrument, OscBuffer, PitchContext, Song, CHANNEL_COUNT, CHIP_DIVIDER, COLOR_NTSC,
    SAMPLE_RATE_DIVIDER,
};
use scc_core::{ChipModel, RegisterName, SccBackend, REG_ENABLE, REG_VOLUME};

use crate::channel::{Channel, VOLUME_MAX};
use crate::config::DriverConfig;
use crate::error::Result;
use crate::register_pool::{ChipBus, RegWrite, REGISTER_POOL_SIZE};
use crate::wave::update_wave;

/// Virtual driver for one SCC or SCC+ chip
///
/// Commands arrive through [`dispatch`](Self::dispatch), [`tick`](Self::tick)
/// runs once per song tick and [`acquire`](Self::acquire) renders audio at
/// [`rate`](Self::rate). All three take `&mut self`; a host that renders on
/// another thread moves the driver there.
#[derive(Debug)]
pub struct SccDriver {
    pub(crate) model: ChipModel,
    pub(crate) song: Arc<Song>,
    pub(crate) bus: ChipBus,
    pub(crate) channels: [Channel; CHANNEL_COUNT],
    pub(crate) muted: [bool; CHANNEL_COUNT],
    pub(crate) pitch: PitchContext,
    pub(crate) base: u32,
    osc: Vec<OscBuffer>,
    chip_clock: u32,
    rate: u32,
}

impl SccDriver {
    /// Build a driver for `config.model` playing `song`, then reset it.
    pub fn init(song: Arc<Song>, config: DriverConfig) -> Result<Self> {
        song.validate()?;

        let model = config.model;
        let core = model.create_backend();
        let base = core.register_base() as u32;
        let chip_clock = COLOR_NTSC;
        let rate = chip_clock / SAMPLE_RATE_DIVIDER;

        let mut bus = ChipBus::new(core);
        bus.set_dump(config.dump_writes);

        let mut driver = Self {
            model,
            pitch: pitch_context(&song, chip_clock),
            channels: std::array::from_fn(|_| Channel::new(song.clone())),
            song,
            bus,
            muted: [false; CHANNEL_COUNT],
            base,
            osc: (0..CHANNEL_COUNT).map(|_| OscBuffer::new(rate)).collect(),
            chip_clock,
            rate,
        };
        log::debug!(
            "scc driver init: model={model}, clock={chip_clock} Hz, rate={rate} Hz, base={base:#04x}"
        );
        driver.reset();
        driver.bus.set_skip(config.skip_register_writes);
        Ok(driver)
    }

    /// Return every channel and the chip to their power-on state.
    ///
    /// The volume registers are rewritten to 15, so the pool after a reset is
    /// the same no matter what played before.
    pub fn reset(&mut self) {
        self.bus.pool_mut().clear();
        if let Some(core) = self.bus.core_mut() {
            core.reset();
        }
        for ch in 0..CHANNEL_COUNT {
            self.channels[ch] = Channel::new(self.song.clone());
            self.bus
                .write(self.base + REG_VOLUME as u32 + ch as u32, VOLUME_MAX as u16);
        }
        if self.bus.is_dumping() {
            self.bus.log_mut().mark_boundary();
        }
        log::debug!("scc driver reset");
    }

    /// Release the chip core and the oscilloscope buffers.
    ///
    /// A released driver keeps answering calls but no longer produces sound.
    pub fn quit(&mut self) {
        self.bus.release_core();
        self.osc.clear();
        log::debug!("scc driver released");
    }

    /// Whether [`quit`](Self::quit) has not been called.
    pub fn is_running(&self) -> bool {
        self.bus.core().is_some()
    }

    /// Render `min(left.len(), right.len())` frames at [`rate`](Self::rate).
    ///
    /// Each frame runs 16 core steps. The chip is mono, so both sides get the
    /// same sample; each channel's raw output also goes to its scope buffer.
    pub fn acquire(&mut self, left: &mut [i16], right: &mut [i16]) {
        let Some(core) = self.bus.core_mut() else {
            left.fill(0);
            right.fill(0);
            return;
        };
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            for _ in 0..SAMPLE_RATE_DIVIDER {
                core.tick();
            }
            let out = saturate(core.out() << 5);
            *l = out;
            *r = out;

            for (ch, osc) in self.osc.iter_mut().enumerate() {
                osc.push(saturate(core.chan_out(ch) << 7));
            }
        }
    }

    /// Mute or unmute a channel. Unmuting re-enables it only if a note is playing.
    pub fn mute_channel(&mut self, ch: usize, mute: bool) {
        self.muted[ch] = mute;
        let enable = self.base + REG_ENABLE as u32;
        if mute {
            self.bus.set_enable(enable, ch, false);
        } else if self.channels[ch].active {
            self.bus.set_enable(enable, ch, true);
        }
        log::debug!("scc channel {ch} {}", if mute { "muted" } else { "unmuted" });
    }

    /// Whether a channel is muted.
    pub fn is_muted(&self, ch: usize) -> bool {
        self.muted[ch]
    }

    /// Rebuild all channel output after the host restored a state.
    ///
    /// Synth state is reinitialized on the next note, frequencies are rewritten
    /// on the next tick and waveforms are uploaded now.
    pub fn force_ins(&mut self) {
        for (ch, chan) in self.channels.iter_mut().enumerate() {
            chan.ins_changed = true;
            chan.freq_changed = true;
            update_wave(&mut self.bus, ch, chan.synth.output());
        }
    }

    /// Wavetable `wave` was edited; reload it on every channel using it.
    pub fn notify_wave_change(&mut self, wave: usize) {
        for (ch, chan) in self.channels.iter_mut().enumerate() {
            if chan.wave == Some(wave) {
                chan.synth.change_wave1(wave);
                update_wave(&mut self.bus, ch, chan.synth.output());
            }
        }
    }

    /// `instrument` is being deleted; stop any macros it drives.
    pub fn notify_instrument_removed(&mut self, instrument: &Arc<Instrument>) {
        for chan in self.channels.iter_mut() {
            chan.macros.notify_instrument_removed(instrument);
        }
    }

    /// Swap the song instruments and wavetables are read from.
    pub fn set_song(&mut self, song: Arc<Song>) -> Result<()> {
        song.validate()?;
        self.pitch = pitch_context(&song, self.chip_clock);
        for chan in self.channels.iter_mut() {
            chan.synth.set_song(song.clone());
        }
        self.song = song;
        Ok(())
    }

    /// Suppress register writes (seeking). Pokes still apply.
    pub fn set_skip_register_writes(&mut self, skip: bool) {
        self.bus.set_skip(skip);
    }

    /// Record applied writes in the write log.
    pub fn set_dump_writes(&mut self, dump: bool) {
        self.bus.set_dump(dump);
    }

    /// Recorded writes so far.
    pub fn write_log(&self) -> &[RegWrite] {
        self.bus.log().entries()
    }

    /// Remove and return the recorded writes.
    pub fn take_write_log(&mut self) -> Vec<RegWrite> {
        self.bus.log_mut().take()
    }

    /// Write one register, regardless of write suppression.
    pub fn poke(&mut self, addr: u32, value: u16) {
        self.bus.poke(addr, value);
    }

    /// Write a batch of registers in order, regardless of write suppression.
    pub fn poke_all(&mut self, writes: &[RegWrite]) {
        for w in writes {
            self.bus.poke(w.addr, w.val);
        }
    }

    /// State of channel `ch`.
    pub fn channel(&self, ch: usize) -> &Channel {
        &self.channels[ch]
    }

    /// Chip core, until the driver is released.
    pub fn chip(&self) -> Option<&dyn SccBackend> {
        self.bus.core()
    }

    /// Scope buffer of channel `ch`, until the driver is released.
    pub fn osc_buffer(&self, ch: usize) -> Option<&OscBuffer> {
        self.osc.get(ch)
    }

    /// Last value written to every register address.
    pub fn register_pool(&self) -> &[u8] {
        self.bus.pool().as_slice()
    }

    /// Size of [`register_pool`](Self::register_pool).
    pub fn register_pool_size(&self) -> usize {
        REGISTER_POOL_SIZE
    }

    /// Register names and addresses for the configured variant.
    pub fn register_sheet(&self) -> &'static [RegisterName] {
        self.model.register_sheet()
    }

    /// Configured chip variant.
    pub fn model(&self) -> ChipModel {
        self.model
    }

    /// Address of the first frequency register.
    pub fn register_base(&self) -> u32 {
        self.base
    }

    /// The chip has a single output.
    pub fn is_stereo(&self) -> bool {
        false
    }

    /// Output sample rate in Hz.
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Chip clock in Hz.
    pub fn chip_clock(&self) -> u32 {
        self.chip_clock
    }

    /// Song the driver reads from.
    pub fn song(&self) -> &Arc<Song> {
        &self.song
    }

    pub(crate) fn instrument_of(&self, ch: usize) -> Option<Arc<Instrument>> {
        self.channels[ch]
            .ins
            .and_then(|index| self.song.instrument(index))
    }
}

fn pitch_context(song: &Song, clock: u32) -> PitchContext {
    PitchContext::new(clock, CHIP_DIVIDER, song.compat.tuning).with_linear(song.compat.linear_pitch)
}

#[inline]
fn saturate(sample: i32) -> i16 {
    sample.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}
