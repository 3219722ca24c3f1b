use std::sync::Arc;

use scc_common::{
    note_period, Instrument, InstrumentMacros, MacroData, MacroMode, Song, WaveSynthEffect,
    WaveSynthParams, Wavetable, CHIP_DIVIDER, COLOR_NTSC, DEFAULT_TUNING,
};
use scc_core::ChipModel;
use scc_driver::{Command, DriverConfig, RegWrite, Response, SccDriver};

fn next_rand(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(214013).wrapping_add(2531011);
    (*seed >> 16) & 0x7fff
}

fn rand_range(seed: &mut u32, lo: i32, hi: i32) -> i32 {
    lo + (next_rand(seed) % (hi - lo + 1) as u32) as i32
}

fn period(note: i32) -> i32 {
    note_period(note, COLOR_NTSC, CHIP_DIVIDER, DEFAULT_TUNING)
}

fn test_song() -> Song {
    Song {
        instruments: vec![
            Arc::new(Instrument::named("plain")),
            Arc::new(Instrument {
                name: "wobble".to_string(),
                macros: InstrumentMacros {
                    vol: MacroData::from_values([15, 12, 9, 12]).looped(1),
                    arp: MacroData::from_values([0, 12, 7]).looped(0),
                    pitch: MacroData::from_values([40, -25, 60]).looped(0),
                    ..InstrumentMacros::default()
                },
                wave_synth: WaveSynthParams {
                    enabled: true,
                    wave1: 0,
                    wave2: 1,
                    effect: WaveSynthEffect::Fade,
                    ..WaveSynthParams::default()
                },
            }),
        ],
        wavetables: vec![
            Wavetable::new((0..32).collect::<Vec<_>>(), 31),
            Wavetable::new((0..32).rev().collect::<Vec<_>>(), 31),
        ],
        ..Song::default()
    }
}

fn driver(model: ChipModel) -> SccDriver {
    SccDriver::init(Arc::new(test_song()), DriverConfig::default().with_model(model)).unwrap()
}

fn random_command(seed: &mut u32) -> Command {
    match next_rand(seed) % 10 {
        0 => Command::NoteOn {
            note: Some(rand_range(seed, 0, 119)),
        },
        1 => Command::NoteOff,
        2 => Command::EnvRelease,
        3 => Command::Instrument {
            index: (next_rand(seed) % 3) as usize,
            force: next_rand(seed) & 1 == 1,
        },
        4 => Command::Volume(rand_range(seed, -5, 20)),
        5 => Command::Pitch(rand_range(seed, -5000, 5000)),
        6 => Command::Wave((next_rand(seed) % 3) as usize),
        7 => Command::NotePorta {
            step: rand_range(seed, 1, 64),
            target: rand_range(seed, 0, 119),
        },
        8 => Command::Legato(rand_range(seed, 0, 119)),
        _ => Command::PrePorta {
            in_porta: next_rand(seed) & 1 == 1,
            starting: next_rand(seed) & 1 == 1,
        },
    }
}

#[test]
fn relative_pitch_macro_stays_in_range() {
    let mut seed = 0x5cc0_0001;
    for _ in 0..8 {
        let values: Vec<i32> = (0..16).map(|_| rand_range(&mut seed, -900, 900)).collect();
        let song = Song {
            instruments: vec![Arc::new(Instrument {
                macros: InstrumentMacros {
                    pitch: MacroData::from_values(values).looped(0),
                    ..InstrumentMacros::default()
                },
                ..Instrument::default()
            })],
            ..Song::default()
        };
        let mut drv = SccDriver::init(Arc::new(song), DriverConfig::default()).unwrap();
        drv.dispatch(0, Command::Instrument { index: 0, force: false });
        drv.dispatch(0, Command::NoteOn { note: Some(60) });
        for _ in 0..500 {
            drv.tick();
            let pitch2 = drv.channel(0).pitch2;
            assert!((-2048..=2048).contains(&pitch2), "pitch2 {pitch2} out of range");
        }
    }
}

#[test]
fn random_traffic_keeps_registers_in_range() {
    let mut seed = 1234;
    for model in [ChipModel::Scc, ChipModel::SccPlus] {
        let mut drv = driver(model);
        let base = drv.register_base() as usize;
        for _ in 0..3000 {
            let ch = (next_rand(&mut seed) % 5) as usize;
            drv.dispatch(ch, random_command(&mut seed));
            if next_rand(&mut seed) % 3 == 0 {
                drv.tick();
                let pool = drv.register_pool();
                for ch in 0..5 {
                    let chan = drv.channel(ch);
                    assert!((0..=4095).contains(&chan.freq));
                    assert!((0..=15).contains(&chan.out_vol));
                    let written = pool[base + 2 * ch] as i32 | ((pool[base + 2 * ch + 1] as i32) << 8);
                    assert!(written <= 4095);
                    assert!(pool[base + 10 + ch] <= 15);
                }
            }
        }
    }
}

#[test]
fn note_on_sets_only_its_enable_bit() {
    let mut drv = driver(ChipModel::Scc);
    drv.dispatch(1, Command::NoteOn { note: Some(40) });
    drv.dispatch(3, Command::NoteOn { note: Some(40) });
    assert_eq!(drv.register_pool()[0x8f], 0b01010);

    drv.dispatch(4, Command::NoteOn { note: None });
    assert!(drv.channel(4).active);
    assert_eq!(drv.register_pool()[0x8f], 0b11010);
}

#[test]
fn portamento_reaches_target_exactly_once() {
    let mut drv = driver(ChipModel::SccPlus);
    // a lower note has a longer period, so this slide counts upward
    drv.dispatch(0, Command::NoteOn { note: Some(72) });
    drv.dispatch(0, Command::PrePorta { in_porta: true, starting: true });
    let start = drv.channel(0).base_freq;
    let target = period(60);
    assert!(start < target);

    let mut completions = 0;
    let mut last = start;
    for _ in 0..200 {
        let response = drv.dispatch(0, Command::NotePorta { step: 5, target: 60 });
        let now = drv.channel(0).base_freq;
        assert!(now <= target, "overshot: {now} > {target}");
        assert!(now >= last);
        last = now;
        if response == Response::PortaReached {
            completions += 1;
            assert!(!drv.channel(0).in_porta);
        }
    }
    assert_eq!(drv.channel(0).base_freq, target);
    assert_eq!(completions, 1);
}

#[test]
fn reset_is_idempotent() {
    let mut seed = 99;
    for model in [ChipModel::Scc, ChipModel::SccPlus] {
        let mut drv = driver(model);
        let fresh = drv.register_pool().to_vec();
        for _ in 0..500 {
            let ch = (next_rand(&mut seed) % 5) as usize;
            drv.dispatch(ch, random_command(&mut seed));
            drv.tick();
        }
        drv.reset();
        let once = drv.register_pool().to_vec();
        drv.reset();
        assert_eq!(drv.register_pool(), once.as_slice());
        assert_eq!(once, fresh);

        let base = drv.register_base() as usize;
        for ch in 0..5 {
            assert_eq!(once[base + 10 + ch], 15);
        }
    }
}

fn wave_writes(drv: &mut SccDriver, ch: usize) -> Vec<u32> {
    let base = drv.register_base();
    drv.take_write_log();
    drv.dispatch(ch, Command::Wave(1));
    drv.dispatch(ch, Command::NoteOn { note: Some(60) });
    drv.tick();
    drv.take_write_log()
        .into_iter()
        .map(|w| w.addr)
        .filter(|&addr| addr < base)
        .collect()
}

#[test]
fn standard_variant_shares_last_wave_window() {
    let mut drv = SccDriver::init(
        Arc::new(test_song()),
        DriverConfig::default().with_dump_writes(true),
    )
    .unwrap();
    let ch3 = wave_writes(&mut drv, 3);
    let ch4 = wave_writes(&mut drv, 4);
    assert_eq!(ch3, (0x60..0x80).collect::<Vec<_>>());
    assert_eq!(ch3, ch4);
}

#[test]
fn extended_variant_windows_are_disjoint() {
    let mut drv = SccDriver::init(
        Arc::new(test_song()),
        DriverConfig::default()
            .with_model(ChipModel::SccPlus)
            .with_dump_writes(true),
    )
    .unwrap();
    for ch in 0..5 {
        let start = ch as u32 * 32;
        assert_eq!(wave_writes(&mut drv, ch), (start..start + 32).collect::<Vec<_>>());
    }
}

#[test]
fn suppressed_writes_leave_chip_untouched() {
    let mut seed = 7;
    let mut drv = driver(ChipModel::Scc);
    drv.dispatch(0, Command::Instrument { index: 1, force: false });
    drv.dispatch(0, Command::NoteOn { note: Some(50) });
    drv.tick();

    let chip_regs = |drv: &SccDriver| -> Vec<u8> {
        let chip = drv.chip().unwrap();
        (0..=255u8).map(|addr| chip.read(addr)).collect()
    };
    let pool = drv.register_pool().to_vec();
    let regs = chip_regs(&drv);

    drv.set_skip_register_writes(true);
    for _ in 0..1000 {
        let ch = (next_rand(&mut seed) % 5) as usize;
        drv.dispatch(ch, random_command(&mut seed));
        drv.tick();
    }
    drv.mute_channel(0, true);
    drv.force_ins();
    assert_eq!(drv.register_pool(), pool.as_slice());
    assert_eq!(chip_regs(&drv), regs);

    drv.poke(0x8e, 0x03);
    drv.poke_all(&[RegWrite::new(0x00, 0x11), RegWrite::new(0x01, 0x22)]);
    assert_eq!(drv.register_pool()[0x8e], 0x03);
    assert_eq!(drv.register_pool()[0x01], 0x22);
    assert_eq!(drv.chip().unwrap().read(0x00), 0x11);
}

#[test]
fn note_on_scenario() {
    let mut drv = driver(ChipModel::Scc);
    drv.dispatch(0, Command::Instrument { index: 0, force: false });
    drv.dispatch(0, Command::NoteOn { note: Some(60) });

    let chan = drv.channel(0);
    assert!(chan.active);
    assert_eq!(chan.base_freq, period(60));
    assert_eq!(chan.out_vol, 15);

    drv.tick();
    let expected = (period(60).clamp(0, 4095) - 1).max(0);
    let pool = drv.register_pool();
    assert_eq!(pool[0x80] as i32, expected & 0xff);
    assert_eq!(pool[0x81] as i32, expected >> 8);
    assert_eq!(pool[0x8a], 15);
}

#[test]
fn dump_mode_starts_with_boundary() {
    let mut drv = SccDriver::init(
        Arc::new(test_song()),
        DriverConfig::default().with_dump_writes(true),
    )
    .unwrap();
    let log = drv.take_write_log();
    assert_eq!(log.len(), 6);
    assert!(log[..5].iter().all(|w| w.val == 15));
    assert!(log[5].is_boundary());

    drv.reset();
    assert!(drv.write_log().last().is_some_and(RegWrite::is_boundary));
}

#[test]
fn wave_effect_and_mute_round_trip() {
    let mut drv = driver(ChipModel::Scc);
    assert!(drv.handle_effect(2, 0x10, 1));
    assert_eq!(drv.channel(2).wave, Some(1));

    drv.dispatch(2, Command::NoteOn { note: Some(60) });
    drv.mute_channel(2, true);
    assert!(drv.is_muted(2));
    assert!(!drv.is_muted(1));
    assert_eq!(drv.register_pool()[0x8f] & 0x04, 0);
    drv.mute_channel(2, false);
    assert!(!drv.is_muted(2));
    assert_eq!(drv.register_pool()[0x8f] & 0x04, 0x04);

    drv.dispatch(2, Command::NoteOff);
    drv.mute_channel(2, true);
    drv.mute_channel(2, false);
    assert_eq!(drv.register_pool()[0x8f] & 0x04, 0);
}

#[test]
fn removed_instrument_silences_macros() {
    let song = Arc::new(test_song());
    let wobble = song.instruments[1].clone();
    let mut drv = SccDriver::init(song, DriverConfig::default()).unwrap();
    drv.dispatch(0, Command::Instrument { index: 1, force: false });
    drv.dispatch(0, Command::NoteOn { note: Some(60) });
    assert!(drv.channel(0).macros().vol.has);
    drv.notify_instrument_removed(&wobble);
    assert!(!drv.channel(0).macros().vol.has);
}

#[test]
fn absolute_pitch_macro_sets_bend() {
    let song = Song {
        instruments: vec![Arc::new(Instrument {
            macros: InstrumentMacros {
                pitch: MacroData::from_values([100, -5000]).with_mode(MacroMode::Absolute),
                ..InstrumentMacros::default()
            },
            ..Instrument::default()
        })],
        ..Song::default()
    };
    let mut drv = SccDriver::init(Arc::new(song), DriverConfig::default()).unwrap();
    drv.dispatch(0, Command::Instrument { index: 0, force: false });
    drv.dispatch(0, Command::NoteOn { note: Some(60) });
    drv.tick();
    assert_eq!(drv.channel(0).pitch2, 100);
    drv.tick();
    assert_eq!(drv.channel(0).pitch2, -2048);
}

#[test]
fn extreme_payloads_clamp_instead_of_overflowing() {
    let mut drv = driver(ChipModel::Scc);
    drv.dispatch(0, Command::NoteOn { note: Some(60) });

    drv.dispatch(0, Command::Pitch(i32::MIN));
    drv.tick();
    assert_eq!(drv.channel(0).freq, 4094);
    assert_eq!(drv.register_pool()[0x80], 0xfe);
    assert_eq!(drv.register_pool()[0x81], 0x0f);

    drv.dispatch(0, Command::Pitch(i32::MAX));
    drv.tick();
    assert_eq!(drv.channel(0).freq, 0);

    drv.dispatch(0, Command::Pitch(0));
    let reached = drv.dispatch(0, Command::NotePorta { step: i32::MAX, target: 0 });
    assert_eq!(reached, Response::PortaReached);
    assert_eq!(drv.channel(0).base_freq, period(0));
    let reached = drv.dispatch(0, Command::NotePorta { step: i32::MAX, target: 119 });
    assert_eq!(reached, Response::PortaReached);
    assert_eq!(drv.channel(0).base_freq, period(119));

    drv.dispatch(0, Command::Legato(i32::MAX));
    drv.dispatch(0, Command::Legato(i32::MIN));
    drv.tick();
    assert!((0..=4094).contains(&drv.channel(0).freq));
}

#[test]
fn extreme_macro_values_clamp_instead_of_overflowing() {
    let song = Song {
        instruments: vec![Arc::new(Instrument {
            macros: InstrumentMacros {
                arp: MacroData::from_values([i32::MAX, i32::MIN]).looped(0),
                pitch: MacroData::from_values([i32::MAX, i32::MAX, i32::MIN]).looped(0),
                ..InstrumentMacros::default()
            },
            ..Instrument::default()
        })],
        ..Song::default()
    };
    let mut drv = SccDriver::init(Arc::new(song), DriverConfig::default()).unwrap();
    drv.dispatch(0, Command::Instrument { index: 0, force: false });
    drv.dispatch(0, Command::NoteOn { note: Some(60) });
    for _ in 0..12 {
        drv.tick();
        let chan = drv.channel(0);
        assert!((-2048..=2048).contains(&chan.pitch2));
        assert!((0..=4094).contains(&chan.freq));
    }
}
