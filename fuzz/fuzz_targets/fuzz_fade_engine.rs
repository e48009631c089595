//! Fuzz target: `FadeEngine::tick`
//!
//! Input layout: byte 0 = palette length (mod 16, +1), next bytes = levels,
//! next 3 = channel cursors (mod 32 so out-of-range cursors are exercised),
//! next 2 = tick count (little-endian, capped).
//!
//! Invariants checked:
//! - Construction rejects exactly the out-of-range cursors
//! - No panics while ticking
//! - Each channel's level moves by at most one per tick
//! - Every cursor stays in range and every target is a palette level
//!
//! cargo fuzz run fuzz_fade_engine

#![no_main]

use libfuzzer_sys::fuzz_target;
use signallicht::app::ports::DutyPort;
use signallicht::fade::{FadeEngine, LedChannel, Palette};

const MAX_TICKS: usize = 4096;

struct Last([u8; LedChannel::COUNT]);

impl DutyPort for Last {
    fn write_duty(&mut self, channel: LedChannel, duty: u8) {
        self.0[channel.index()] = duty;
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&len_byte, rest)) = data.split_first() else {
        return;
    };
    let len = usize::from(len_byte % 16) + 1;
    if rest.len() < len + 5 {
        return;
    }
    let (levels, rest) = rest.split_at(len);
    let cursors = [
        usize::from(rest[0] % 32),
        usize::from(rest[1] % 32),
        usize::from(rest[2] % 32),
    ];
    let ticks = usize::from(u16::from_le_bytes([rest[3], rest[4]])) % MAX_TICKS;

    let Ok(palette) = Palette::new(levels) else {
        return;
    };
    let engine = FadeEngine::new(palette, cursors);
    let in_range = cursors.iter().all(|&c| c < len);
    assert_eq!(engine.is_ok(), in_range);
    let Ok(mut engine) = engine else {
        return;
    };

    let mut out = Last(engine.levels());
    for _ in 0..ticks {
        let before = out.0;
        engine.tick(&mut out);
        for ch in LedChannel::ALL {
            assert!(before[ch.index()].abs_diff(out.0[ch.index()]) <= 1);
            let c = engine.channel(ch);
            assert!(c.cursor() < len);
            assert_eq!(c.target(), levels[c.cursor()]);
        }
    }
});
