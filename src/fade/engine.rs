//! Fade driver: steps every channel once per fade period.

use crate::app::ports::DutyPort;
use crate::config::FadeConfig;
use crate::error::Result;

use super::channel::{LedChannel, RampChannel, StepOutcome};
use super::palette::Palette;

/// Per-channel outcomes of one [`FadeEngine::tick`], indexed by
/// [`LedChannel::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub outcomes: [StepOutcome; LedChannel::COUNT],
}

impl TickReport {
    pub fn outcome(&self, channel: LedChannel) -> StepOutcome {
        self.outcomes[channel.index()]
    }

    /// Channels that picked a new palette target this tick.
    pub fn advanced(&self) -> impl Iterator<Item = (LedChannel, usize, u8)> + '_ {
        LedChannel::ALL
            .into_iter()
            .filter_map(|ch| match self.outcome(ch) {
                StepOutcome::Advanced { cursor, target } => Some((ch, cursor, target)),
                _ => None,
            })
    }
}

/// Owns the three ramp channels and the palette they share.
///
/// Stack-allocated, no heap.  Constructed once at boot; there is no way
/// to swap the palette or add channels afterwards.
pub struct FadeEngine<'a> {
    palette: Palette<'a>,
    channels: [RampChannel; LedChannel::COUNT],
    ticks: u64,
}

impl<'a> FadeEngine<'a> {
    /// Build the engine with each channel sitting on its start cursor.
    ///
    /// `cursors` is indexed green, blue, red.  Use different offsets so
    /// the channels do not all change target on the same tick.
    pub fn new(palette: Palette<'a>, cursors: [usize; LedChannel::COUNT]) -> Result<Self> {
        let channels = [
            RampChannel::new(&palette, cursors[0])?,
            RampChannel::new(&palette, cursors[1])?,
            RampChannel::new(&palette, cursors[2])?,
        ];
        Ok(Self::with_channels(palette, channels))
    }

    /// Build the engine from pre-constructed channels.
    pub fn with_channels(palette: Palette<'a>, channels: [RampChannel; LedChannel::COUNT]) -> Self {
        Self {
            palette,
            channels,
            ticks: 0,
        }
    }

    pub fn from_config(config: &'a FadeConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.palette()?, config.start_cursors)
    }

    /// Run one fade period: step green, blue, red, then publish the new
    /// brightness of each channel through `out`.
    pub fn tick(&mut self, out: &mut impl DutyPort) -> TickReport {
        self.ticks = self.ticks.wrapping_add(1);

        let mut outcomes = [StepOutcome::Rising; LedChannel::COUNT];
        for ch in LedChannel::ALL {
            outcomes[ch.index()] = self.channels[ch.index()].step(&self.palette);
        }

        for ch in LedChannel::ALL {
            out.write_duty(ch, self.channels[ch.index()].current());
        }

        TickReport { outcomes }
    }

    /// Push the current brightness of every channel without stepping.
    /// Used once at boot so the outputs match the engine before the
    /// first tick.
    pub fn publish(&self, out: &mut impl DutyPort) {
        for ch in LedChannel::ALL {
            out.write_duty(ch, self.channels[ch.index()].current());
        }
    }

    pub fn channel(&self, channel: LedChannel) -> &RampChannel {
        &self.channels[channel.index()]
    }

    /// Current brightness of every channel, green/blue/red.
    pub fn levels(&self) -> [u8; LedChannel::COUNT] {
        self.channels.map(|c| c.current())
    }

    pub fn palette(&self) -> &Palette<'a> {
        &self.palette
    }

    /// Fade periods handled since boot.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
