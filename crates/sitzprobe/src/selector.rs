//! Picks the channel whose peer the next probe is sent to.

use rand::Rng;

use crate::host::Channel;

/// Random draws made over the channel list before giving up.
///
/// Drawing instead of filtering keeps the pick uniform over active channels
/// without scanning the whole list. When active channels are very sparse the
/// selector can miss all of them; that case is recorded as
/// `no_active_channel_found` like a genuinely empty list.
pub const DEFAULT_MAX_DRAWS: usize = 1000;

/// Chooses an active channel at random
#[derive(Debug, Clone, Copy)]
pub struct ChannelSelector {
    max_draws: usize,
}

impl Default for ChannelSelector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DRAWS)
    }
}

impl ChannelSelector {
    pub fn new(max_draws: usize) -> Self {
        Self { max_draws }
    }

    pub fn max_draws(&self) -> usize {
        self.max_draws
    }

    /// Draw channels uniformly from `channels` until an active one comes up.
    ///
    /// Returns `None` for an empty list, or when every draw hit an inactive
    /// channel.
    pub fn select<'a, R: Rng>(
        &self,
        channels: &'a [Channel],
        rng: &mut R,
    ) -> Option<&'a Channel> {
        if channels.is_empty() {
            return None;
        }

        (0..self.max_draws)
            .map(|_| &channels[rng.gen_range(0..channels.len())])
            .find(|channel| channel.active)
    }
}
