use std::ops::BitOr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-call option word for [`Vocoder::process`](super::Vocoder::process).
///
/// | bit | flag             | effect                                          |
/// | --- | ---------------- | ----------------------------------------------- |
/// | 0   | `MEL_SMOOTHING`  | blur the modulator envelope to mel resolution   |
/// | 1   | `WHITEN_CARRIER` | flatten the carrier to unit magnitude first     |
///
/// Unknown bits are ignored.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VocoderFlags(u32);

impl VocoderFlags {
    pub const NONE: Self = Self(0);
    pub const MEL_SMOOTHING: Self = Self(1 << 0);
    pub const WHITEN_CARRIER: Self = Self(1 << 1);

    const KNOWN: u32 = Self::MEL_SMOOTHING.0 | Self::WHITEN_CARRIER.0;

    /// Build from a raw host word, dropping bits with no meaning.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & Self::KNOWN)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn mel_smoothing(self) -> bool {
        self.contains(Self::MEL_SMOOTHING)
    }

    #[inline]
    pub const fn whiten_carrier(self) -> bool {
        self.contains(Self::WHITEN_CARRIER)
    }
}

impl BitOr for VocoderFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<u32> for VocoderFlags {
    fn from(bits: u32) -> Self {
        Self::from_bits(bits)
    }
}
