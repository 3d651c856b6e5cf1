use core::fmt;
use core::marker::PhantomData;

use crate::{Grouping, Lanes, M1, Sample, Tier, register_bytes};

/// Runs every operation at grouping `G`.
///
/// Each operation dispatches once to the best CPU tier available and walks
/// its rows in steps sized for that tier's registers. An engine built with
/// [`with_register_bytes`](Self::with_register_bytes) still dispatches, but
/// sizes its steps for the pinned width instead. The free functions of this
/// crate are shorthands for `Engine::<M1>::detect()`. Results do not depend
/// on `G` or on the register width; only the step sizes do.
///
/// ```rust
/// use lanefilter::{Engine, GrayImage, M4};
///
/// let img = GrayImage::filled(16, 16, 90u8);
/// let engine = Engine::<M4>::with_register_bytes(64);
/// assert_eq!(engine.lanes::<u8>().max_lanes(), 256);
/// assert_eq!(engine.box_filter(&img, 5).unwrap(), img);
/// ```
pub struct Engine<G = M1> {
    pinned: Option<usize>,
    _grouping: PhantomData<G>,
}

impl<G: Grouping> Engine<G> {
    /// Engine that sizes steps for whichever tier each call dispatches to.
    pub fn detect() -> Self {
        log::trace!(
            "lanefilter: {}-byte registers, grouping x{}",
            register_bytes(),
            G::FACTOR
        );
        Self {
            pinned: None,
            _grouping: PhantomData,
        }
    }

    /// Engine modeling a register of `register_bytes` bytes (minimum 1).
    pub fn with_register_bytes(register_bytes: usize) -> Self {
        Self {
            pinned: Some(register_bytes.max(1)),
            _grouping: PhantomData,
        }
    }

    /// Pinned width, or the width of the best tier available right now.
    pub fn register_bytes(&self) -> usize {
        self.pinned.unwrap_or_else(register_bytes)
    }

    /// Lane resolver for sample type `S`.
    pub fn lanes<S: Sample>(&self) -> Lanes<S, G> {
        Lanes::with_register_bytes(self.register_bytes())
    }

    /// Lane resolver for a kernel running under `token`.
    #[inline(always)]
    pub(crate) fn lanes_on<S: Sample, T: Tier>(&self, token: T) -> Lanes<S, G> {
        match self.pinned {
            Some(bytes) => Lanes::with_register_bytes(bytes),
            None => Lanes::for_tier(token),
        }
    }
}

impl<G: Grouping> Default for Engine<G> {
    fn default() -> Self {
        Self::detect()
    }
}

impl<G> Clone for Engine<G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G> Copy for Engine<G> {}

impl<G: Grouping> fmt::Debug for Engine<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("pinned", &self.pinned)
            .field("grouping", &G::FACTOR)
            .finish()
    }
}
