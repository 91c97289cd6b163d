//! Crossfeed (speaker crosstalk simulation for headphones)
//!
//! Applies crossfeed to a stereo signal. Listening over speakers, each ear
//! hears the opposite speaker slightly later and with the high frequencies
//! shadowed by the head. Hard-panned recordings, which are fatiguing on
//! headphones, get that crosstalk back:
//!
//! ```text
//!   in L ──┬──────────────── x gain ──(+)── out L
//!          │                           ▲
//!          └─ delay 13 ─ shelf ─┐      │
//!                               ╳──────┘
//!          ┌─ delay 13 ─ shelf ─┘      │
//!          │                           ▼
//!   in R ──┴──────────────── x gain ──(+)── out R
//! ```
//!
//! All arithmetic is fixed point: the direct gain and the filter coefficients
//! are Q0.31, samples are whatever format the host runs (s3.28 by default).
//! The final sum is not clipped; the host must leave enough headroom.

use crate::filter::{normalized_cutoff, shelf_coefs, ShelfKind};
use crate::gain::{linear_gain, tenths_to_hundredths};
use crossfeed_core::fixed::{fp_div, fracmul, fracmul_shl};
use crossfeed_core::{DspBuffer, DspHost, DspId, SampleRate, StageId};
use tracing::{debug, trace};

/// Crosstalk propagation delay in frames
pub const DELAY_FRAMES: usize = 13;

/// Slots in the interleaved delay line
pub const DELAY_SLOTS: usize = DELAY_FRAMES * 2;

/// Shift taking an s7.24 linear gain to Q0.31
const GAIN_HEADROOM_BITS: u32 = 7;

/// Shift taking an s4.27 coefficient to Q0.31
const COEF_HEADROOM_BITS: u32 = 4;

/// Linear gains at or above unity cannot be represented in Q0.31
const GAIN_CLAMP_THRESHOLD: u32 = 0x8000_0000 >> GAIN_HEADROOM_BITS;

/// Shelf filter history for one channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct History {
    /// x[n-1]
    pub prev_input: i32,
    /// y[n-1]
    pub prev_output: i32,
}

/// Which sample handler runs for the next buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Waiting to inspect the stream format
    Probing,
    /// Format accepted; crossfeeding every buffer of this generation
    Active { generation: u32 },
}

/// Crossfeed filter state
///
/// Owned by the host pipeline. Parameter setters only touch the gain and the
/// coefficients; the history and delay line are cleared solely by [`reset`]
/// (which [`attach`] performs).
///
/// [`reset`]: Crossfeed::reset
/// [`attach`]: Crossfeed::attach
#[derive(Debug, Clone)]
pub struct Crossfeed {
    /// Direct path gain (Q0.31)
    gain: i32,

    /// Shelf coefficients scaled by the cross gain (Q0.31)
    coefs: [i32; 3],

    /// Filter history, left then right
    history: [History; 2],

    /// Delay line, L/R interleaved
    delay: [i32; DELAY_SLOTS],

    /// Slot of the next left sample; always even
    cursor: usize,

    /// Pipeline this stage is attached to
    bound: Option<DspId>,

    /// Format guard state
    mode: Mode,
}

impl Crossfeed {
    /// Create a detached crossfeed with zero gain and zero coefficients
    ///
    /// Output is silence until parameters are set.
    pub fn new() -> Self {
        Self {
            gain: 0,
            coefs: [0; 3],
            history: [History::default(); 2],
            delay: [0; DELAY_SLOTS],
            cursor: 0,
            bound: None,
            mode: Mode::Probing,
        }
    }

    /// Bind to a pipeline and start probing its stream format
    ///
    /// Marks the stage active in the host and resets the filter state.
    /// Attaching again rebinds (and resets) without error.
    pub fn attach(&mut self, host: &mut dyn DspHost) {
        self.bound = Some(host.id());
        self.mode = Mode::Probing;
        host.activate(StageId::CROSSFEED, true);
        debug!(dsp = host.id().0, "crossfeed attached");
        self.reset();
    }

    /// Unbind from the pipeline
    ///
    /// Gain and coefficients are kept so a later attach resumes with the same
    /// tone; the history is left for the next reset to clear.
    pub fn detach(&mut self) {
        if let Some(dsp) = self.bound.take() {
            debug!(dsp = dsp.0, "crossfeed detached");
        }
    }

    /// Discard the sample histories and the delay line
    pub fn reset(&mut self) {
        self.history = [History::default(); 2];
        self.delay = [0; DELAY_SLOTS];
        self.cursor = 0;
        trace!("crossfeed flushed");
    }

    /// Enable or disable the crossfeed
    ///
    /// No-op when already in the requested state.
    pub fn set_enabled(&mut self, host: &mut dyn DspHost, enable: bool) {
        if enable == self.is_attached() {
            return;
        }

        if enable {
            self.attach(host);
        } else {
            host.activate(StageId::CROSSFEED, false);
            self.detach();
        }
    }

    /// Set the gain of the dry mix
    ///
    /// # Arguments
    /// * `gain_tenths_db` - Direct path gain in 0.1 dB, expected at most 0 dB
    ///
    /// Gains of 0 dB or more saturate to the largest Q0.31 value.
    pub fn set_direct_gain(&mut self, gain_tenths_db: i32) {
        let gain = linear_gain(tenths_to_hundredths(gain_tenths_db)) as u32;
        self.gain = if gain >= GAIN_CLAMP_THRESHOLD {
            i32::MAX
        } else {
            (gain << GAIN_HEADROOM_BITS) as i32
        };
        debug!(gain_tenths_db, gain = self.gain, "crossfeed direct gain set");
    }

    /// Set the shelf applied to the crossfed signal
    ///
    /// # Arguments
    /// * `lf_gain` - Cross gain below the cutoff in 0.1 dB
    /// * `hf_gain` - Cross gain above the cutoff in 0.1 dB
    /// * `cutoff_hz` - Frequency of the -3 dB point of the shelf
    /// * `native_rate` - Processing sample rate
    ///
    /// Both gains should be below 0 dB. Other values are not rejected here;
    /// validate them at the settings layer.
    pub fn set_shelf_params(
        &mut self,
        lf_gain: i32,
        hf_gain: i32,
        cutoff_hz: u32,
        native_rate: SampleRate,
    ) {
        let scaler = linear_gain(tenths_to_hundredths(lf_gain)) << GAIN_HEADROOM_BITS;
        let shelf_gain = hf_gain.saturating_sub(lf_gain);

        // Divide the cutoff by sqrt(10^(shelf_gain/20)) so it lands on the
        // -3 dB point instead of the shelf midpoint. Old presets were tuned
        // against that placement.
        let cutoff = normalized_cutoff(cutoff_hz, native_rate.as_hz()) as i32;
        let half_gain = linear_gain(tenths_to_hundredths(shelf_gain) / 2);
        let cutoff = fp_div(cutoff, half_gain, 24) as u32;

        let c = shelf_coefs(cutoff, shelf_gain, ShelfKind::High);

        // Scale by the LF gain and move to Q0.31; no gains exceed unity
        self.coefs = [
            fracmul_shl(c[0], scaler, COEF_HEADROOM_BITS),
            fracmul_shl(c[1], scaler, COEF_HEADROOM_BITS),
            c[2] << COEF_HEADROOM_BITS,
        ];
        debug!(
            lf_gain,
            hf_gain,
            cutoff_hz,
            rate = native_rate.as_hz(),
            coefs = ?self.coefs,
            "crossfeed shelf set"
        );
    }

    /// Install a precomputed direct gain (Q0.31)
    pub fn set_raw_gain(&mut self, gain: i32) {
        self.gain = gain;
    }

    /// Install precomputed filter coefficients (Q0.31)
    pub fn set_raw_coefs(&mut self, coefs: [i32; 3]) {
        self.coefs = coefs;
    }

    /// Current direct gain (Q0.31)
    pub fn direct_gain(&self) -> i32 {
        self.gain
    }

    /// Current filter coefficients (Q0.31)
    pub fn coefs(&self) -> [i32; 3] {
        self.coefs
    }

    /// Filter history, left then right
    pub fn history(&self) -> &[History; 2] {
        &self.history
    }

    /// Delay line contents, L/R interleaved
    pub fn delay_line(&self) -> &[i32; DELAY_SLOTS] {
        &self.delay
    }

    /// Slot the next left sample is written to
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Pipeline this stage is bound to, if any
    pub fn bound(&self) -> Option<DspId> {
        self.bound
    }

    /// Check if the crossfeed is attached to a pipeline
    pub fn is_attached(&self) -> bool {
        self.bound.is_some()
    }

    /// Check if the next buffer will be format-probed
    pub fn is_probing(&self) -> bool {
        self.mode == Mode::Probing
    }

    /// Process one buffer in place
    ///
    /// The first buffer after attaching, and the first buffer of every new
    /// format generation, is probed: streams with fewer than two channels
    /// deactivate the stage and pass through untouched. The probing buffer
    /// itself is crossfed when the format qualifies.
    pub fn process(&mut self, host: &mut dyn DspHost, buffer: &mut DspBuffer) {
        if !self.is_attached() {
            return;
        }

        if let Mode::Active { generation } = self.mode {
            if generation != buffer.format.generation {
                self.mode = Mode::Probing;
            }
        }

        match self.mode {
            Mode::Probing => self.process_new_format(host, buffer),
            Mode::Active { .. } => self.apply(buffer),
        }
    }

    /// Boot/format change handler
    fn process_new_format(&mut self, host: &mut dyn DspHost, buffer: &mut DspBuffer) {
        let format = buffer.format;
        trace!(
            channels = format.channels,
            rate = format.sample_rate.as_hz(),
            generation = format.generation,
            "crossfeed probing format"
        );

        let active = format.channels >= 2;
        host.activate(StageId::CROSSFEED, active);

        if !active {
            // Can't do this. Sleep until next change
            self.reset();
            debug!(channels = format.channels, "crossfeed deactivated");
            return;
        }

        self.mode = Mode::Active {
            generation: format.generation,
        };
        self.apply(buffer);
    }

    fn apply(&mut self, buffer: &mut DspBuffer) {
        let channels = usize::from(buffer.format.channels);
        self.crossfeed(&mut buffer.samples, channels);
    }

    /// Crossfeed interleaved frames in place
    ///
    /// Only the first two channels of each frame are touched.
    fn crossfeed(&mut self, samples: &mut [i32], channels: usize) {
        if channels < 2 {
            return;
        }

        let coefs = self.coefs;
        let gain = self.gain;
        let delay = &mut self.delay;
        let [hist_l, hist_r] = &mut self.history;
        let mut di = self.cursor;

        for frame in samples.chunks_exact_mut(channels) {
            let left = frame[0];
            let right = frame[1];

            // Filter delayed sample from left speaker
            let from_left = shelf(&coefs, hist_l, delay[di]);
            delay[di] = left;
            di += 1;

            // Filter delayed sample from right speaker
            let from_right = shelf(&coefs, hist_r, delay[di]);
            delay[di] = right;
            di += 1;

            // Attenuated direct sound plus the opposite speaker
            frame[0] = fracmul(left, gain).wrapping_add(from_right);
            frame[1] = fracmul(right, gain).wrapping_add(from_left);

            if di >= DELAY_SLOTS {
                di = 0;
            }
        }

        self.cursor = di;
    }
}

impl Default for Crossfeed {
    fn default() -> Self {
        Self::new()
    }
}

/// One step of the shelf: `y = c0*x + c1*x[n-1] + c2*y[n-1]`
#[inline]
fn shelf(coefs: &[i32; 3], hist: &mut History, x: i32) -> i32 {
    let acc = fracmul(x, coefs[0])
        .wrapping_add(fracmul(hist.prev_input, coefs[1]))
        .wrapping_add(fracmul(hist.prev_output, coefs[2]));
    hist.prev_output = acc;
    hist.prev_input = x;
    acc
}
