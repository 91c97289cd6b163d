//! Core traits shared by the host pipeline and its stages

use crate::types::SampleRate;

/// Identifier of a processing pipeline
///
/// Stages bound to a pipeline remember this handle rather than a reference,
/// so the pipeline stays the sole owner of its stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DspId(pub u8);

impl DspId {
    /// Pipeline that processes decoded audio for playback
    pub const AUDIO: Self = Self(0);
    /// Pipeline that processes voice prompts
    pub const VOICE: Self = Self(1);
}

/// Identifier of a stage within a pipeline
///
/// Also the bit index of the stage in the pipeline's activation mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StageId(pub u8);

impl StageId {
    /// Stereo crossfeed
    pub const CROSSFEED: Self = Self(0);

    /// Highest stage id a pipeline can track
    pub const MAX: Self = Self(31);

    /// Bit of this stage in an activation mask
    pub fn mask(self) -> u32 {
        1u32 << (self.0 & 31)
    }
}

/// Services a processing pipeline offers the stages it drives
///
/// The pipeline calls its stages synchronously, one buffer at a time, and
/// passes itself in as the host. Implementations need no internal locking.
pub trait DspHost {
    /// Handle of this pipeline
    fn id(&self) -> DspId;

    /// Toggle whether a stage takes part in processing
    fn activate(&mut self, stage: StageId, active: bool);

    /// Check if a stage currently takes part in processing
    fn is_active(&self, stage: StageId) -> bool;

    /// Native processing sample rate, used to normalize filter frequencies
    fn native_rate(&self) -> SampleRate;
}
