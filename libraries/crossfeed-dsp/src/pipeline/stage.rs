//! Pipeline Stage Trait
//!
//! Base interface that all DSP pipeline stages must implement.

use crossfeed_core::{DspBuffer, DspHost, StageId};
use std::any::Any;

/// Information about a pipeline stage for introspection
#[derive(Debug, Clone)]
pub struct StageInfo {
    /// Unique type identifier (e.g., "crossfeed")
    pub type_id: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
    /// Short description
    pub description: &'static str,
}

/// Base trait for all DSP pipeline stages
///
/// # Safety
/// - `process()` must NOT allocate memory (real-time constraint)
/// - Stages must be Send so a pipeline can move to the audio thread
///
/// # Implementation Requirements
/// All pipeline stages must:
/// 1. Implement `process()` for audio processing (real-time safe)
/// 2. Implement `reset()` for state clearing (flush, seeking, track changes)
/// 3. Implement `set_enabled()` to attach to / detach from the host
/// 4. Implement `info()` for stage metadata
/// 5. Implement `as_any()` / `as_any_mut()` for downcasting
pub trait DspStage: Send {
    /// Identifier of this stage; also its bit in the activation mask
    fn stage_id(&self) -> StageId;

    /// Process a buffer in place
    ///
    /// Called for every buffer while the stage is active, and for the first
    /// buffer of each new format generation while it is enabled but inactive.
    ///
    /// # Real-Time Constraints
    /// - No allocations
    /// - No blocking operations
    /// - Deterministic execution time
    fn process(&mut self, host: &mut dyn DspHost, buffer: &mut DspBuffer);

    /// Discard any sample history
    fn reset(&mut self);

    /// Attach to or detach from the host
    fn set_enabled(&mut self, host: &mut dyn DspHost, enabled: bool);

    /// Check if the stage is attached to a host
    fn is_enabled(&self) -> bool;

    /// Get stage information
    fn info(&self) -> StageInfo;

    /// Get a reference to self as Any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Get a mutable reference to self as Any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
