//! DSP pipeline: configuration and stage driver

use super::{DspStage, StageInfo};
use crate::crossfeed::Crossfeed;
use crossfeed_core::{DspBuffer, DspHost, DspId, SampleRate, StageId};
use tracing::debug;

/// Pipeline configuration seen by stages through [`DspHost`]
#[derive(Debug, Clone)]
pub struct DspConfig {
    id: DspId,
    native_rate: SampleRate,
    /// Bit per `StageId` taking part in processing
    active: u32,
}

impl DspConfig {
    /// Create a configuration with no active stages
    pub fn new(id: DspId, native_rate: SampleRate) -> Self {
        Self {
            id,
            native_rate,
            active: 0,
        }
    }

    /// Activation mask, one bit per stage id
    pub fn active_mask(&self) -> u32 {
        self.active
    }
}

impl DspHost for DspConfig {
    fn id(&self) -> DspId {
        self.id
    }

    fn activate(&mut self, stage: StageId, active: bool) {
        if active {
            self.active |= stage.mask();
        } else {
            self.active &= !stage.mask();
        }
    }

    fn is_active(&self, stage: StageId) -> bool {
        self.active & stage.mask() != 0
    }

    fn native_rate(&self) -> SampleRate {
        self.native_rate
    }
}

/// Chain of DSP stages processed in stage id order
///
/// Buffers are processed one at a time, in place. A stage runs when it is
/// active; enabled but inactive stages additionally see the first buffer of
/// every new format generation so they can decide whether to wake up.
pub struct DspPipeline {
    config: DspConfig,
    stages: Vec<Box<dyn DspStage>>,
    last_generation: Option<u32>,
}

impl DspPipeline {
    /// Create an empty pipeline
    pub fn new(id: DspId, native_rate: SampleRate) -> Self {
        Self {
            config: DspConfig::new(id, native_rate),
            stages: Vec::new(),
            last_generation: None,
        }
    }

    /// Create a pipeline holding a detached crossfeed stage
    pub fn with_crossfeed(id: DspId, native_rate: SampleRate) -> Self {
        let mut pipeline = Self::new(id, native_rate);
        pipeline.add_stage(Box::new(Crossfeed::new()));
        pipeline
    }

    /// Add a stage, replacing any stage with the same id
    pub fn add_stage(&mut self, stage: Box<dyn DspStage>) {
        let id = stage.stage_id();
        debug!(stage = id.0, kind = stage.info().type_id, "stage added");
        match self.stages.binary_search_by_key(&id, |s| s.stage_id()) {
            Ok(index) => self.stages[index] = stage,
            Err(index) => self.stages.insert(index, stage),
        }
    }

    /// Enable or disable a stage
    ///
    /// Returns false if no stage with that id exists.
    pub fn enable_stage(&mut self, id: StageId, enable: bool) -> bool {
        let Some(stage) = self.stages.iter_mut().find(|s| s.stage_id() == id) else {
            return false;
        };
        stage.set_enabled(&mut self.config, enable);
        debug!(stage = id.0, enable, "stage enable request");
        true
    }

    /// Check if a stage is enabled (attached)
    pub fn is_enabled(&self, id: StageId) -> bool {
        self.stages
            .iter()
            .any(|s| s.stage_id() == id && s.is_enabled())
    }

    /// Check if a stage is currently active
    pub fn is_active(&self, id: StageId) -> bool {
        self.config.is_active(id)
    }

    /// Discard the sample history of every enabled stage
    pub fn flush(&mut self) {
        for stage in self.stages.iter_mut().filter(|s| s.is_enabled()) {
            stage.reset();
        }
    }

    /// Process a buffer through the pipeline in place
    ///
    /// # Real-Time Safety
    /// - No allocations
    pub fn process(&mut self, buffer: &mut DspBuffer) {
        let format_changed = self.last_generation != Some(buffer.format.generation);
        self.last_generation = Some(buffer.format.generation);

        for stage in &mut self.stages {
            if !stage.is_enabled() {
                continue;
            }
            if format_changed || self.config.is_active(stage.stage_id()) {
                stage.process(&mut self.config, buffer);
            }
        }
    }

    /// Get the pipeline configuration
    pub fn config(&self) -> &DspConfig {
        &self.config
    }

    /// Native processing rate
    pub fn native_rate(&self) -> SampleRate {
        self.config.native_rate()
    }

    /// Find a stage by concrete type
    pub fn stage<T: DspStage + 'static>(&self) -> Option<&T> {
        self.stages
            .iter()
            .find_map(|s| s.as_any().downcast_ref::<T>())
    }

    /// Find a stage by concrete type, mutably
    pub fn stage_mut<T: DspStage + 'static>(&mut self) -> Option<&mut T> {
        self.stages
            .iter_mut()
            .find_map(|s| s.as_any_mut().downcast_mut::<T>())
    }

    /// Get the crossfeed stage, if the pipeline has one
    pub fn crossfeed(&self) -> Option<&Crossfeed> {
        self.stage::<Crossfeed>()
    }

    /// Get the crossfeed stage mutably, if the pipeline has one
    pub fn crossfeed_mut(&mut self) -> Option<&mut Crossfeed> {
        self.stage_mut::<Crossfeed>()
    }

    /// Describe every stage in processing order
    pub fn stage_infos(&self) -> Vec<StageInfo> {
        self.stages.iter().map(|s| s.info()).collect()
    }

    /// Get number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Check if the pipeline has no stages
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
