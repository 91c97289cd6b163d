//! `DspStage` implementations for the effects in this crate

use super::{DspStage, StageInfo};
use crate::crossfeed::Crossfeed;
use crossfeed_core::{DspBuffer, DspHost, StageId};
use std::any::Any;

// ===== Crossfeed =====

impl DspStage for Crossfeed {
    fn stage_id(&self) -> StageId {
        StageId::CROSSFEED
    }

    fn process(&mut self, host: &mut dyn DspHost, buffer: &mut DspBuffer) {
        Crossfeed::process(self, host, buffer);
    }

    fn reset(&mut self) {
        Crossfeed::reset(self);
    }

    fn set_enabled(&mut self, host: &mut dyn DspHost, enabled: bool) {
        Crossfeed::set_enabled(self, host, enabled);
    }

    fn is_enabled(&self) -> bool {
        self.is_attached()
    }

    fn info(&self) -> StageInfo {
        StageInfo {
            type_id: "crossfeed",
            display_name: "Crossfeed",
            description: "Speaker crosstalk simulation for headphones",
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
