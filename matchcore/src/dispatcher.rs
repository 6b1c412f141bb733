//! Process-wide `CanonicalTopic -> PipelineKind` registry. Built once and
//! reused for the life of the process; the engine loop looks up the
//! pipeline for each topic it encounters rather than re-deriving it.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::EngineError;
use crate::model::CanonicalTopic;
use crate::pipeline::PipelineKind;

fn registry() -> &'static HashMap<CanonicalTopic, PipelineKind> {
    static REGISTRY: OnceLock<HashMap<CanonicalTopic, PipelineKind>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        CanonicalTopic::all()
            .into_iter()
            .filter(|topic| *topic != CanonicalTopic::Unknown)
            .map(|topic| (topic, PipelineKind::for_topic(topic)))
            .collect()
    })
}

/// Resolve the pipeline for a topic. Every `CanonicalTopic` variant except
/// `Unknown` has a registered pipeline (the generic/universal one covers
/// topics with no dedicated structured vocabulary); `Unknown` means the
/// classifier could not place the market anywhere, so a run explicitly
/// asking to match on it is a caller error, not a silent no-op.
pub fn pipeline_for(topic: CanonicalTopic) -> Result<PipelineKind, EngineError> {
    registry()
        .get(&topic)
        .copied()
        .ok_or(EngineError::UnsupportedTopic(topic))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_canonical_topic_except_unknown_has_a_registered_pipeline() {
        for topic in CanonicalTopic::all() {
            if topic == CanonicalTopic::Unknown {
                assert!(pipeline_for(topic).is_err());
            } else {
                assert!(pipeline_for(topic).is_ok(), "{topic} has no pipeline");
            }
        }
    }

    #[test]
    fn registry_is_stable_across_calls() {
        let a = pipeline_for(CanonicalTopic::Sports).unwrap();
        let b = pipeline_for(CanonicalTopic::Sports).unwrap();
        assert_eq!(a, b);
    }
}
