use crate::domain::model::RigSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Forward,
    Skip,
}

/// Forward unless the new snapshot is exactly equal, field by field, to the
/// last one that was forwarded. No tolerance is applied to frequencies.
pub fn evaluate(last_forwarded: Option<&RigSnapshot>, current: &RigSnapshot) -> GateDecision {
    match last_forwarded {
        Some(last) if last == current => GateDecision::Skip,
        _ => GateDecision::Forward,
    }
}
