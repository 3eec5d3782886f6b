// Domain layer: the rig snapshot, the outbound payload and the ports the
// poll loop talks through.

pub mod model;
pub mod ports;
