// Domain layer: models and ports. No HTTP or provider details here.

pub mod model;
pub mod ports;
