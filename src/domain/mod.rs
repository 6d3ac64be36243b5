// Domain layer: the consumption model and the ports its collaborators implement.

pub mod model;
pub mod ports;
