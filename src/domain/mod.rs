// Domain layer: core models and the inference port.

pub mod model;
pub mod ports;
