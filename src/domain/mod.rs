// Domain layer: records, ids and the ports the form talks through.

pub mod model;
pub mod ports;
