// Domain layer: models, ports and the pure isotope services. No I/O here.

pub mod model;
pub mod ports;

pub mod services;
