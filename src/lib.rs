pub mod config;
pub mod data;
pub mod layers;
pub mod logging;
pub mod loss;
pub mod math;
pub mod memory;
pub mod model;
pub mod optim;
pub mod rng;
pub mod tensor;
pub mod trainer;
pub mod util;
pub mod verification;
pub mod weights;
