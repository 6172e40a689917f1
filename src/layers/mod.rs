pub mod activation;
pub mod conv;
pub mod kernel;
pub mod layer;

pub use activation::{
    ActivationFunction, IdentityFunction, LogisticFunction, ReLuFunction, TanhFunction,
};
pub use conv::ConvLayer;
pub use kernel::KernelT;
pub use layer::{Layer, LayerError};
