//! Converter core: flat report features into the run model.
//!
//! Layered bottom-up: [`step`] rebuilds one step and its hooks, [`scenario`]
//! pairs backgrounds and builds scenarios, [`feature`] merges scenarios into
//! features, [`run`] drives a whole conversion. [`gate`] decides what a
//! recoverable failure means.

pub mod feature;
pub mod gate;
pub mod run;
pub mod scenario;
pub mod step;

#[cfg(test)]
mod test_properties;

pub use feature::{ConversionPolicy, aggregate_feature};
pub use gate::ConvertibilityGate;
pub use run::Converter;
pub use scenario::{Reconstruction, build_scenario, reconstruct_scenario};
pub use step::{reconstruct_step, reconstruct_steps};
