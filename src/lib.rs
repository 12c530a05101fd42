use pyo3::pymodule;

pub mod editor;
pub mod messages;
pub mod plugin;
pub mod processor;
mod sampler_plugin;

#[cfg(test)]
mod test_util;

/// The Python module implemented in Rust.
#[pymodule]
mod blue_sampler {
    #[pymodule_export]
    use super::sampler_plugin::SamplerPlugin;
}
