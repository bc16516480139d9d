pub(crate) mod pluggy_functions_provider;
pub(crate) mod pluggy_provider;

pub use pluggy_functions_provider::PluggyFunctionsProvider;
pub use pluggy_provider::PluggyProvider;
