pub mod factory;
pub mod toolchain;

pub use factory::build_toolchain;
