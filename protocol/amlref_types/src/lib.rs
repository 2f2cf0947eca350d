// Core types shared by the SCCCG-AML2025 reference crates
pub mod level;
pub mod measurement;
pub mod stage;

pub use level::*;
pub use measurement::*;
pub use stage::*;
