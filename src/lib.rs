pub mod approval;
pub mod commands;
pub mod config;
pub mod errors;
pub mod gate;
pub mod net;
pub mod storage;
pub mod zone;

pub use config::PrivatesConfig;
pub use errors::RegistryError;
pub use gate::{Decision, ProtectionGate};
pub use zone::{Actor, Zone, ZoneId, ZoneRegistry};
