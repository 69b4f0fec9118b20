mod region;
mod registry;
mod selection;
#[allow(clippy::module_inception)]
mod zone;

pub use region::{BlockPos, Region};
pub use registry::{ZoneRegistry, MAX_NAME_LEN};
pub use selection::{PendingSelection, SelectionSlot};
pub use zone::{Actor, Zone, ZoneId};

pub(crate) use zone::now_millis;
