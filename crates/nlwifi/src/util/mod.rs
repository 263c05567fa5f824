//! Shared helpers for device names and hardware addresses.

pub mod addr;
pub mod ifname;

pub use addr::MacAddr;
pub use ifname::{IFNAMSIZ, index_to_name, name_to_index};
