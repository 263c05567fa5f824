//! [`Printable`](super::Printable) implementations.

mod interface;
mod ipv4;
mod phy;
mod rfkill;
mod scan;
