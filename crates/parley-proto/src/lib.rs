/// Parley wire envelope: a self-describing binary form for domain objects.
///
/// Every transportable value serializes through one entry point,
/// [`Packet::dump`], which prepends a fixed-width kind tag so the peer can
/// dispatch to the matching decoder without out-of-band context.

pub mod packet;

pub use packet::{Packet, PacketError, PacketKind};
