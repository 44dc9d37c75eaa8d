/// Version tag written into every session snapshot.
/// Bump when the snapshot layout changes; older snapshots are then refused
/// rather than misread.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;
