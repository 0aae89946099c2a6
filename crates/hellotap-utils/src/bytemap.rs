//! Immutable-after-build hash map keyed by opaque byte strings.
//!
//! The map is built incrementally through [`MapBuilder`], then frozen into a
//! read-only [`BytesMap`]. Build and query phases are separate types, so
//! inserting after freeze or looking up before freeze does not compile.
//!
//! Slot selection uses a cryptographic digest (SHA-256 by default) rather
//! than a fast non-cryptographic hash: when keys come from untrusted
//! protocol fields, an adversary must not be able to predict slot placement
//! and force probe-chain blowup.
//!
//! There is no delete operation. That restriction is what keeps the
//! vacant-slot check (an empty key) sufficient for linear probing; adding
//! deletion later would require real tombstones.

use hellotap_types::MapError;
use sha2::digest::FixedOutputReset;
use sha2::{Digest, Sha256};

/// Initial slot count for a new builder.
const INITIAL_TABLE_SIZE: usize = 1024;

/// One table slot. An empty `key` marks a vacant slot; real keys are never
/// empty (rejected at insert).
#[derive(Default)]
struct Entry {
    key: Vec<u8>,
    value: Vec<u8>,
}

/// Deep-copy `src`, reporting allocation failure instead of aborting.
fn try_dup(src: &[u8]) -> Result<Vec<u8>, MapError> {
    let mut out = Vec::new();
    out.try_reserve_exact(src.len())
        .map_err(|_| MapError::MemAllocFail)?;
    out.extend_from_slice(src);
    Ok(out)
}

/// Allocate an all-vacant table of `capacity` slots.
fn new_table(capacity: usize) -> Result<Vec<Entry>, MapError> {
    let mut table = Vec::new();
    table
        .try_reserve_exact(capacity)
        .map_err(|_| MapError::MemAllocFail)?;
    table.resize_with(capacity, Entry::default);
    Ok(table)
}

/// Slot index for `key`: the first four digest bytes mod capacity.
/// The context is reset after each digest so it can be reused.
fn slot_for<D>(hasher: &mut D, capacity: usize, key: &[u8]) -> usize
where
    D: Digest + FixedOutputReset,
{
    Digest::update(hasher, key);
    let digest = Digest::finalize_reset(hasher);
    let word = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]);
    (word as usize) % capacity
}

/// Move an owned entry into `table` by linear probing. The caller
/// guarantees the key is absent and a vacant slot exists.
fn place<D>(hasher: &mut D, table: &mut [Entry], entry: Entry)
where
    D: Digest + FixedOutputReset,
{
    let capacity = table.len();
    let mut slot = slot_for(hasher, capacity, &entry.key);
    while !table[slot].key.is_empty() {
        slot = (slot + 1) % capacity;
    }
    table[slot] = entry;
}

/// Build phase of the byte-keyed map: insert-only.
///
/// Call [`MapBuilder::freeze`] to obtain the queryable [`BytesMap`]; the
/// transition is one-way.
pub struct MapBuilder<D = Sha256>
where
    D: Digest + FixedOutputReset + Clone,
{
    /// Total slot count. Kept at `>= 2 * size` by doubling before inserts.
    capacity: usize,
    /// Occupied slot count.
    size: usize,
    table: Vec<Entry>,
    hasher: D,
}

impl MapBuilder<Sha256> {
    /// Create an empty builder with the default SHA-256 slot digest.
    pub fn new() -> Result<Self, MapError> {
        Self::with_hasher(Sha256::new())
    }
}

impl<D> MapBuilder<D>
where
    D: Digest + FixedOutputReset + Clone,
{
    /// Create an empty builder using `hasher` for slot selection.
    pub fn with_hasher(hasher: D) -> Result<Self, MapError> {
        Ok(Self {
            capacity: INITIAL_TABLE_SIZE,
            size: 0,
            table: new_table(INITIAL_TABLE_SIZE)?,
            hasher,
        })
    }

    /// Number of entries inserted so far.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Insert a key/value pair, deep-copying both.
    ///
    /// Fails with [`MapError::DuplicateKey`] if an equal key is already
    /// present, and with [`MapError::EmptyKey`] for a zero-length key (the
    /// empty key is the vacant-slot marker and must never be stored).
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), MapError> {
        if key.is_empty() {
            return Err(MapError::EmptyKey);
        }
        if self.capacity < self.size * 2 {
            self.grow(self.capacity * 2)?;
        }

        let mut slot = slot_for(&mut self.hasher, self.capacity, key);
        // Linear probe until a vacant slot; full key comparison, not just
        // the digest, decides true equality.
        while !self.table[slot].key.is_empty() {
            if self.table[slot].key.as_slice() == key {
                return Err(MapError::DuplicateKey);
            }
            slot = (slot + 1) % self.capacity;
        }

        self.table[slot].key = try_dup(key)?;
        self.table[slot].value = try_dup(value)?;
        self.size += 1;
        Ok(())
    }

    /// Double the capacity and rebuild by re-placing every entry under the
    /// new modulus. Entries are moved, not recopied.
    fn grow(&mut self, capacity: usize) -> Result<(), MapError> {
        let mut table = new_table(capacity)?;
        for entry in self.table.drain(..) {
            if !entry.key.is_empty() {
                place(&mut self.hasher, &mut table, entry);
            }
        }
        self.table = table;
        self.capacity = capacity;
        Ok(())
    }

    /// Freeze the map: one-way transition from build to query phase.
    pub fn freeze(self) -> BytesMap<D> {
        BytesMap {
            capacity: self.capacity,
            size: self.size,
            table: self.table,
            hasher: self.hasher,
        }
    }
}

/// Query phase of the byte-keyed map: lookup-only.
pub struct BytesMap<D = Sha256>
where
    D: Digest + FixedOutputReset + Clone,
{
    capacity: usize,
    size: usize,
    table: Vec<Entry>,
    hasher: D,
}

impl<D> BytesMap<D>
where
    D: Digest + FixedOutputReset + Clone,
{
    /// Number of entries in the map.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Look up `key`, returning a borrowed view of the stored value.
    ///
    /// Uses the same slot/probe walk as insertion; an empty slot reached
    /// before a full-key match means the key is absent.
    pub fn lookup(&self, key: &[u8]) -> Option<&[u8]> {
        if key.is_empty() {
            return None;
        }
        let mut hasher = self.hasher.clone();
        let mut slot = slot_for(&mut hasher, self.capacity, key);
        while !self.table[slot].key.is_empty() {
            if self.table[slot].key.as_slice() == key {
                return Some(&self.table[slot].value);
            }
            slot = (slot + 1) % self.capacity;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_freeze_lookup() {
        let mut builder = MapBuilder::new().unwrap();
        builder.insert(b"alpha", b"one").unwrap();
        builder.insert(b"beta", b"two").unwrap();
        builder.insert(b"gamma", b"three").unwrap();
        assert_eq!(builder.len(), 3);

        let map = builder.freeze();
        assert_eq!(map.len(), 3);
        assert_eq!(map.lookup(b"alpha"), Some(&b"one"[..]));
        assert_eq!(map.lookup(b"beta"), Some(&b"two"[..]));
        assert_eq!(map.lookup(b"gamma"), Some(&b"three"[..]));
    }

    #[test]
    fn test_missing_key_not_found() {
        let mut builder = MapBuilder::new().unwrap();
        builder.insert(b"present", b"value").unwrap();
        let map = builder.freeze();
        assert_eq!(map.lookup(b"absent"), None);
        assert_eq!(map.lookup(b""), None);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut builder = MapBuilder::new().unwrap();
        builder.insert(b"key", b"first").unwrap();
        let err = builder.insert(b"key", b"second").unwrap_err();
        assert!(matches!(err, MapError::DuplicateKey));

        // The original value survives the rejected insert.
        let map = builder.freeze();
        assert_eq!(map.lookup(b"key"), Some(&b"first"[..]));
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut builder = MapBuilder::new().unwrap();
        let err = builder.insert(b"", b"value").unwrap_err();
        assert!(matches!(err, MapError::EmptyKey));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_empty_value_is_storable() {
        let mut builder = MapBuilder::new().unwrap();
        builder.insert(b"key", b"").unwrap();
        let map = builder.freeze();
        assert_eq!(map.lookup(b"key"), Some(&b""[..]));
    }

    #[test]
    fn test_entries_are_deep_copied() {
        let mut key = vec![1u8, 2, 3];
        let mut value = vec![9u8, 9];
        let mut builder = MapBuilder::new().unwrap();
        builder.insert(&key, &value).unwrap();

        // Mutating the caller's buffers must not affect the stored entry.
        key[0] = 0;
        value[0] = 0;

        let map = builder.freeze();
        assert_eq!(map.lookup(&[1, 2, 3]), Some(&[9u8, 9][..]));
        assert_eq!(map.lookup(&[0, 2, 3]), None);
    }

    #[test]
    fn test_growth_preserves_every_entry() {
        // Push well past the initial capacity's load threshold so the table
        // doubles several times.
        let count = 2000u32;
        let mut builder = MapBuilder::new().unwrap();
        for i in 0..count {
            let key = format!("key-{i}");
            builder.insert(key.as_bytes(), &i.to_be_bytes()).unwrap();
        }
        assert_eq!(builder.len(), count as usize);

        let map = builder.freeze();
        assert_eq!(map.len(), count as usize);
        for i in 0..count {
            let key = format!("key-{i}");
            assert_eq!(map.lookup(key.as_bytes()), Some(&i.to_be_bytes()[..]));
        }
    }

    #[test]
    fn test_custom_digest() {
        use sha2::Sha384;

        let mut builder = MapBuilder::with_hasher(Sha384::new()).unwrap();
        builder.insert(b"key", b"value").unwrap();
        let map = builder.freeze();
        assert_eq!(map.lookup(b"key"), Some(&b"value"[..]));
    }
}
