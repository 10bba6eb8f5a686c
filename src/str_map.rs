use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::capacity;
use crate::error::Error;
use crate::hash::PolyHash;
use crate::hash::StrHasher;

/// A key, its data, and the key's cached hash, as stored in one slot.
///
/// Both references are borrowed from the caller for `'a`; the map never
/// copies or frees them. `Entry` is `Copy` regardless of `D`.
pub struct Entry<'a, D: ?Sized> {
    /// The borrowed key.
    pub key: &'a str,
    /// The borrowed user data.
    pub data: &'a D,
    /// The key's hash, computed once on insertion.
    pub hash: u64,
}

impl<D: ?Sized> Clone for Entry<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: ?Sized> Copy for Entry<'_, D> {}

impl<D: ?Sized + Debug> Debug for Entry<'_, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("data", &self.data)
            .field("hash", &format_args!("{:#018x}", self.hash))
            .finish()
    }
}

impl<D: ?Sized + PartialEq> PartialEq for Entry<'_, D> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.key == other.key && self.data == other.data
    }
}

impl<D: ?Sized + Eq> Eq for Entry<'_, D> {}

/// Result of a successful [`StrMap::upsert`].
#[derive(Debug, PartialEq, Eq)]
pub enum Upsert<'a, D: ?Sized> {
    /// The key was absent; holds the new entry.
    Inserted(Entry<'a, D>),
    /// The key was present; holds the entry as it was before the update.
    Updated(Entry<'a, D>),
}

impl<D: ?Sized> Clone for Upsert<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: ?Sized> Copy for Upsert<'_, D> {}

impl<'a, D: ?Sized> Upsert<'a, D> {
    /// Returns the carried entry.
    pub fn entry(&self) -> Entry<'a, D> {
        match *self {
            Upsert::Inserted(entry) | Upsert::Updated(entry) => entry,
        }
    }

    /// Returns `true` if the upsert placed a new key.
    pub fn is_inserted(&self) -> bool {
        matches!(self, Upsert::Inserted(_))
    }
}

enum Slot<'a, D: ?Sized> {
    Empty,
    Occupied(Entry<'a, D>),
}

impl<D: ?Sized> Clone for Slot<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: ?Sized> Copy for Slot<'_, D> {}

/// Where a key lives, or where it would be inserted.
enum Probe<'a, D: ?Sized> {
    Found {
        index: usize,
        entry: Entry<'a, D>,
    },
    /// `distance` is the searched key's own probe distance at `index`.
    Vacant { index: usize, distance: usize },
}

#[inline(always)]
fn home(capacity: usize, hash: u64) -> usize {
    (hash % capacity as u64) as usize
}

#[inline(always)]
fn next(capacity: usize, index: usize) -> usize {
    let index = index + 1;
    if index == capacity { 0 } else { index }
}

/// Forward circular distance from the home of `hash` to `index`.
#[inline(always)]
fn probe_distance(capacity: usize, index: usize, hash: u64) -> usize {
    let home = home(capacity, hash);
    if index >= home {
        index - home
    } else {
        capacity - home + index
    }
}

fn try_alloc_slots<'a, D: ?Sized>(capacity: usize) -> Result<Vec<Slot<'a, D>>, Error> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize(capacity, Slot::Empty);
    Ok(slots)
}

/// Robin Hood insertion starting at `start`, where the carried entry already
/// has probe distance `distance`.
///
/// Walks forward until an empty slot absorbs whatever entry is being carried.
/// An occupant whose distance is strictly shorter than the carried entry's
/// is displaced and carried on in its place. Returns the slot that received
/// `entry`.
///
/// The slice must contain at least one empty slot.
fn insert_at<'a, D: ?Sized>(
    slots: &mut [Slot<'a, D>],
    entry: Entry<'a, D>,
    start: usize,
    distance: usize,
) -> usize {
    let capacity = slots.len();
    let mut carried = entry;
    let mut distance = distance;
    let mut index = start;
    let mut placed = None;

    loop {
        match slots[index] {
            Slot::Empty => {
                slots[index] = Slot::Occupied(carried);
                return placed.unwrap_or(index);
            }
            Slot::Occupied(occupant) => {
                let occupant_distance = probe_distance(capacity, index, occupant.hash);
                if distance > occupant_distance {
                    slots[index] = Slot::Occupied(carried);
                    placed.get_or_insert(index);
                    carried = occupant;
                    distance = occupant_distance;
                }
            }
        }

        distance += 1;
        index = next(capacity, index);
    }
}

/// An open-addressing map from borrowed string keys to borrowed data.
///
/// Collisions are resolved with Robin Hood linear probing: an insertion may
/// take the slot of an entry that sits closer to its home than the inserted
/// key would, which keeps probe lengths short and uniform. Removal shifts the
/// following run of displaced entries back by one slot instead of leaving
/// tombstones.
///
/// Keys and data are references with lifetime `'a`. The map stores only the
/// references plus each key's cached hash, so it never allocates per entry
/// and never drops user data.
///
/// The slot count never has a prime factor below 11, and the table grows to
/// roughly one and a half times its population once the occupancy ceiling is
/// reached.
///
/// ## Example
///
/// ```rust
/// # use strmap::Error;
/// # use strmap::StrMap;
/// #
/// let (one, two) = (1, 2);
/// let mut map = StrMap::with_capacity(16);
///
/// map.insert("one", &one).unwrap();
/// assert_eq!(map.insert("one", &two), Err(Error::Duplicate));
///
/// let previous = map.update("one", &two).unwrap();
/// assert_eq!(*previous.data, 1);
/// assert_eq!(map.get("one"), Some(&2));
///
/// map.remove("one").unwrap();
/// assert_eq!(map.lookup("one"), Err(Error::NotFound));
/// ```
pub struct StrMap<'a, D: ?Sized, H = PolyHash> {
    slots: Vec<Slot<'a, D>>,
    size: usize,
    msize: usize,
    hasher: H,
}

impl<D: ?Sized + Debug, H> Debug for StrMap<'_, D, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for entry in self.iter() {
            map.entry(&entry.key, &entry.data);
        }
        map.finish()
    }
}

impl<D: ?Sized, H: Clone> Clone for StrMap<'_, D, H> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            size: self.size,
            msize: self.msize,
            hasher: self.hasher.clone(),
        }
    }
}

impl<D: ?Sized> Default for StrMap<'_, D, PolyHash> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, D: ?Sized> StrMap<'a, D, PolyHash> {
    /// Creates an empty map with the minimum capacity and the default
    /// polynomial hash.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty map that holds at least `capacity` entries before
    /// growing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strmap::StrMap;
    /// #
    /// let map: StrMap<u32> = StrMap::with_capacity(100);
    /// assert_eq!(map.ceiling(), 100);
    /// assert!(map.capacity() > 100);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, PolyHash)
    }
}

impl StrMap<'static, (), PolyHash> {
    /// Returns a [`Builder`] for configuring a map.
    ///
    /// The data type is picked by [`Builder::build`], not here.
    pub fn builder() -> Builder<PolyHash> {
        Builder::new()
    }
}

impl<'a, D: ?Sized, H: StrHasher> StrMap<'a, D, H> {
    /// Creates an empty map with the minimum capacity and the given hash
    /// strategy.
    pub fn with_hasher(hasher: H) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    /// Creates an empty map that holds at least `capacity` entries before
    /// growing, hashing keys with `hasher`.
    ///
    /// # Panics
    ///
    /// Panics if the slot count overflows `usize`. Aborts if the slot array
    /// cannot be allocated. Use [`StrMap::try_with_capacity_and_hasher`] to
    /// handle both as errors.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Self {
        let msize = capacity::occupancy_ceiling(capacity);
        let slot_count = capacity::plan_capacity(msize).expect("capacity overflow");
        Self::from_slots(vec![Slot::Empty; slot_count], msize, hasher)
    }

    /// Fallible form of [`StrMap::with_capacity_and_hasher`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strmap::Error;
    /// # use strmap::PolyHash;
    /// # use strmap::StrMap;
    /// #
    /// let map = StrMap::<str, _>::try_with_capacity_and_hasher(1000, PolyHash).unwrap();
    /// assert!(map.is_empty());
    ///
    /// let huge = StrMap::<str, _>::try_with_capacity_and_hasher(usize::MAX, PolyHash);
    /// assert_eq!(huge.unwrap_err(), Error::CapacityOverflow);
    /// ```
    pub fn try_with_capacity_and_hasher(capacity: usize, hasher: H) -> Result<Self, Error> {
        let msize = capacity::occupancy_ceiling(capacity);
        let slot_count = capacity::plan_capacity(msize).ok_or(Error::CapacityOverflow)?;
        Ok(Self::from_slots(try_alloc_slots(slot_count)?, msize, hasher))
    }

    fn from_slots(slots: Vec<Slot<'a, D>>, msize: usize, hasher: H) -> Self {
        trace!(capacity = slots.len(), ceiling = msize, "created string map");
        Self {
            slots,
            size: 0,
            msize,
            hasher,
        }
    }

    /// Creates an independent map with the same entries and hash strategy,
    /// sized to hold at least `capacity` entries before growing.
    ///
    /// The effective request is never below the current length. Entries are
    /// re-placed from their cached hashes, so the physical layout may differ
    /// from `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strmap::StrMap;
    /// #
    /// let data = [10, 20, 30];
    /// let mut map = StrMap::new();
    /// for (key, value) in ["a", "b", "c"].into_iter().zip(&data) {
    ///     map.insert(key, value).unwrap();
    /// }
    ///
    /// let copy = map.try_clone_with_capacity(500).unwrap();
    /// assert_eq!(copy.len(), 3);
    /// assert_eq!(copy.get("b"), Some(&20));
    /// assert!(copy.capacity() > map.capacity());
    /// ```
    pub fn try_clone_with_capacity(&self, capacity: usize) -> Result<Self, Error>
    where
        H: Clone,
    {
        let (slots, msize) = self.rebuild_slots(capacity.max(self.size))?;
        Ok(Self {
            slots,
            size: self.size,
            msize,
            hasher: self.hasher.clone(),
        })
    }

    /// Returns the hash strategy.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of slots in the backing array.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the occupancy at which the next new key triggers growth.
    pub fn ceiling(&self) -> usize {
        self.msize
    }

    /// Looks up `key` and returns a copy of its entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strmap::Error;
    /// # use strmap::StrMap;
    /// #
    /// let value = 7u8;
    /// let mut map = StrMap::new();
    /// map.insert("seven", &value).unwrap();
    ///
    /// let entry = map.lookup("seven").unwrap();
    /// assert_eq!(entry.key, "seven");
    /// assert_eq!(*entry.data, 7);
    /// assert_eq!(map.lookup("eight"), Err(Error::NotFound));
    /// ```
    pub fn lookup(&self, key: &str) -> Result<Entry<'a, D>, Error> {
        let hash = self.hasher.hash_str(key);
        match self.locate(key, hash) {
            Probe::Found { entry, .. } => Ok(entry),
            Probe::Vacant { .. } => Err(Error::NotFound),
        }
    }

    /// Returns the data stored for `key`.
    pub fn get(&self, key: &str) -> Option<&'a D> {
        self.lookup(key).ok().map(|entry| entry.data)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lookup(key).is_ok()
    }

    /// Inserts a key that must not already be present.
    ///
    /// Returns the new entry. Fails with [`Error::Duplicate`] without touching
    /// the map if the key exists, or [`Error::MapFull`] if the map had to grow
    /// and could not.
    pub fn insert(&mut self, key: &'a str, data: &'a D) -> Result<Entry<'a, D>, Error> {
        let hash = self.hasher.hash_str(key);
        match self.locate(key, hash) {
            Probe::Found { .. } => Err(Error::Duplicate),
            Probe::Vacant { index, distance } => {
                self.insert_new(Entry { key, data, hash }, index, distance)
            }
        }
    }

    /// Replaces the data of a key that must already be present.
    ///
    /// Returns the entry as it was before the update. Never grows the map.
    pub fn update(&mut self, key: &str, data: &'a D) -> Result<Entry<'a, D>, Error> {
        let hash = self.hasher.hash_str(key);
        match self.locate(key, hash) {
            Probe::Found { index, entry } => {
                self.slots[index] = Slot::Occupied(Entry { data, ..entry });
                Ok(entry)
            }
            Probe::Vacant { .. } => Err(Error::NotFound),
        }
    }

    /// Updates `key` if present, otherwise inserts it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strmap::StrMap;
    /// # use strmap::Upsert;
    /// #
    /// let (first, second) = ("first", "second");
    /// let mut map = StrMap::new();
    ///
    /// assert!(map.upsert("k", &first).unwrap().is_inserted());
    /// match map.upsert("k", &second).unwrap() {
    ///     Upsert::Updated(previous) => assert_eq!(*previous.data, "first"),
    ///     Upsert::Inserted(_) => unreachable!(),
    /// }
    /// assert_eq!(map.get("k"), Some(&"second"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn upsert(&mut self, key: &'a str, data: &'a D) -> Result<Upsert<'a, D>, Error> {
        let hash = self.hasher.hash_str(key);
        match self.locate(key, hash) {
            Probe::Found { index, entry } => {
                self.slots[index] = Slot::Occupied(Entry { data, ..entry });
                Ok(Upsert::Updated(entry))
            }
            Probe::Vacant { index, distance } => self
                .insert_new(Entry { key, data, hash }, index, distance)
                .map(Upsert::Inserted),
        }
    }

    /// Removes a key that must be present and returns its entry.
    pub fn remove(&mut self, key: &str) -> Result<Entry<'a, D>, Error> {
        let hash = self.hasher.hash_str(key);
        match self.locate(key, hash) {
            Probe::Found { index, entry } => {
                self.remove_at(index);
                Ok(entry)
            }
            Probe::Vacant { .. } => Err(Error::NotFound),
        }
    }

    /// Grows the map, if needed, so that `additional` more keys fit before the
    /// next growth.
    ///
    /// On error the map is unchanged.
    pub fn reserve(&mut self, additional: usize) -> Result<(), Error> {
        let required = self
            .size
            .checked_add(additional)
            .ok_or(Error::CapacityOverflow)?;
        if required > self.msize {
            let (slots, msize) = self.rebuild_slots(required)?;
            self.replace_slots(slots, msize);
        }
        Ok(())
    }

    /// Finds `key` or the slot where it would be inserted.
    ///
    /// The scan stops at the first empty slot, or at the first occupant that
    /// sits closer to its own home than the search has travelled: under the
    /// Robin Hood ordering the key cannot be stored past such a slot.
    fn locate(&self, key: &str, hash: u64) -> Probe<'a, D> {
        let capacity = self.slots.len();
        let mut index = home(capacity, hash);
        let mut distance = 0;

        loop {
            match self.slots[index] {
                Slot::Empty => return Probe::Vacant { index, distance },
                Slot::Occupied(entry) => {
                    if entry.hash == hash && entry.key == key {
                        return Probe::Found { index, entry };
                    }
                    if distance > probe_distance(capacity, index, entry.hash) {
                        return Probe::Vacant { index, distance };
                    }
                }
            }

            distance += 1;
            index = next(capacity, index);
        }
    }

    /// Places a key already known to be absent, growing first if the map is
    /// at its ceiling. `index` and `distance` come from [`Self::locate`].
    fn insert_new(
        &mut self,
        entry: Entry<'a, D>,
        index: usize,
        distance: usize,
    ) -> Result<Entry<'a, D>, Error> {
        let (index, distance) = if self.size >= self.msize {
            self.grow()?;
            (home(self.slots.len(), entry.hash), 0)
        } else {
            (index, distance)
        };

        let placed = insert_at(&mut self.slots, entry, index, distance);
        debug_assert!(matches!(self.slots[placed], Slot::Occupied(e) if e.key == entry.key));
        self.size += 1;

        Ok(entry)
    }

    /// Backward-shift deletion of the entry at `index`.
    fn remove_at(&mut self, index: usize) {
        let capacity = self.slots.len();
        self.slots[index] = Slot::Empty;

        let mut vacant = index;
        let mut current = next(capacity, index);
        while let Slot::Occupied(entry) = self.slots[current] {
            if probe_distance(capacity, current, entry.hash) == 0 {
                break;
            }
            self.slots[vacant] = Slot::Occupied(entry);
            self.slots[current] = Slot::Empty;
            vacant = current;
            current = next(capacity, current);
        }

        self.size -= 1;
    }

    fn grow(&mut self) -> Result<(), Error> {
        let requested = self
            .size
            .checked_add((self.size / 2).max(1))
            .ok_or(Error::MapFull)?;

        match self.rebuild_slots(requested) {
            Ok((slots, msize)) => {
                self.replace_slots(slots, msize);
                Ok(())
            }
            Err(error) => {
                warn!(size = self.size, requested, %error, "string map could not grow");
                Err(Error::MapFull)
            }
        }
    }

    /// Builds a new slot array planned for `min_occupancy` holding every
    /// current entry. `self` is not modified.
    fn rebuild_slots(&self, min_occupancy: usize) -> Result<(Vec<Slot<'a, D>>, usize), Error> {
        debug_assert!(min_occupancy >= self.size);

        let msize = capacity::occupancy_ceiling(min_occupancy);
        let slot_count = capacity::plan_capacity(msize).ok_or(Error::CapacityOverflow)?;
        let mut slots = try_alloc_slots(slot_count)?;

        for slot in &self.slots {
            if let Slot::Occupied(entry) = *slot {
                insert_at(&mut slots, entry, home(slot_count, entry.hash), 0);
            }
        }

        Ok((slots, msize))
    }

    fn replace_slots(&mut self, slots: Vec<Slot<'a, D>>, msize: usize) {
        debug!(
            size = self.size,
            old_capacity = self.slots.len(),
            new_capacity = slots.len(),
            ceiling = msize,
            "resized string map"
        );
        self.slots = slots;
        self.msize = msize;
    }
}

impl<'a, D: ?Sized, H> StrMap<'a, D, H> {
    /// Returns an iterator over all entries in physical slot order.
    ///
    /// The order is unrelated to insertion order and changes when the map
    /// grows.
    pub fn iter(&self) -> Iter<'_, 'a, D> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.size,
        }
    }

    /// Calls `f` on every entry in physical slot order.
    pub fn for_each(&self, mut f: impl FnMut(Entry<'a, D>)) {
        for entry in self.iter() {
            f(entry);
        }
    }

    /// Removes all entries, keeping the current capacity.
    pub fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
        self.size = 0;
    }

    /// Returns `len() / capacity()`.
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.slots.len() as f64
    }

    /// Mean probe distance over all entries, or 0.0 when empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strmap::StrMap;
    /// #
    /// let mut map = StrMap::with_hasher(|_: &str| 0u64);
    /// assert_eq!(map.probe_mean(), 0.0);
    ///
    /// for key in ["a", "b", "c"] {
    ///     map.insert(key, &()).unwrap();
    /// }
    /// // All three share home slot 0 and sit at distances 0, 1 and 2.
    /// assert_eq!(map.probe_mean(), 1.0);
    /// ```
    pub fn probe_mean(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        let total: usize = self.probe_distances().sum();
        total as f64 / self.size as f64
    }

    /// Population variance of the probe distance over all entries, or 0.0
    /// when empty.
    pub fn probe_variance(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        let mean = self.probe_mean();
        let total: f64 = self
            .probe_distances()
            .map(|distance| {
                let diff = distance as f64 - mean;
                diff * diff
            })
            .sum();
        total / self.size as f64
    }

    fn probe_distances(&self) -> impl Iterator<Item = usize> + '_ {
        let capacity = self.slots.len();
        self.slots
            .iter()
            .enumerate()
            .filter_map(move |(index, slot)| match slot {
                Slot::Occupied(entry) => Some(probe_distance(capacity, index, entry.hash)),
                Slot::Empty => None,
            })
    }

    /// Returns a histogram of probe distances: element `n` counts the entries
    /// sitting `n` slots past their home.
    ///
    /// Requires the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let mut hist = Vec::new();
        for distance in self.probe_distances() {
            if hist.len() <= distance {
                hist.resize(distance + 1, 0);
            }
            hist[distance] += 1;
        }
        hist
    }

    /// Returns the longest probe distance in the map.
    ///
    /// Requires the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn max_probe(&self) -> usize {
        self.probe_distances().max().unwrap_or(0)
    }

    /// Returns a snapshot of occupancy and probe statistics.
    ///
    /// Requires the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        DebugStats {
            populated: self.size,
            ceiling: self.msize,
            total_slots: self.slots.len(),
            load_factor: self.load_factor(),
            probe_mean: self.probe_mean(),
            probe_variance: self.probe_variance(),
            max_probe: self.max_probe(),
            total_bytes: self.slots.len() * core::mem::size_of::<Slot<'a, D>>(),
        }
    }

    /// Panics unless every structural invariant holds.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let capacity = self.slots.len();
        assert!(self.size <= self.msize, "size {} > ceiling {}", self.size, self.msize);
        assert!(self.msize < capacity, "ceiling {} >= capacity {capacity}", self.msize);
        assert_eq!(self.iter().count(), self.size);

        for index in 0..capacity {
            let following = next(capacity, index);
            let Slot::Occupied(after) = self.slots[following] else {
                continue;
            };
            let after_distance = probe_distance(capacity, following, after.hash);
            match self.slots[index] {
                Slot::Empty => assert_eq!(
                    after_distance, 0,
                    "entry {:?} at {following} follows an empty slot",
                    after.key
                ),
                Slot::Occupied(before) => {
                    let before_distance = probe_distance(capacity, index, before.hash);
                    assert!(
                        after_distance <= before_distance + 1,
                        "robin hood order broken at {index}: {before_distance} then {after_distance}"
                    );
                }
            }
        }
    }
}

impl<'a, D: ?Sized, H: StrHasher> Extend<(&'a str, &'a D)> for StrMap<'a, D, H> {
    /// Upserts every pair.
    ///
    /// # Panics
    ///
    /// Panics if the map needs to grow and cannot.
    fn extend<I: IntoIterator<Item = (&'a str, &'a D)>>(&mut self, iter: I) {
        for (key, data) in iter {
            self.upsert(key, data).expect("string map could not grow");
        }
    }
}

impl<'m, 'a, D: ?Sized, H> IntoIterator for &'m StrMap<'a, D, H> {
    type Item = Entry<'a, D>;
    type IntoIter = Iter<'m, 'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`StrMap`], in physical slot order.
pub struct Iter<'m, 'a, D: ?Sized> {
    slots: core::slice::Iter<'m, Slot<'a, D>>,
    remaining: usize,
}

impl<'a, D: ?Sized> Iterator for Iter<'_, 'a, D> {
    type Item = Entry<'a, D>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(entry) = *slot {
                self.remaining -= 1;
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<D: ?Sized> ExactSizeIterator for Iter<'_, '_, D> {}

/// Builder for [`StrMap`].
///
/// # Examples
///
/// ```rust
/// # use strmap::StrMap;
/// # use strmap::hash::poly_hash;
/// #
/// let map: StrMap<u64, _> = StrMap::builder()
///     .capacity(64)
///     .hasher(|key: &str| poly_hash(key).rotate_left(17))
///     .try_build()
///     .unwrap();
/// assert_eq!(map.ceiling(), 64);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder<H = PolyHash> {
    capacity: usize,
    hasher: H,
}

impl Builder<PolyHash> {
    /// A builder for a minimum-capacity map using [`PolyHash`].
    pub fn new() -> Self {
        Self {
            capacity: 0,
            hasher: PolyHash,
        }
    }
}

impl<H: StrHasher> Builder<H> {
    /// Sets the number of entries the map holds before its first growth.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Replaces the hash strategy.
    pub fn hasher<H2: StrHasher>(self, hasher: H2) -> Builder<H2> {
        Builder {
            capacity: self.capacity,
            hasher,
        }
    }

    /// Builds the map. See [`StrMap::with_capacity_and_hasher`].
    pub fn build<'a, D: ?Sized>(self) -> StrMap<'a, D, H> {
        StrMap::with_capacity_and_hasher(self.capacity, self.hasher)
    }

    /// Builds the map, reporting allocation failure.
    pub fn try_build<'a, D: ?Sized>(self) -> Result<StrMap<'a, D, H>, Error> {
        StrMap::try_with_capacity_and_hasher(self.capacity, self.hasher)
    }
}

/// Occupancy and probe statistics of a [`StrMap`].
///
/// Requires the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of entries
    pub populated: usize,
    /// Occupancy that triggers the next growth
    pub ceiling: usize,
    /// Number of slots allocated
    pub total_slots: usize,
    /// populated / total_slots
    pub load_factor: f64,
    /// Mean probe distance
    pub probe_mean: f64,
    /// Population variance of the probe distance
    pub probe_variance: f64,
    /// Longest probe distance
    pub max_probe: usize,
    /// Bytes held by the slot array
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== String Map Statistics ===");
        println!(
            "Population: {}/{} slots ({:.2}% load factor, ceiling {})",
            self.populated,
            self.total_slots,
            self.load_factor * 100.0,
            self.ceiling
        );
        println!(
            "Probes: mean {:.3}, variance {:.3}, max {}",
            self.probe_mean, self.probe_variance, self.max_probe
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}
