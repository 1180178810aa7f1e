use cozy_chess::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Clone, Copy, Debug)]
pub struct Entry {
    pub key: u64,
    pub depth: u32,
    pub score: i32,
    pub bound: Bound,
    pub best: Option<Move>,
    pub gen: u32,
}

/// Outcome of a depth- and window-qualified probe.
#[derive(Clone, Copy, Debug)]
pub enum Probe {
    /// The entry settles this node outside or inside the window; the score
    /// can be returned without expanding children.
    Hit(i32),
    /// No usable score; carries the remembered best move for ordering.
    Miss(Option<Move>),
}

const WAYS: usize = 4;

#[derive(Default, Clone, Copy)]
struct Slot(Option<Entry>);

#[derive(Default, Clone)]
struct Bucket {
    slots: [Slot; WAYS],
}

/// Bounded transposition table, exclusively owned by one searcher.
/// Entries are evicted lowest-depth-first, then oldest-generation-first.
#[derive(Default)]
pub struct Tt {
    buckets: Vec<Bucket>,
    gen: u32,
}

impl Tt {
    pub fn new() -> Self {
        Self { buckets: Vec::new(), gen: 0 }
    }

    pub fn set_capacity_entries(&mut self, cap: usize) {
        let entries = cap.max(WAYS);
        let buckets = (entries + WAYS - 1) / WAYS;
        self.buckets.clear();
        self.buckets.resize_with(buckets, Bucket::default);
    }

    pub fn set_capacity_mb(&mut self, mb: usize) {
        // Heuristic: ~64 bytes per entry
        let entries = ((mb.saturating_mul(1024) * 1024) / 64).max(WAYS);
        self.set_capacity_entries(entries);
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            *bucket = Bucket::default();
        }
    }

    pub fn len(&self) -> usize {
        self.buckets
            .iter()
            .flat_map(|b| b.slots.iter())
            .filter(|s| s.0.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bucket_index(&self, key: u64) -> usize {
        let mixed = key ^ (key >> 32);
        (mixed as usize) % self.buckets.len().max(1)
    }

    pub fn get(&self, key: u64) -> Option<Entry> {
        let bucket = self.buckets.get(self.bucket_index(key))?;
        bucket.slots.iter().find_map(|slot| match slot.0 {
            Some(e) if e.key == key => Some(e),
            _ => None,
        })
    }

    /// Depth-qualified lookup. A shallower entry never satisfies a deeper
    /// request; bound entries only cut off when they prove the node falls
    /// outside the `[alpha, beta)` window.
    pub fn probe(&self, key: u64, depth: u32, alpha: i32, beta: i32) -> Probe {
        match self.get(key) {
            Some(e) if e.depth >= depth => match e.bound {
                Bound::Exact => Probe::Hit(e.score),
                Bound::Lower if e.score >= beta => Probe::Hit(e.score),
                Bound::Upper if e.score <= alpha => Probe::Hit(e.score),
                _ => Probe::Miss(e.best),
            },
            Some(e) => Probe::Miss(e.best),
            None => Probe::Miss(None),
        }
    }

    pub fn store(&mut self, key: u64, depth: u32, score: i32, bound: Bound, best: Option<Move>) {
        if self.buckets.is_empty() {
            return;
        }
        let entry = Entry { key, depth, score, bound, best, gen: self.gen };
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];

        // Same key: keep the deeper of the two results.
        for slot in &mut bucket.slots {
            if let Some(cur) = slot.0 {
                if cur.key == key {
                    if entry.depth >= cur.depth {
                        slot.0 = Some(entry);
                    }
                    return;
                }
            }
        }
        // Otherwise fill an empty slot.
        for slot in &mut bucket.slots {
            if slot.0.is_none() {
                slot.0 = Some(entry);
                return;
            }
        }
        // Full bucket: evict the shallowest, oldest victim.
        let mut victim = 0usize;
        let mut victim_rank = (u32::MAX, u32::MAX);
        for (i, slot) in bucket.slots.iter().enumerate() {
            if let Some(cur) = slot.0 {
                let rank = (cur.depth, cur.gen);
                if rank < victim_rank {
                    victim_rank = rank;
                    victim = i;
                }
            }
        }
        bucket.slots[victim].0 = Some(entry);
    }

    pub fn bump_generation(&mut self) {
        self.gen = self.gen.wrapping_add(1);
    }
}
