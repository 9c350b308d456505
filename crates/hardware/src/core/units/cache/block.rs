//! Block Storage.
//!
//! Per-way state of a set-associative structure, held in a flat arena
//! addressed by `set * ways + way`. Replacement policies receive a mutable
//! slice covering exactly one set for the duration of a call.

/// State of a single way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Block {
    /// Address tag of the resident line.
    pub tag: u64,
    /// Whether the way holds a line. Invalid ways are filled without eviction.
    pub valid: bool,
    /// Replacement state. An RRPV under RRIP, a stack position under LRU.
    pub counter: u32,
}

/// Arena of blocks for every set of one structure.
#[derive(Clone, Debug)]
pub struct BlockStore {
    blocks: Vec<Block>,
    num_sets: usize,
    ways: usize,
}

impl BlockStore {
    /// Creates a store of `num_sets * ways` invalid blocks.
    ///
    /// # Arguments
    ///
    /// * `num_sets` - The number of sets.
    /// * `ways` - The associativity.
    pub fn new(num_sets: usize, ways: usize) -> Self {
        Self {
            blocks: vec![Block::default(); num_sets * ways],
            num_sets,
            ways,
        }
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Associativity.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Blocks of one set.
    ///
    /// # Panics
    ///
    /// Panics if `set_index` is out of range.
    pub fn set(&self, set_index: usize) -> &[Block] {
        let base = self.base(set_index);
        &self.blocks[base..base + self.ways]
    }

    /// Mutable view of one set.
    ///
    /// # Panics
    ///
    /// Panics if `set_index` is out of range.
    pub fn set_mut(&mut self, set_index: usize) -> &mut [Block] {
        let base = self.base(set_index);
        &mut self.blocks[base..base + self.ways]
    }

    /// A single block.
    ///
    /// # Panics
    ///
    /// Panics if `set_index` or `way` is out of range.
    pub fn block(&self, set_index: usize, way: usize) -> &Block {
        assert!(way < self.ways, "way {way} out of range for {}-way set", self.ways);
        &self.blocks[self.base(set_index) + way]
    }

    /// Finds the way holding a valid block with `tag`.
    pub fn find(&self, set_index: usize, tag: u64) -> Option<usize> {
        self.set(set_index)
            .iter()
            .position(|b| b.valid && b.tag == tag)
    }

    /// Marks every block invalid and clears its counter.
    pub fn invalidate_all(&mut self) {
        for b in &mut self.blocks {
            *b = Block::default();
        }
    }

    fn base(&self, set_index: usize) -> usize {
        assert!(
            set_index < self.num_sets,
            "set {set_index} out of range for {} sets",
            self.num_sets
        );
        set_index * self.ways
    }
}
