use crate::MortonSplit;

/// Which strategy to use when building the tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuilderKind {
    /// Binned surface area heuristic; slower to build, faster to trace.
    #[default]
    Sah,

    /// Morton-code ordering; cheap to build.
    Lbvh,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BvhConfig {
    leaf_capacity: usize,
    builder: BuilderKind,
    morton_split: MortonSplit,
}

impl BvhConfig {
    /// Maximum number of triangles a single leaf may hold.
    pub fn leaf_capacity(&self) -> usize {
        self.leaf_capacity
    }

    pub fn with_leaf_capacity(mut self, leaf_capacity: usize) -> Self {
        self.leaf_capacity = leaf_capacity;
        self
    }

    pub fn builder(&self) -> BuilderKind {
        self.builder
    }

    pub fn with_builder(mut self, builder: BuilderKind) -> Self {
        self.builder = builder;
        self
    }

    /// How the Morton-ordered triangles get bisected; only relevant for
    /// [`BuilderKind::Lbvh`].
    pub fn morton_split(&self) -> MortonSplit {
        self.morton_split
    }

    pub fn with_morton_split(mut self, morton_split: MortonSplit) -> Self {
        self.morton_split = morton_split;
        self
    }
}

impl Default for BvhConfig {
    fn default() -> Self {
        Self {
            leaf_capacity: 1,
            builder: Default::default(),
            morton_split: Default::default(),
        }
    }
}
