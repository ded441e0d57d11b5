//! Typed arena indices for maps, nodes, and links.

/// Sequential identifier of a compiled [`Map`](super::Map) within one run.
///
/// Assigned at map creation; the root directory's map is always id 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MapId(u32);

impl MapId {
    /// Creates a new MapId from a usize.
    ///
    /// # Panics
    /// Panics if `index >= u32::MAX`.
    #[inline]
    pub fn new(index: usize) -> Self {
        assert!(index < u32::MAX as usize, "map id must be less than u32::MAX");
        Self(index as u32)
    }

    /// Returns the id as a usize.
    #[inline]
    pub fn get(&self) -> usize {
        self.0 as usize
    }
}

/// A compact 32-bit index into a map's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NodeIndex(u32);

impl NodeIndex {
    /// Index of a map's root node.
    pub const ROOT: Self = Self(0);

    /// Creates a new NodeIndex from a usize.
    ///
    /// # Panics
    /// Panics if `index >= u32::MAX`.
    #[inline]
    pub fn new(index: usize) -> Self {
        assert!(
            index < u32::MAX as usize,
            "node index must be less than u32::MAX"
        );
        Self(index as u32)
    }

    /// Returns the index as a usize.
    #[inline]
    pub fn get(&self) -> usize {
        self.0 as usize
    }
}

/// A compact 32-bit index into a map's link arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct LinkIndex(u32);

impl LinkIndex {
    /// Creates a new LinkIndex from a usize.
    ///
    /// # Panics
    /// Panics if `index >= u32::MAX` (reserved for the None sentinel).
    #[inline]
    pub fn new(index: usize) -> Self {
        assert!(
            index < u32::MAX as usize,
            "link index must be less than u32::MAX"
        );
        Self(index as u32)
    }

    /// Returns the index as a usize.
    #[inline]
    pub fn get(&self) -> usize {
        self.0 as usize
    }
}

/// An optional link index using u32::MAX as the None sentinel.
///
/// Fits in 4 bytes instead of 8 (no Option discriminant), and maps directly
/// onto the -1 sentinel used in the emitted tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct OptionLinkIndex(u32);

impl OptionLinkIndex {
    /// Creates a None value.
    #[inline]
    pub fn none() -> Self {
        Self(u32::MAX)
    }

    /// Creates a Some value from a LinkIndex.
    #[inline]
    pub fn some(index: LinkIndex) -> Self {
        Self(index.0)
    }

    /// Creates from an Option<LinkIndex>.
    #[inline]
    pub fn from_option(index: Option<LinkIndex>) -> Self {
        index.map_or(Self::none(), Self::some)
    }

    /// Converts to an Option<LinkIndex>.
    #[inline]
    pub fn to_option(self) -> Option<LinkIndex> {
        if self.0 == u32::MAX {
            None
        } else {
            Some(LinkIndex(self.0))
        }
    }
}

impl Default for OptionLinkIndex {
    fn default() -> Self {
        Self::none()
    }
}
