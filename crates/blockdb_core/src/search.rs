//! Search results and the signed index encoding.

/// The result of a key search.
///
/// A search that does not find its key still yields useful information:
/// the index where the key would have to be inserted to keep the store
/// sorted. `SearchResult` carries both cases explicitly; the signed
/// encoding used on the wire and in logs is available through
/// [`SearchResult::encode`] and [`fuzzy_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    /// The key was found at this index.
    ///
    /// When the key occurs more than once, this is the leftmost match.
    Found(u64),

    /// The key was not found; inserting at this index keeps the store
    /// sorted.
    NotFound(u64),
}

impl SearchResult {
    /// Returns the index for either case: the match position when found,
    /// the insertion point when not.
    #[must_use]
    pub fn index(self) -> u64 {
        match self {
            Self::Found(index) | Self::NotFound(index) => index,
        }
    }

    /// Returns `true` if the key was found.
    #[must_use]
    pub fn is_found(self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Encodes the result as a signed index.
    ///
    /// A hit encodes as the index itself. A miss at insertion point `p`
    /// encodes as `-(p + 1)`, which is always negative, so the two cases
    /// never collide. [`SearchResult::decode`] and [`fuzzy_index`]
    /// invert the encoding.
    #[must_use]
    pub fn encode(self) -> i64 {
        match self {
            Self::Found(index) => index as i64,
            Self::NotFound(point) => -(point as i64) - 1,
        }
    }

    /// Decodes a signed index produced by [`SearchResult::encode`].
    #[must_use]
    pub fn decode(code: i64) -> Self {
        if code >= 0 {
            Self::Found(code as u64)
        } else {
            Self::NotFound(fuzzy_index(code))
        }
    }
}

/// Recovers an insertion position from a signed search code.
///
/// Non-negative codes are returned unchanged; negative codes map back
/// to the insertion point they encode. Either way the result is an
/// index at which an insert keeps the store sorted.
#[must_use]
pub fn fuzzy_index(code: i64) -> u64 {
    if code >= 0 {
        code as u64
    } else {
        (-(code + 1)) as u64
    }
}
