use core::fmt;
use core::num::NonZeroU32;

/// Identifier of an element in the network arena.
///
/// - `u32` keeps memory small
/// - `NonZero` lets `Option<ElementId>` (the source back-reference) stay the same size
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(NonZeroU32);

impl ElementId {
    /// Create an id from a 0-based arena index by storing index+1.
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// Recover the 0-based arena index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Arena slot as a `usize`.
    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.index())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            let id = ElementId::from_index(i);
            assert_eq!(id.index(), i);
            assert_eq!(id.slot(), i as usize);
        }
    }

    #[test]
    fn optional_source_is_small() {
        assert_eq!(
            core::mem::size_of::<ElementId>(),
            core::mem::size_of::<Option<ElementId>>()
        );
    }

    #[test]
    fn display_uses_hash_prefix() {
        assert_eq!(ElementId::from_index(7).to_string(), "#7");
    }
}
