use std::fmt;

/// Unique identifier for any entity tracked by the model layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(pub u64);

impl Id {
    /// Reserved identifier meaning "no entity" (unset room, no reply target).
    pub const NONE: Self = Self(u64::MAX);

    /// Returns true if this id refers to no entity.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
