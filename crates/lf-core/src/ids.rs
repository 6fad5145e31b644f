use core::fmt;

macro_rules! typed_index {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// Create from a 0-based index.
            pub const fn from_index(index: u32) -> Self {
                Self(index)
            }

            /// Recover the 0-based index.
            pub const fn index(self) -> u32 {
                self.0
            }

            /// The index as a `usize`, for addressing per-site storage.
            pub const fn as_usize(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

typed_index!(
    /// Index of a species (plant functional type) in a site's species table.
    SpeciesId,
    "SpeciesId"
);

typed_index!(
    /// Index of a simulated time period (a month in the usual 12-period year).
    PeriodId,
    "PeriodId"
);

typed_index!(
    /// Index of a discretized light level within a species' light levels.
    LightBin,
    "LightBin"
);

impl PeriodId {
    /// Absolute hour indices covered by this period in an hourly forcing table.
    pub fn hours(self, hours_per_period: usize) -> core::ops::Range<usize> {
        let start = self.as_usize() * hours_per_period;
        start..start + hours_per_period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            assert_eq!(SpeciesId::from_index(i).index(), i);
            assert_eq!(LightBin::from_index(i).as_usize(), i as usize);
        }
    }

    #[test]
    fn debug_names_the_kind() {
        assert_eq!(format!("{:?}", PeriodId::from_index(3)), "PeriodId(3)");
        assert_eq!(format!("{}", LightBin::from_index(7)), "7");
    }

    #[test]
    fn period_hours_are_contiguous() {
        assert_eq!(PeriodId::from_index(0).hours(24), 0..24);
        assert_eq!(PeriodId::from_index(2).hours(24), 48..72);
    }
}
