// Copyright 2020 Johannes Köster.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use self::BreakendType::*;

/// Orientation and direction class of a breakend as encoded in its ALT
/// notation (VCF 4.3, section 5.4).
#[derive(
    Display,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum BreakendType {
    Unspecified,
    /// Single left break-end, where the adjacency extends to the right of
    /// the enclosing location.
    LeftSingle,
    RightSingle,
    LeftForward,
    RightForward,
    LeftReverse,
    RightReverse,
}

impl BreakendType {
    pub fn is_specified(&self) -> bool {
        *self != Unspecified
    }

    pub fn is_single(&self) -> bool {
        matches!(self, LeftSingle | RightSingle)
    }

    pub fn is_left_end(&self) -> bool {
        matches!(self, LeftSingle | LeftForward | LeftReverse)
    }

    pub fn is_right_end(&self) -> bool {
        !self.is_left_end()
    }

    pub fn is_forward(&self) -> bool {
        matches!(self, LeftForward | RightForward)
    }

    pub fn is_reverse(&self) -> bool {
        !self.is_forward()
    }

    /// Type of the mate breakend, or `Unspecified` when it cannot be
    /// determined (single breakends have no addressable mate).
    pub fn mate_type(&self) -> Self {
        match self {
            LeftForward => RightForward,
            RightForward => LeftForward,
            LeftReverse => RightReverse,
            RightReverse => LeftReverse,
            _ => Unspecified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_facets() {
        for bnd_type in BreakendType::iter() {
            let (single, left_end, forward) = match bnd_type {
                Unspecified => (false, false, false),
                LeftSingle => (true, true, false),
                RightSingle => (true, false, false),
                LeftForward => (false, true, true),
                RightForward => (false, false, true),
                LeftReverse => (false, true, false),
                RightReverse => (false, false, false),
            };
            assert_eq!(bnd_type.is_single(), single);
            assert_eq!(bnd_type.is_left_end(), left_end);
            assert_eq!(bnd_type.is_forward(), forward);
            assert_eq!(bnd_type.is_right_end(), !left_end);
            assert_eq!(bnd_type.is_reverse(), !forward);
            assert_eq!(bnd_type.is_specified(), bnd_type != Unspecified);
        }
    }

    #[test]
    fn test_mate_type_involution() {
        for bnd_type in BreakendType::iter() {
            if !bnd_type.is_single() && bnd_type.is_specified() {
                assert_eq!(bnd_type.mate_type().mate_type(), bnd_type);
            }
        }
    }

    #[test]
    fn test_mate_type_of_singles_is_unspecified() {
        // Singles have a well-defined end orientation but no addressable
        // mate, hence both map to Unspecified.
        assert_eq!(LeftSingle.mate_type(), Unspecified);
        assert_eq!(RightSingle.mate_type(), Unspecified);
        assert_eq!(Unspecified.mate_type(), Unspecified);
    }
}
