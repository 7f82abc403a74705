//! Context: a labelset paired with a weightset (§4.1), the static type
//! parameter every automaton, expression, and algorithm is generic over.

use crate::labelset::{LabelKind, LabelSet};
use crate::weightset::WeightSet;

/// `Context<L, W>` fixes the label domain and the weight semiring an
/// automaton or expression is defined over. Kind flags mirror the
/// `is_la*` predicates of the original C++ engine and are computed from
/// `L::kind()`/`L::has_one()`/`L::is_free()` rather than stored redundantly.
#[derive(Debug, Clone)]
pub struct Context<L: LabelSet, W: WeightSet> {
    labelset: L,
    weightset: W,
}

impl<L: LabelSet, W: WeightSet> Context<L, W> {
    pub fn new(labelset: L, weightset: W) -> Self {
        Self { labelset, weightset }
    }

    pub fn labelset(&self) -> &L {
        &self.labelset
    }

    pub fn weightset(&self) -> &W {
        &self.weightset
    }

    pub fn has_one(&self) -> bool {
        self.labelset.has_one()
    }

    pub fn is_free(&self) -> bool {
        self.labelset.is_free()
    }

    /// Labels are letters (no epsilon): the classic unweighted-style alphabet.
    pub fn is_lal(&self) -> bool {
        matches!(self.labelset.kind(), LabelKind::Letters) && !self.labelset.has_one()
    }

    /// Labels are nullable letters: letters plus epsilon.
    pub fn is_lan(&self) -> bool {
        matches!(self.labelset.kind(), LabelKind::Letters) && self.labelset.has_one()
    }

    /// Labels are one: the only label is epsilon.
    pub fn is_lao(&self) -> bool {
        matches!(self.labelset.kind(), LabelKind::NoLabel)
    }

    /// Labels are ratexps: the labelset is itself an expression semiring.
    pub fn is_lar(&self) -> bool {
        matches!(self.labelset.kind(), LabelKind::Expressions)
    }

    /// Labels are tuples: a transducer context.
    pub fn is_lat(&self) -> bool {
        matches!(self.labelset.kind(), LabelKind::MultiTape)
    }

    /// Labels are words.
    pub fn is_law(&self) -> bool {
        matches!(self.labelset.kind(), LabelKind::Words)
    }

    pub fn name(&self) -> String {
        format!("{{{}, {}}}", self.labelset.name(), self.weightset.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labelset::{LetterSet, NullableSet, OneSet};
    use crate::weightset::{B, Z};

    #[test]
    fn kind_flags() {
        let lal = Context::new(LetterSet::new(['a', 'b']), Z);
        assert!(lal.is_lal());
        assert!(!lal.is_lan());

        let lan = Context::new(NullableSet::new(LetterSet::new(['a', 'b'])), B);
        assert!(lan.is_lan());
        assert!(!lan.is_lal());

        let lao = Context::new(OneSet, Z);
        assert!(lao.is_lao());
    }
}
