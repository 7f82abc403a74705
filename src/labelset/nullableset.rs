use crate::base::Position;
use crate::error::ParseError;
use crate::json::Value as Json;

use super::{LabelKind, LabelSet};

/// Wraps a free labelset (usually [`super::LetterSet`]) and additionally
/// admits epsilon. This is the `LAN` ("labels are nullable letters") context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullableSet<Inner: LabelSet> {
    inner: Inner,
}

impl<Inner: LabelSet> NullableSet<Inner> {
    pub fn new(inner: Inner) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &Inner {
        &self.inner
    }
}

impl<Inner: LabelSet> LabelSet for NullableSet<Inner> {
    type Value = Inner::Value;

    fn kind(&self) -> LabelKind {
        self.inner.kind()
    }

    fn has_one(&self) -> bool {
        true
    }

    fn is_free(&self) -> bool {
        self.inner.is_free()
    }

    fn conv(&self, input: &str, pos: &mut Position, strict_alphabet: bool) -> Result<Self::Value, ParseError> {
        self.inner.conv(input, pos, strict_alphabet)
    }

    fn alphabet(&self) -> Vec<Self::Value> {
        self.inner.alphabet()
    }

    fn print(&self, v: &Self::Value) -> String {
        self.inner.print(v)
    }

    fn to_json(&self, v: &Self::Value) -> Json {
        self.inner.to_json(v)
    }

    fn from_json(&self, v: &Json) -> Result<Self::Value, ParseError> {
        self.inner.from_json(v)
    }

    fn transpose(&self, v: &Self::Value) -> Self::Value {
        self.inner.transpose(v)
    }

    fn name(&self) -> String {
        format!("Nullable[{}]", self.inner.name())
    }
}
