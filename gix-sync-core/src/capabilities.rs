//! Peer-advertised protocol capabilities.

use std::collections::BTreeMap;

use bstr::{BStr, BString, ByteSlice};

/// The value carried by a single advertised capability token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// A bare flag token.
    Enabled,
    /// The value of a `key=value` token.
    Value(BString),
}

/// The set of protocol extensions advertised by the peer.
///
/// Built exactly once per session, from the NUL-delimited suffix of the
/// first ref-advertisement line, and immutable thereafter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    entries: BTreeMap<BString, Capability>,
}

impl CapabilitySet {
    /// Parse the space-separated token list that follows the NUL byte of the
    /// first advertisement line.
    ///
    /// Each token is either `key=value` or a bare flag.
    pub fn from_advertisement(tokens: &BStr) -> Self {
        let mut entries = BTreeMap::new();
        for token in tokens.split_str(" ") {
            if token.is_empty() {
                continue;
            }
            match token.find_byte(b'=') {
                Some(eq) => entries.insert(
                    BString::from(&token[..eq]),
                    Capability::Value(BString::from(&token[eq + 1..])),
                ),
                None => entries.insert(BString::from(token), Capability::Enabled),
            };
        }
        CapabilitySet { entries }
    }

    /// `true` if the named capability was advertised in any form.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name.as_bytes().as_bstr())
    }

    /// The value of a `key=value` capability, if advertised with one.
    pub fn value(&self, name: &str) -> Option<&BStr> {
        match self.entries.get(name.as_bytes().as_bstr()) {
            Some(Capability::Value(value)) => Some(value.as_bstr()),
            _ => None,
        }
    }

    /// Number of advertised capabilities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the peer advertised no capabilities.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&BStr, &Capability)> {
        self.entries.iter().map(|(name, cap)| (name.as_bstr(), cap))
    }
}
