//! Ref advertisements and the shared discovery loop.

use bstr::{BStr, BString, ByteSlice};
use gix_hash::ObjectId;

use crate::{capabilities::CapabilitySet, channel::Receiver, protocol::ServerFrame, Error};

/// The refs advertised by the remote at the start of a session.
///
/// Entries keep advertisement order and names are unique: a repeated name
/// overwrites its predecessor. The capability set and the shallow list are
/// attached exactly once, from the first advertisement line.
#[derive(Debug, Clone, Default)]
pub struct RefMap {
    entries: Vec<(BString, ObjectId)>,
    /// Capabilities advertised on the first line.
    pub capabilities: CapabilitySet,
    /// Commits at which the remote has truncated history.
    pub shallow: Vec<ObjectId>,
}

impl RefMap {
    /// Look up a ref by full path.
    pub fn get(&self, name: &BStr) -> Option<ObjectId> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate.as_bstr() == name)
            .map(|(_, target)| *target)
    }

    /// Insert a ref, overwriting a previous entry of the same name.
    pub fn insert(&mut self, name: BString, target: ObjectId) {
        match self.entries.iter_mut().find(|(candidate, _)| *candidate == name) {
            Some(entry) => entry.1 = target,
            None => self.entries.push((name, target)),
        }
    }

    /// Advertised ref names, in advertisement order.
    pub fn names(&self) -> impl Iterator<Item = &BStr> {
        self.entries.iter().map(|(name, _)| name.as_bstr())
    }

    /// Iterate `(name, target)` pairs in advertisement order.
    pub fn iter(&self) -> impl Iterator<Item = (&BStr, ObjectId)> {
        self.entries.iter().map(|(name, target)| (name.as_bstr(), *target))
    }

    /// Number of advertised refs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the remote advertised no refs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read one full ref advertisement from the transport.
///
/// The first line may carry the capability suffix after a NUL byte;
/// `shallow <oid>` lines accumulate on the shallow list; a flush ends
/// discovery. A stream that ends before the flush is a disconnection, and no
/// partial map escapes.
pub async fn read_advertisement(input: &mut Receiver<ServerFrame>) -> Result<RefMap, Error> {
    let mut refs = RefMap::default();
    let mut first_line = true;
    loop {
        match input.take().await {
            None => return Err(Error::Disconnected),
            Some(ServerFrame::Flush) => return Ok(refs),
            Some(ServerFrame::Line(mut line)) => {
                if first_line {
                    first_line = false;
                    if let Some(nul) = line.find_byte(0) {
                        refs.capabilities =
                            CapabilitySet::from_advertisement(line[nul + 1..].as_bstr());
                        line.truncate(nul);
                    }
                }
                if let Some(shallow) = line.strip_prefix(b"shallow ") {
                    let oid = ObjectId::from_hex(shallow)
                        .map_err(|_| classify_invalid(line.as_bstr()))?;
                    refs.shallow.push(oid);
                    continue;
                }
                let (target, name) = parse_ref_line(line.as_bstr())?;
                refs.insert(name, target);
            }
            Some(other) => {
                return Err(Error::Protocol(format!(
                    "unexpected frame during ref discovery: {other:?}"
                )))
            }
        }
    }
}

/// Parse `<40-hex-hash> SP <refname>`.
fn parse_ref_line(line: &BStr) -> Result<(ObjectId, BString), Error> {
    if line.len() < 42 || line[40] != b' ' {
        return Err(classify_invalid(line));
    }
    let Ok(target) = ObjectId::from_hex(&line[..40]) else {
        return Err(classify_invalid(line));
    };
    let name = &line[41..];
    if name.is_empty() {
        return Err(classify_invalid(line));
    }
    Ok((target, name.as_bstr().to_owned()))
}

/// An unparseable line is either the remote reporting an error or garbage.
fn classify_invalid(line: &BStr) -> Error {
    if line.len() >= 3 && line[..3].eq_ignore_ascii_case(b"ERR") {
        Error::Remote {
            message: line.to_owned(),
        }
    } else {
        Error::MalformedLine {
            line: line.to_owned(),
        }
    }
}
