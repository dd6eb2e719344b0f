//! The object-set differ: computes the minimal set of objects a push must
//! transmit to bring the remote's tip up to the local one.

use std::{collections::HashSet, future::Future, pin::Pin};

use bstr::ByteSlice;
use gix_hash::ObjectId;
use gix_sync_core::{store::ObjectDatabase, Error};

/// Compute the ordered, duplicate-free set of object hashes the remote is
/// missing: commits reachable from `local_tip` but not from `remote_tip`,
/// with the tree and blob objects those commits add over their parents.
///
/// Output order is insertion order: each commit, then its changed tree
/// objects, recursively. The remote tip is assumed fully known to the peer
/// and is never walked. Any object-store failure aborts the computation.
pub async fn objects_to_send<D>(
    db: &D,
    local_tip: ObjectId,
    remote_tip: ObjectId,
) -> Result<Vec<ObjectId>, Error>
where
    D: ObjectDatabase,
{
    let mut diff = ObjectSetDiff::new(db, remote_tip);
    diff.walk_commit(local_tip).await?;
    Ok(diff.objects)
}

/// State of one differ invocation.
///
/// `seen` guards the commit walk; `recorded` backs the exactly-once output
/// guarantee. Both are genuine set-membership tests.
struct ObjectSetDiff<'repo, D> {
    db: &'repo D,
    seen: HashSet<ObjectId>,
    recorded: HashSet<ObjectId>,
    objects: Vec<ObjectId>,
}

impl<'repo, D> ObjectSetDiff<'repo, D>
where
    D: ObjectDatabase,
{
    fn new(db: &'repo D, remote_tip: ObjectId) -> Self {
        let mut seen = HashSet::new();
        seen.insert(remote_tip);
        ObjectSetDiff {
            db,
            seen,
            recorded: HashSet::new(),
            objects: Vec::new(),
        }
    }

    fn record(&mut self, oid: ObjectId) {
        if self.recorded.insert(oid) {
            self.objects.push(oid);
        }
    }

    /// Visit a commit and everything it adds over its parents.
    ///
    /// A root commit contributes only itself: with no parent there is
    /// nothing to diff its tree against.
    fn walk_commit<'a>(
        &'a mut self,
        oid: ObjectId,
    ) -> Pin<Box<dyn Future<Output = Result<(), Error>> + 'a>> {
        Box::pin(async move {
            if !self.seen.insert(oid) {
                return Ok(());
            }
            self.record(oid);
            let commit = self.db.load_commit(&oid).await?;
            for parent in commit.parents.iter().copied() {
                let parent_commit = self.db.load_commit(&parent).await?;
                self.diff_trees(commit.tree, parent_commit.tree).await?;
                self.walk_commit(parent).await?;
            }
            Ok(())
        })
    }

    /// Diff a source tree against the same-path target tree, recording what
    /// the target side is missing.
    fn diff_trees<'a>(
        &'a mut self,
        src: ObjectId,
        target: ObjectId,
    ) -> Pin<Box<dyn Future<Output = Result<(), Error>> + 'a>> {
        Box::pin(async move {
            self.record(src);
            let src_tree = self.db.load_tree(&src).await?;
            let target_tree = self.db.load_tree(&target).await?;
            for entry in &src_tree.entries {
                let counterpart = target_tree.entry(entry.name.as_bstr());
                if counterpart.is_some_and(|c| c.oid == entry.oid) {
                    continue;
                }
                if entry.is_blob() {
                    self.record(entry.oid);
                } else if entry.is_tree() {
                    match counterpart.filter(|c| c.is_tree()) {
                        // nothing to diff against: everything below is new
                        None => self.add_tree(entry.oid).await?,
                        Some(counterpart) => self.diff_trees(entry.oid, counterpart.oid).await?,
                    }
                }
                // other modes (gitlinks) carry no object to transmit
            }
            Ok(())
        })
    }

    /// Record a whole subtree the target knows nothing about.
    fn add_tree<'a>(
        &'a mut self,
        oid: ObjectId,
    ) -> Pin<Box<dyn Future<Output = Result<(), Error>> + 'a>> {
        Box::pin(async move {
            self.record(oid);
            let tree = self.db.load_tree(&oid).await?;
            for entry in &tree.entries {
                if entry.is_blob() {
                    self.record(entry.oid);
                } else if entry.is_tree() {
                    self.add_tree(entry.oid).await?;
                }
            }
            Ok(())
        })
    }
}
