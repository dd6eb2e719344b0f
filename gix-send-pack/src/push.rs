//! The push orchestrator: handshake, diff, command, pack stream.

use bstr::{BString, ByteSlice};
use gix_sync_core::{
    store::{ObjectDatabase, PackTransfer, RefDatabase},
    Command, Connect, Kind, RefMap,
};

use crate::{diff, session::Session, Error, Result};

/// The branch used when none is configured, for both sides.
const DEFAULT_BRANCH: &str = "master";

/// Options controlling a push.
#[derive(Default)]
pub struct Options {
    /// Local branch to push; defaults to `master`.
    pub source_branch: Option<BString>,
    /// Remote branch to update; defaults to `master`.
    pub target_branch: Option<BString>,
    /// Observer invoked with the advertised refs before negotiation; it
    /// cannot alter control flow.
    pub on_refs: Option<Box<dyn FnMut(&RefMap)>>,
}

fn branch_ref(branch: Option<&BString>) -> BString {
    let mut name = BString::from("refs/heads/");
    match branch {
        Some(branch) => name.extend_from_slice(branch),
        None => name.extend_from_slice(DEFAULT_BRANCH.as_bytes()),
    }
    name
}

/// Push one branch: discover the remote's refs, compute the object set it is
/// missing, send the update command, and stream the encoded pack.
///
/// A push that would transmit nothing fails with
/// [`Error::NothingToUpdate`] rather than being silently accepted; the
/// remote's response is drained and logged, not interpreted.
pub async fn push<T, R>(transport: &mut T, repo: &R, mut options: Options) -> Result<()>
where
    T: Connect,
    R: ObjectDatabase + RefDatabase + PackTransfer,
{
    let mut session = Session::handshake(transport).await?;
    if let Some(on_refs) = options.on_refs.as_mut() {
        on_refs(session.refs());
    }

    let source_ref = branch_ref(options.source_branch.as_ref());
    let target_ref = branch_ref(options.target_branch.as_ref());
    let Some(remote_tip) = session.refs().get(target_ref.as_bstr()) else {
        return Err(Error::RemoteBranchNotFound { name: target_ref });
    };
    let local_tip = match repo.read_ref(source_ref.as_bstr()).await {
        Ok(target) => target,
        Err(err) if err.kind() == Kind::NotFound => {
            return Err(Error::SourceBranchNotFound { name: source_ref })
        }
        Err(err) => return Err(err.into()),
    };

    let objects = diff::objects_to_send(repo, local_tip, remote_tip).await?;
    if objects.is_empty() {
        return Err(Error::NothingToUpdate);
    }
    tracing::debug!(objects = objects.len(), target = %target_ref, "streaming pack");

    session.send_command(&Command::Update {
        name: target_ref,
        old: remote_tip,
        new: local_tip,
    });
    session.begin_pack();
    let items = repo.pack(objects).await?;
    session.stream_pack(items).await;
    session.finish().await;
    Ok(())
}
