//! The clone orchestrator: session, unpack, ref updates.

use bstr::ByteSlice;
use futures_lite::future;
use gix_sync_core::{
    store::{PackTransfer, RefDatabase},
    Connect, RefMap, SidebandChannels,
};

use crate::{session::Session, Options, Result};

/// Clone from a remote: discover its refs, negotiate the want set, decode
/// the incoming pack, and update local refs to what was asked for.
///
/// Progress lines are forwarded to `on_progress` while the pack is decoded;
/// without a consumer they are discarded. Ref updates run in request order,
/// skipping `HEAD` and names the remote did not advertise; the first update
/// failure aborts the operation. Resolves to the remote's advertised ref
/// map.
pub async fn clone<T, R>(transport: &mut T, repo: &R, mut options: Options) -> Result<RefMap>
where
    T: Connect,
    R: RefDatabase + PackTransfer,
{
    let mut session = Session::connect(transport)?;
    let refs = session.discover().await?;
    if let Some(on_refs) = options.on_refs.as_mut() {
        on_refs(&refs);
    }
    let requested = session.negotiate(&refs, &mut options.wants, options.depth)?;
    let SidebandChannels { pack, mut progress } = session.into_channels().await?;

    let on_progress = options.on_progress;
    let forward_progress = async move {
        match on_progress {
            Some(mut on_progress) => {
                while let Some(line) = progress.take().await {
                    on_progress(line.as_bstr());
                }
            }
            // Nobody listens; discard the stream at the source.
            None => drop(progress),
        }
    };
    let (received, ()) = future::zip(repo.unpack(pack), forward_progress).await;
    let received = received?;
    tracing::debug!(objects = received.len(), "pack decoded");

    for name in &requested {
        if name.as_slice() == b"HEAD" {
            continue;
        }
        let Some(target) = refs.get(name.as_bstr()) else {
            continue;
        };
        repo.update_ref(name.as_bstr(), target).await?;
    }
    Ok(refs)
}
