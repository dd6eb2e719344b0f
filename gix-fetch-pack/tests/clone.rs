mod support;

use std::{cell::RefCell, rc::Rc};

use bstr::{BString, ByteSlice};
use futures_lite::future::block_on;
use gix_fetch_pack::{clone, Options};
use gix_sync_core::{
    channel::channel, ClientFrame, Kind, ServerFrame, ServiceKind, SidebandChannels,
};
use support::{advertise, collect_frames, oid, scripted_transport, MemoryRepo};

const HEAD: &str = "1111111111111111111111111111111111111111";
const MASTER: &str = "1111111111111111111111111111111111111111";
const DEV: &str = "2222222222222222222222222222222222222222";

/// Queue the post-negotiation channel handoff with the given pack chunks and
/// progress lines already buffered.
fn hand_over_channels(remote: &support::Remote, chunks: &[&[u8]], progress_lines: &[&str]) {
    let (pack_in, pack) = channel();
    for chunk in chunks {
        pack_in.put(chunk.to_vec());
    }
    pack_in.close();
    let (progress_in, progress) = channel();
    for line in progress_lines {
        progress_in.put(BString::from(*line));
    }
    progress_in.close();
    remote
        .outgoing
        .put(ServerFrame::Channels(SidebandChannels { pack, progress }));
}

#[test]
fn clone_unpacks_and_updates_the_requested_refs() {
    let (mut transport, mut remote) = scripted_transport(ServiceKind::UploadPack);
    advertise(
        &remote,
        &[
            &format!("{HEAD} HEAD\0side-band-64k agent=git/2.40.0"),
            &format!("{MASTER} refs/heads/master"),
            &format!("{DEV} refs/heads/dev"),
        ],
    );
    hand_over_channels(&remote, &[b"pack-chunk-1", b"pack-chunk-2"], &["counting objects"]);

    let repo = MemoryRepo::default();
    let seen_refs = Rc::new(RefCell::new(0usize));
    let progress = Rc::new(RefCell::new(Vec::<BString>::new()));
    let options = Options {
        on_refs: Some(Box::new({
            let seen_refs = Rc::clone(&seen_refs);
            move |refs| {
                *seen_refs.borrow_mut() += refs.len();
            }
        })),
        on_progress: Some(Box::new({
            let progress = Rc::clone(&progress);
            move |line| progress.borrow_mut().push(line.to_owned())
        })),
        ..Default::default()
    };

    let (refs, frames) = block_on(async {
        let refs = clone(&mut transport, &repo, options).await.unwrap();
        let frames = collect_frames(&mut remote).await;
        (refs, frames)
    });

    assert_eq!(refs.len(), 3);
    assert_eq!(*seen_refs.borrow(), 3);
    assert_eq!(
        frames,
        [
            ClientFrame::Want(oid(HEAD)),
            ClientFrame::Want(oid(MASTER)),
            ClientFrame::Want(oid(DEV)),
            ClientFrame::Flush,
            ClientFrame::Done,
        ]
    );
    assert_eq!(
        *repo.unpacked.borrow(),
        [b"pack-chunk-1".to_vec(), b"pack-chunk-2".to_vec()]
    );
    assert_eq!(*progress.borrow(), [BString::from("counting objects")]);
    // HEAD is skipped; the branches are written in request order
    assert_eq!(
        *repo.updated.borrow(),
        [
            (BString::from("refs/heads/master"), oid(MASTER)),
            (BString::from("refs/heads/dev"), oid(DEV)),
        ]
    );
}

#[test]
fn progress_is_optional() {
    let (mut transport, remote) = scripted_transport(ServiceKind::UploadPack);
    advertise(&remote, &[&format!("{MASTER} refs/heads/master")]);
    hand_over_channels(&remote, &[b"chunk"], &["ignored"]);

    let repo = MemoryRepo::default();
    let refs = block_on(clone(&mut transport, &repo, Options::default())).unwrap();
    assert_eq!(refs.len(), 1);
    assert_eq!(repo.unpacked.borrow().len(), 1);
}

#[test]
fn disconnection_mid_advertisement_aborts_without_observing_refs() {
    let (mut transport, remote) = scripted_transport(ServiceKind::UploadPack);
    remote.outgoing.put(ServerFrame::Line(BString::from(format!(
        "{MASTER} refs/heads/master"
    ))));
    remote.outgoing.close();

    let repo = MemoryRepo::default();
    let observed = Rc::new(RefCell::new(false));
    let options = Options {
        on_refs: Some(Box::new({
            let observed = Rc::clone(&observed);
            move |_| *observed.borrow_mut() = true
        })),
        ..Default::default()
    };

    let err = block_on(clone(&mut transport, &repo, options)).unwrap_err();
    assert_eq!(err.kind(), Kind::Disconnected);
    assert!(!*observed.borrow(), "no partial ref map may be observed");
    assert!(repo.updated.borrow().is_empty());
}

#[test]
fn a_missing_channel_handoff_is_a_handshake_error() {
    let (mut transport, remote) = scripted_transport(ServiceKind::UploadPack);
    advertise(&remote, &[&format!("{MASTER} refs/heads/master")]);
    // the transport sends a stray line where the channel pair belongs
    remote
        .outgoing
        .put(ServerFrame::Line(BString::from("unexpected")));

    let repo = MemoryRepo::default();
    let err = block_on(clone(&mut transport, &repo, Options::default())).unwrap_err();
    assert_eq!(err.kind(), Kind::Protocol);
}

#[test]
fn peeled_tag_names_are_updated_but_never_wanted() {
    let (mut transport, mut remote) = scripted_transport(ServiceKind::UploadPack);
    advertise(
        &remote,
        &[
            &format!("{MASTER} refs/tags/v1"),
            &format!("{DEV} refs/tags/v1^{{}}"),
        ],
    );
    hand_over_channels(&remote, &[], &[]);

    let repo = MemoryRepo::default();
    let (refs, frames) = block_on(async {
        let refs = clone(&mut transport, &repo, Options::default()).await.unwrap();
        let frames = collect_frames(&mut remote).await;
        (refs, frames)
    });

    assert_eq!(refs.len(), 2);
    assert_eq!(
        frames,
        [
            ClientFrame::Want(oid(MASTER)),
            ClientFrame::Flush,
            ClientFrame::Done,
        ]
    );
    // the peeled entry still reaches ref storage, mirroring the request list
    assert_eq!(repo.updated.borrow().len(), 2);
    assert_eq!(
        repo.updated.borrow()[1].0.as_bstr(),
        b"refs/tags/v1^{}".as_bstr()
    );
}
