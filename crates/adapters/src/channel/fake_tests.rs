// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_channel_keeps_dispatcher_and_records_calls() {
    let channel = FakeChannel::new("test");
    let dispatcher = Arc::new(FakeActionDispatcher::new("urn:ccnet:local"));

    assert!(channel.initialise(dispatcher));
    channel.clean_up();

    assert_eq!(
        channel.calls(),
        vec![ChannelCall::Initialise, ChannelCall::CleanUp]
    );
    assert_eq!(
        channel.dispatcher().unwrap().server_name(),
        "urn:ccnet:local"
    );
}

#[test]
fn failing_channel_reports_false() {
    let channel = FakeChannel::failing("broken");
    assert!(!channel.initialise(Arc::new(FakeActionDispatcher::default())));
}

#[test]
fn fake_dispatcher_resolves_registered_items() {
    let dispatcher = FakeActionDispatcher::new("urn:ccnet:local");
    dispatcher.add_item("urn:ccnet:local:core", &["start", "stop"]);

    let actions = dispatcher.list("urn:ccnet:local:core").unwrap();
    assert_eq!(actions.len(), 2);

    let response = dispatcher.invoke("urn:ccnet:local:core", "START").unwrap();
    assert_eq!(response.message, "START done");

    assert_eq!(
        dispatcher.invoke("urn:ccnet:local:core", "force"),
        Err(DispatchError::UnknownAction {
            urn: "urn:ccnet:local:core".into(),
            action: "force".into()
        })
    );
    assert_eq!(
        dispatcher.list("urn:ccnet:local:missing"),
        Err(DispatchError::ItemNotFound("urn:ccnet:local:missing".into()))
    );
    assert_eq!(dispatcher.calls().len(), 4);
}
