// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ccnet_adapters::{DispatchCall, FakeActionDispatcher};

async fn send(path: &Path, request: Request) -> Response {
    let stream = UnixStream::connect(path).await.expect("connect failed");
    let (mut reader, mut writer) = stream.into_split();
    protocol::write_request(&mut writer, &request, DEFAULT_TIMEOUT)
        .await
        .expect("write failed");
    protocol::read_response(&mut reader, DEFAULT_TIMEOUT)
        .await
        .expect("read failed")
}

fn open(dir: &tempfile::TempDir, dispatcher: &FakeActionDispatcher) -> SocketChannel {
    let channel = SocketChannel::new(dir.path().join("ccnet.sock"), Handle::current());
    assert!(channel.initialise(Arc::new(dispatcher.clone())));
    channel
}

#[tokio::test]
async fn answers_ping_and_server_name() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = FakeActionDispatcher::new("urn:ccnet:local");
    let channel = open(&dir, &dispatcher);

    assert_eq!(send(channel.path(), Request::Ping).await, Response::Pong);
    assert_eq!(
        send(channel.path(), Request::ServerName).await,
        Response::ServerName {
            name: "urn:ccnet:local".to_string()
        }
    );

    channel.clean_up();
}

#[tokio::test]
async fn invoke_reaches_the_dispatcher() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = FakeActionDispatcher::new("urn:ccnet:local");
    dispatcher.add_item("urn:ccnet:local:core", &["force"]);
    let channel = open(&dir, &dispatcher);

    let response = send(
        channel.path(),
        Request::Invoke {
            urn: "urn:ccnet:local:core".to_string(),
            action: "force".to_string(),
        },
    )
    .await;

    match response {
        Response::Invoked { response } => assert_eq!(response.message, "force done"),
        other => panic!("unexpected response: {:?}", other),
    }
    assert_eq!(
        dispatcher.calls(),
        vec![DispatchCall::Invoke {
            urn: "urn:ccnet:local:core".to_string(),
            action: "force".to_string(),
        }]
    );
    channel.clean_up();
}

#[tokio::test]
async fn dispatch_errors_become_error_responses() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = FakeActionDispatcher::new("urn:ccnet:local");
    let channel = open(&dir, &dispatcher);

    let response = send(
        channel.path(),
        Request::List {
            urn: "urn:ccnet:local:missing".to_string(),
        },
    )
    .await;

    assert_eq!(
        response,
        Response::Error {
            message: "Unable to find item with name 'urn:ccnet:local:missing'".to_string()
        }
    );
    channel.clean_up();
}

#[tokio::test]
async fn clean_up_removes_the_socket() {
    let dir = tempfile::tempdir().unwrap();
    let channel = open(&dir, &FakeActionDispatcher::new("urn:ccnet:local"));
    assert!(channel.path().exists());

    channel.clean_up();

    assert!(!channel.path().exists());
}

#[tokio::test]
async fn replaces_a_stale_socket_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ccnet.sock"), "stale").unwrap();

    let channel = open(&dir, &FakeActionDispatcher::new("urn:ccnet:local"));

    assert_eq!(send(channel.path(), Request::Ping).await, Response::Pong);
    channel.clean_up();
}

#[tokio::test]
async fn unbindable_path_fails_to_initialise() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "").unwrap();
    let channel = SocketChannel::new(blocker.join("ccnet.sock"), Handle::current());

    assert!(!channel.initialise(Arc::new(FakeActionDispatcher::new("x"))));
}

#[tokio::test]
async fn factory_uses_default_path_when_none_given() {
    let dir = tempfile::tempdir().unwrap();
    let factory = SocketChannelFactory::new(dir.path().join("default.sock"), Handle::current());

    let channel = factory.create(&ChannelDef::Socket { path: None }).unwrap();
    assert_eq!(channel.name(), "socket");
    assert!(channel.initialise(Arc::new(FakeActionDispatcher::new("x"))));
    assert!(dir.path().join("default.sock").exists());
    channel.clean_up();
}
