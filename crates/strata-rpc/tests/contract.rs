// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contract parity: the same assertions run against a direct provider
//! and against the RPC bridge over an in-memory duplex. Callers must
//! not be able to tell the two apart (modulo the documented numeric
//! normalization).

use std::collections::HashMap;
use std::sync::Arc;

use tokio::io::AsyncWriteExt;

use strata_core::{PropertyMap, PropertyValue, Provider, StrataError, Tag};
use strata_rpc::{serve_connection, RpcProvider, HANDSHAKE_TOKEN, PROTOCOL_VERSION};
use strata_test_utils::EchoProvider;

/// Wire an [`RpcProvider`] to an echo provider served over a duplex.
async fn bridged_echo() -> RpcProvider {
    let (host, plugin) = tokio::io::duplex(64 * 1024);
    let (plugin_rx, plugin_tx) = tokio::io::split(plugin);
    tokio::spawn(async move {
        let _ = serve_connection(Arc::new(EchoProvider::sample()), plugin_rx, plugin_tx).await;
    });
    let (host_rx, host_tx) = tokio::io::split(host);
    RpcProvider::connect("echo", host_rx, host_tx)
        .await
        .expect("handshake must succeed")
}

/// The shared contract assertions, run against both variants.
async fn check_contract(provider: &dyn Provider) {
    assert_eq!(provider.provider_type().await.unwrap(), "echo");

    let mut extra = HashMap::new();
    extra.insert("keyFile".to_string(), "/tmp/key".to_string());
    let remote = provider.from_url("echo://host", &extra).await.unwrap();
    assert_eq!(remote.get("url"), Some(&PropertyValue::from("echo://host")));
    assert_eq!(remote.get("keyFile"), Some(&PropertyValue::from("/tmp/key")));

    let (url, _) = provider.to_url(&remote).await.unwrap();
    assert_eq!(url, "echo://echo");

    provider.validate_remote(&remote).await.unwrap();
    let err = provider.validate_remote(&PropertyMap::new()).await.unwrap_err();
    assert!(
        matches!(err, StrataError::Validation(_)),
        "expected Validation, got {err:?}"
    );

    let parameters = PropertyMap::new();
    let all = provider.list_commits(&remote, &parameters, &[]).await.unwrap();
    assert_eq!(all.len(), 4);

    let prod = provider
        .list_commits(&remote, &parameters, &[Tag::matches("env", "prod")])
        .await
        .unwrap();
    let ids: Vec<&str> = prod.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["two", "three"]);

    let found = provider.get_commit(&remote, &parameters, "three").await.unwrap();
    let found = found.expect("commit 'three' exists");
    assert_eq!(found.id, "three");
    let tags = found
        .properties
        .get("tags")
        .and_then(PropertyValue::as_map)
        .expect("commit carries tags");
    assert_eq!(tags.get("release"), Some(&PropertyValue::from("1.0")));

    let absent = provider.get_commit(&remote, &parameters, "missing").await.unwrap();
    assert!(absent.is_none(), "absence is Ok(None), never an error");
}

#[tokio::test]
async fn direct_provider_satisfies_the_contract() {
    let provider = EchoProvider::sample();
    check_contract(&provider).await;
}

#[tokio::test]
async fn bridged_provider_satisfies_the_contract() {
    let provider = bridged_echo().await;
    check_contract(&provider).await;
}

#[tokio::test]
async fn bridge_normalizes_integers_direct_call_does_not() {
    let mut remote = PropertyMap::new();
    remote.insert("port".into(), PropertyValue::Integer(22));

    let direct = EchoProvider::sample();
    let parameters = direct.get_parameters(&remote).await.unwrap();
    assert_eq!(parameters.get("port"), Some(&PropertyValue::Integer(22)));

    let bridged = bridged_echo().await;
    let parameters = bridged.get_parameters(&remote).await.unwrap();
    assert_eq!(parameters.get("port"), Some(&PropertyValue::Float(22.0)));
}

#[tokio::test]
async fn channel_death_surfaces_as_transport_on_every_call() {
    let (host, mut plugin) = tokio::io::duplex(1024);

    // Hand-written handshake, then the "plugin" goes away.
    let hello = format!(
        "{{\"protocol_version\":{PROTOCOL_VERSION},\"token\":\"{HANDSHAKE_TOKEN}\"}}\n"
    );
    plugin.write_all(hello.as_bytes()).await.unwrap();
    drop(plugin);

    let (host_rx, host_tx) = tokio::io::split(host);
    let provider = RpcProvider::connect("echo", host_rx, host_tx).await.unwrap();

    let err = provider.provider_type().await.unwrap_err();
    assert!(matches!(err, StrataError::Transport(_)));

    // The handle is not repaired behind the caller's back.
    let err = provider.provider_type().await.unwrap_err();
    assert!(matches!(err, StrataError::Transport(_)));
}

#[tokio::test]
async fn version_mismatch_fails_the_handshake() {
    let (host, mut plugin) = tokio::io::duplex(1024);
    let hello = format!(
        "{{\"protocol_version\":{},\"token\":\"{HANDSHAKE_TOKEN}\"}}\n",
        PROTOCOL_VERSION + 1
    );
    plugin.write_all(hello.as_bytes()).await.unwrap();

    let (host_rx, host_tx) = tokio::io::split(host);
    let err = RpcProvider::connect("echo", host_rx, host_tx)
        .await
        .err()
        .expect("mismatched version must not connect");
    assert!(matches!(err, StrataError::Handshake { .. }));
}

#[tokio::test]
async fn token_mismatch_fails_the_handshake() {
    let (host, mut plugin) = tokio::io::duplex(1024);
    let hello = format!(
        "{{\"protocol_version\":{PROTOCOL_VERSION},\"token\":\"not-the-token\"}}\n"
    );
    plugin.write_all(hello.as_bytes()).await.unwrap();

    let (host_rx, host_tx) = tokio::io::split(host);
    let err = RpcProvider::connect("echo", host_rx, host_tx)
        .await
        .err()
        .expect("mismatched token must not connect");
    assert!(matches!(err, StrataError::Handshake { .. }));
}
