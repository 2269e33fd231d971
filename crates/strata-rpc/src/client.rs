// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client side of the RPC bridge: a [`Provider`] implementation that
//! forwards every operation over a channel to a plugin subprocess.
//!
//! Calls are serialized: one mutex guards the channel, so concurrent
//! callers of a single loaded provider take turns. Each call blocks
//! until its response line arrives or the channel fails; there is no
//! built-in timeout. After a transport failure the same error repeats
//! on every call until the caller unloads and reloads the plugin.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::debug;

use strata_core::{Commit, PropertyMap, Provider, StrataError, Tag};

use crate::codec::{decode_properties, encode_properties};
use crate::wire::{
    Call, EmptyResponse, FromUrlResponse, GetCommitResponse, GetParametersResponse, Hello,
    ListCommitsResponse, Request, Response, ToUrlResponse, TypeResponse, WireCommit,
    WireCommitOutcome, WireTag, HANDSHAKE_TOKEN, PROTOCOL_VERSION,
};

type BoxedReader = BufReader<Box<dyn AsyncRead + Send + Unpin>>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

struct Channel {
    reader: BoxedReader,
    writer: BoxedWriter,
    next_id: u64,
}

/// The remote-backed provider variant: adapts an RPC channel to the
/// [`Provider`] contract so callers cannot tell it from an in-process
/// implementation.
pub struct RpcProvider {
    /// Label used in handshake/transport errors; the provider type the
    /// channel was opened for.
    endpoint: String,
    channel: Mutex<Channel>,
}

impl RpcProvider {
    /// Validate the plugin's handshake line and wrap the channel.
    ///
    /// The server must send one [`Hello`] line before anything else;
    /// a missing, malformed, or mismatching handshake fails with
    /// [`StrataError::Handshake`] and no RPC call is ever attempted.
    pub async fn connect<R, W>(endpoint: &str, reader: R, writer: W) -> Result<Self, StrataError>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let boxed: Box<dyn AsyncRead + Send + Unpin> = Box::new(reader);
        let mut reader = BufReader::new(boxed);

        let handshake = |message: String| StrataError::Handshake {
            plugin: endpoint.to_string(),
            message,
        };

        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| handshake(format!("failed to read handshake: {e}")))?;
        if read == 0 {
            return Err(handshake("channel closed before handshake".to_string()));
        }

        let hello: Hello = serde_json::from_str(line.trim_end())
            .map_err(|e| handshake(format!("malformed handshake: {e}")))?;
        if hello.protocol_version != PROTOCOL_VERSION {
            return Err(handshake(format!(
                "protocol version mismatch: plugin speaks {}, host speaks {}",
                hello.protocol_version, PROTOCOL_VERSION
            )));
        }
        if hello.token != HANDSHAKE_TOKEN {
            return Err(handshake("handshake token mismatch".to_string()));
        }

        debug!(endpoint, "plugin handshake accepted");
        Ok(RpcProvider {
            endpoint: endpoint.to_string(),
            channel: Mutex::new(Channel {
                reader,
                writer: Box::new(writer),
                next_id: 1,
            }),
        })
    }

    fn transport(&self, message: impl std::fmt::Display) -> StrataError {
        StrataError::Transport(format!("{}: {message}", self.endpoint))
    }

    /// Send one request and wait for its response line.
    async fn call<T: DeserializeOwned>(&self, call: Call) -> Result<T, StrataError> {
        let mut channel = self.channel.lock().await;
        let id = channel.next_id;
        channel.next_id += 1;

        let mut line = serde_json::to_string(&Request { id, call })
            .map_err(|e| self.transport(format!("failed to serialize request: {e}")))?;
        line.push('\n');
        channel
            .writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| self.transport(e))?;
        channel
            .writer
            .flush()
            .await
            .map_err(|e| self.transport(e))?;

        let mut response_line = String::new();
        let read = channel
            .reader
            .read_line(&mut response_line)
            .await
            .map_err(|e| self.transport(e))?;
        if read == 0 {
            return Err(self.transport("channel closed mid-call"));
        }

        let response: Response = serde_json::from_str(response_line.trim_end())
            .map_err(|e| self.transport(format!("malformed response: {e}")))?;
        if response.id != id {
            return Err(self.transport(format!(
                "response id {} does not match request id {id}",
                response.id
            )));
        }
        if let Some(error) = response.error {
            return Err(StrataError::from_wire(&error.kind, error.message));
        }
        let result = response
            .result
            .ok_or_else(|| self.transport("response carries neither result nor error"))?;
        serde_json::from_value(result)
            .map_err(|e| self.transport(format!("malformed response payload: {e}")))
    }
}

fn commit_from_wire(commit: WireCommit) -> Result<Commit, StrataError> {
    Ok(Commit {
        id: commit.id,
        properties: decode_properties(&commit.properties)?,
    })
}

#[async_trait]
impl Provider for RpcProvider {
    async fn provider_type(&self) -> Result<String, StrataError> {
        let res: TypeResponse = self.call(Call::Type).await?;
        Ok(res.provider_type)
    }

    async fn from_url(
        &self,
        url: &str,
        additional_properties: &HashMap<String, String>,
    ) -> Result<PropertyMap, StrataError> {
        let res: FromUrlResponse = self
            .call(Call::FromUrl {
                url: url.to_string(),
                properties: additional_properties.clone(),
            })
            .await?;
        decode_properties(&res.remote)
    }

    async fn to_url(
        &self,
        remote: &PropertyMap,
    ) -> Result<(String, HashMap<String, String>), StrataError> {
        let res: ToUrlResponse = self
            .call(Call::ToUrl {
                remote: encode_properties(remote)?,
            })
            .await?;
        Ok((res.url, res.properties))
    }

    async fn get_parameters(&self, remote: &PropertyMap) -> Result<PropertyMap, StrataError> {
        let res: GetParametersResponse = self
            .call(Call::GetParameters {
                remote: encode_properties(remote)?,
            })
            .await?;
        decode_properties(&res.parameters)
    }

    async fn validate_remote(&self, remote: &PropertyMap) -> Result<(), StrataError> {
        let _: EmptyResponse = self
            .call(Call::ValidateRemote {
                remote: encode_properties(remote)?,
            })
            .await?;
        Ok(())
    }

    async fn validate_parameters(&self, parameters: &PropertyMap) -> Result<(), StrataError> {
        let _: EmptyResponse = self
            .call(Call::ValidateParameters {
                parameters: encode_properties(parameters)?,
            })
            .await?;
        Ok(())
    }

    async fn list_commits(
        &self,
        remote: &PropertyMap,
        parameters: &PropertyMap,
        tags: &[Tag],
    ) -> Result<Vec<Commit>, StrataError> {
        let res: ListCommitsResponse = self
            .call(Call::ListCommits {
                remote: encode_properties(remote)?,
                parameters: encode_properties(parameters)?,
                tags: tags.iter().map(WireTag::from).collect(),
            })
            .await?;
        res.commits.into_iter().map(commit_from_wire).collect()
    }

    async fn get_commit(
        &self,
        remote: &PropertyMap,
        parameters: &PropertyMap,
        commit_id: &str,
    ) -> Result<Option<Commit>, StrataError> {
        let res: GetCommitResponse = self
            .call(Call::GetCommit {
                remote: encode_properties(remote)?,
                parameters: encode_properties(parameters)?,
                commit_id: commit_id.to_string(),
            })
            .await?;
        match res.commit {
            WireCommitOutcome::Value(commit) => Ok(Some(commit_from_wire(commit)?)),
            WireCommitOutcome::Null(_) => Ok(None),
        }
    }
}
