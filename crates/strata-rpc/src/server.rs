// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server side of the RPC bridge: dispatches wire requests to a real
//! [`Provider`] implementation.
//!
//! A plugin executable calls [`serve`] from its `main`; the host's
//! loader talks to it over the subprocess's stdin/stdout. Stdout is
//! reserved for the protocol, which is why plugins log to stderr.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use strata_core::{Provider, StrataError, Tag};

use crate::codec::{decode_properties, encode_properties};
use crate::wire::{
    Call, EmptyResponse, FromUrlResponse, GetCommitResponse, GetParametersResponse, Hello,
    ListCommitsResponse, Request, Response, ToUrlResponse, TypeResponse, WireCommit,
    WireCommitOutcome, WireError,
};

/// Serve `provider` over the process's stdin/stdout until stdin closes.
///
/// This is the whole body of a plugin executable; the host spawns the
/// binary and drives it through the loader.
pub async fn serve(provider: Arc<dyn Provider>) -> Result<(), StrataError> {
    serve_connection(provider, tokio::io::stdin(), tokio::io::stdout()).await
}

/// Serve `provider` over an arbitrary channel.
///
/// Split out from [`serve`] so the identical protocol can run over an
/// in-memory duplex in tests.
pub async fn serve_connection<R, W>(
    provider: Arc<dyn Provider>,
    reader: R,
    mut writer: W,
) -> Result<(), StrataError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let transport = |e: std::io::Error| StrataError::Transport(e.to_string());

    let mut hello = serde_json::to_string(&Hello::current())
        .map_err(|e| StrataError::Transport(e.to_string()))?;
    hello.push('\n');
    writer.write_all(hello.as_bytes()).await.map_err(transport)?;
    writer.flush().await.map_err(transport)?;

    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    loop {
        line.clear();
        let read = reader.read_line(&mut line).await.map_err(transport)?;
        if read == 0 {
            debug!("channel closed, shutting down");
            return Ok(());
        }
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(trimmed) {
            Ok(request) => request,
            Err(e) => {
                // Without an envelope there is no id to answer under.
                warn!(error = %e, "dropping malformed request line");
                continue;
            }
        };

        let response = match dispatch(provider.as_ref(), request.call).await {
            Ok(result) => Response {
                id: request.id,
                result: Some(result),
                error: None,
            },
            Err(error) => Response {
                id: request.id,
                result: None,
                error: Some(WireError {
                    kind: error.wire_kind().to_string(),
                    message: error.to_string(),
                }),
            },
        };

        let mut out = serde_json::to_string(&response)
            .map_err(|e| StrataError::Transport(e.to_string()))?;
        out.push('\n');
        writer.write_all(out.as_bytes()).await.map_err(transport)?;
        writer.flush().await.map_err(transport)?;
    }
}

fn to_result<T: Serialize>(payload: T) -> Result<Value, StrataError> {
    serde_json::to_value(payload).map_err(|e| StrataError::Encode(e.to_string()))
}

fn commit_to_wire(commit: &strata_core::Commit) -> Result<WireCommit, StrataError> {
    Ok(WireCommit {
        id: commit.id.clone(),
        properties: encode_properties(&commit.properties)?,
    })
}

async fn dispatch(provider: &dyn Provider, call: Call) -> Result<Value, StrataError> {
    match call {
        Call::Type => {
            let provider_type = provider.provider_type().await?;
            to_result(TypeResponse { provider_type })
        }
        Call::FromUrl { url, properties } => {
            let remote = provider.from_url(&url, &properties).await?;
            to_result(FromUrlResponse {
                remote: encode_properties(&remote)?,
            })
        }
        Call::ToUrl { remote } => {
            let remote = decode_properties(&remote)?;
            let (url, properties) = provider.to_url(&remote).await?;
            to_result(ToUrlResponse { url, properties })
        }
        Call::GetParameters { remote } => {
            let remote = decode_properties(&remote)?;
            let parameters = provider.get_parameters(&remote).await?;
            to_result(GetParametersResponse {
                parameters: encode_properties(&parameters)?,
            })
        }
        Call::ValidateRemote { remote } => {
            let remote = decode_properties(&remote)?;
            provider.validate_remote(&remote).await?;
            to_result(EmptyResponse {})
        }
        Call::ValidateParameters { parameters } => {
            let parameters = decode_properties(&parameters)?;
            provider.validate_parameters(&parameters).await?;
            to_result(EmptyResponse {})
        }
        Call::ListCommits {
            remote,
            parameters,
            tags,
        } => {
            let remote = decode_properties(&remote)?;
            let parameters = decode_properties(&parameters)?;
            let tags: Vec<Tag> = tags.into_iter().map(Tag::from).collect();
            let commits = provider.list_commits(&remote, &parameters, &tags).await?;
            to_result(ListCommitsResponse {
                commits: commits
                    .iter()
                    .map(commit_to_wire)
                    .collect::<Result<Vec<_>, _>>()?,
            })
        }
        Call::GetCommit {
            remote,
            parameters,
            commit_id,
        } => {
            let remote = decode_properties(&remote)?;
            let parameters = decode_properties(&parameters)?;
            let commit = provider.get_commit(&remote, &parameters, &commit_id).await?;
            to_result(GetCommitResponse {
                commit: match commit {
                    Some(commit) => WireCommitOutcome::Value(commit_to_wire(&commit)?),
                    None => WireCommitOutcome::Null(true),
                },
            })
        }
    }
}
