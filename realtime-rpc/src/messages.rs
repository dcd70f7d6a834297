//! Request/Response types

use crate::error::Result;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A message to fan out to every subscriber of `topics` on one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishMessage {
    pub account_id: String,
    pub payload: Vec<u8>,
    pub topics: Vec<String>,
}

impl PublishMessage {
    pub fn new(account_id: impl Into<String>, topics: Vec<String>, payload: Vec<u8>) -> Self {
        Self {
            account_id: account_id.into(),
            payload,
            topics,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResponse {
    pub accepted: bool,
    pub message: String,
}

impl PublishResponse {
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            message: String::new(),
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            message: reason.into(),
        }
    }
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Bytes> {
    Ok(Bytes::from(bincode::serialize(value)?))
}

pub(crate) fn decode<T: DeserializeOwned>(frame: &[u8]) -> Result<T> {
    Ok(bincode::deserialize(frame)?)
}
