// src/core/protocol/response.rs

//! Response codes and the `Response` type sent back to clients, both as replies
//! and as unsolicited notifications.

use bytes::BytesMut;
use indexmap::IndexMap;
use std::borrow::Cow;
use strum_macros::{EnumIter, IntoStaticStr};

const CRLF: &str = "\r\n";

/// Offset added to a synchronous info code to produce its asynchronous notification code.
pub const ASYNC_CODE_OFFSET: u16 = 300;

/// Every response code the server knows about. The `strum` name is the short
/// name that follows the numeric code on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, EnumIter)]
#[repr(u16)]
pub enum ResponseCode {
    // --- Failures ---
    #[strum(serialize = "syntax error")]
    SyntaxError = 100,
    #[strum(serialize = "unsupported parameter")]
    UnsupportedParameter = 101,
    #[strum(serialize = "invalid value")]
    InvalidValue = 102,
    #[strum(serialize = "unsupported")]
    Unsupported = 103,
    #[strum(serialize = "disk full")]
    DiskFull = 104,
    #[strum(serialize = "no disk")]
    NoDisk = 105,
    #[strum(serialize = "disk error")]
    DiskError = 106,
    #[strum(serialize = "timeline empty")]
    TimelineEmpty = 107,
    #[strum(serialize = "internal error")]
    InternalError = 108,
    #[strum(serialize = "out of range")]
    OutOfRange = 109,
    #[strum(serialize = "no input")]
    NoInput = 110,
    #[strum(serialize = "remote control disabled")]
    RemoteControlDisabled = 111,
    #[strum(serialize = "connection rejected")]
    ConnectionRejected = 120,
    #[strum(serialize = "invalid state")]
    InvalidState = 150,

    // --- Success ---
    #[strum(serialize = "ok")]
    Ok = 200,
    #[strum(serialize = "slot info")]
    SlotInfo = 202,
    #[strum(serialize = "device info")]
    DeviceInfo = 204,
    #[strum(serialize = "clips info")]
    ClipsInfo = 205,
    #[strum(serialize = "transport info")]
    TransportInfo = 208,
    #[strum(serialize = "notify")]
    Notify = 209,
    #[strum(serialize = "remote info")]
    RemoteInfo = 210,
    #[strum(serialize = "deck rebooting")]
    DeckRebooting = 213,
    #[strum(serialize = "clips count")]
    ClipsCount = 214,

    // --- Asynchronous ---
    #[strum(serialize = "connection info")]
    ConnectionInfo = 500,
    #[strum(serialize = "slot info")]
    AsyncSlotInfo = 502,
    #[strum(serialize = "transport info")]
    AsyncTransportInfo = 508,
}

impl ResponseCode {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// A reply or push event: numeric code, short name and an optional ordered field map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub code: u16,
    pub name: Cow<'static, str>,
    pub fields: Option<IndexMap<String, String>>,
}

impl From<ResponseCode> for Response {
    fn from(code: ResponseCode) -> Self {
        Self {
            code: code.code(),
            name: Cow::Borrowed(code.name()),
            fields: None,
        }
    }
}

impl Response {
    /// A response carrying a (possibly empty) field map.
    pub fn with_fields(code: ResponseCode) -> Self {
        Self {
            fields: Some(IndexMap::new()),
            ..Self::from(code)
        }
    }

    /// Appends a field, creating the map if the response was bare.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Turns a synchronous info response into its unsolicited counterpart (208 -> 508).
    pub fn into_async(mut self) -> Self {
        self.code += ASYNC_CODE_OFFSET;
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.as_ref()?.get(key).map(String::as_str)
    }

    /// Serializes the response into `dst` in wire format.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.extend_from_slice(self.code.to_string().as_bytes());
        dst.extend_from_slice(b" ");
        dst.extend_from_slice(self.name.as_bytes());

        if let Some(fields) = &self.fields {
            dst.extend_from_slice(b":");
            dst.extend_from_slice(CRLF.as_bytes());
            for (key, value) in fields {
                dst.extend_from_slice(key.as_bytes());
                dst.extend_from_slice(b": ");
                dst.extend_from_slice(value.as_bytes());
                dst.extend_from_slice(CRLF.as_bytes());
            }
        }

        dst.extend_from_slice(CRLF.as_bytes());
    }

    /// Convenience wrapper around `encode` for logging and tests.
    pub fn to_wire(&self) -> String {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
