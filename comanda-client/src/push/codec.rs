//! Engine.IO v4 / Socket.IO v5 text framing
//!
//! Only what a websocket-only client needs: text packets, the default or a
//! named namespace, events with optional ack ids. Binary attachments are not
//! supported.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("empty frame")]
    Empty,

    #[error("unknown engine packet type {0:?}")]
    UnknownEngineType(char),

    #[error("unknown socket packet type {0:?}")]
    UnknownSocketType(char),

    #[error("binary packets are not supported")]
    Binary,

    #[error("malformed event: {0}")]
    MalformedEvent(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Handshake data sent by the server in the `open` packet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPayload {
    pub sid: String,
    /// Milliseconds between server pings
    pub ping_interval: u64,
    /// Milliseconds the server waits for a pong
    pub ping_timeout: u64,
    #[serde(default)]
    pub upgrades: Vec<String>,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(OpenPayload),
    Close,
    Ping(String),
    Pong(String),
    Message(SocketPacket),
    Upgrade,
    Noop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect {
        namespace: String,
        data: Option<Value>,
    },
    Disconnect {
        namespace: String,
    },
    Event {
        namespace: String,
        ack_id: Option<u64>,
        name: String,
        args: Vec<Value>,
    },
    Ack {
        namespace: String,
        ack_id: u64,
        args: Vec<Value>,
    },
    ConnectError {
        namespace: String,
        data: Option<Value>,
    },
}

pub const DEFAULT_NAMESPACE: &str = "/";

/// Decode one websocket text frame
pub fn decode(frame: &str) -> Result<EnginePacket, CodecError> {
    let mut chars = frame.chars();
    let kind = chars.next().ok_or(CodecError::Empty)?;
    let rest = chars.as_str();
    match kind {
        '0' => Ok(EnginePacket::Open(serde_json::from_str(rest)?)),
        '1' => Ok(EnginePacket::Close),
        '2' => Ok(EnginePacket::Ping(rest.to_string())),
        '3' => Ok(EnginePacket::Pong(rest.to_string())),
        '4' => Ok(EnginePacket::Message(decode_socket(rest)?)),
        '5' => Ok(EnginePacket::Upgrade),
        '6' => Ok(EnginePacket::Noop),
        other => Err(CodecError::UnknownEngineType(other)),
    }
}

fn decode_socket(body: &str) -> Result<SocketPacket, CodecError> {
    let mut chars = body.chars();
    let kind = chars.next().ok_or(CodecError::Empty)?;
    if matches!(kind, '5' | '6') {
        return Err(CodecError::Binary);
    }
    let mut rest = chars.as_str();

    let namespace = if rest.starts_with('/') {
        let end = rest.find(',').unwrap_or(rest.len());
        let ns = rest[..end].to_string();
        rest = rest.get(end + 1..).unwrap_or("");
        ns
    } else {
        DEFAULT_NAMESPACE.to_string()
    };

    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    let ack_id = if digits > 0 {
        rest[..digits].parse::<u64>().ok()
    } else {
        None
    };
    rest = &rest[digits..];

    let data = if rest.trim().is_empty() {
        None
    } else {
        Some(serde_json::from_str::<Value>(rest)?)
    };

    match kind {
        '0' => Ok(SocketPacket::Connect { namespace, data }),
        '1' => Ok(SocketPacket::Disconnect { namespace }),
        '2' => {
            let mut args = match data {
                Some(Value::Array(items)) => items,
                other => {
                    return Err(CodecError::MalformedEvent(format!(
                        "expected array, got {other:?}"
                    )));
                }
            };
            if args.is_empty() {
                return Err(CodecError::MalformedEvent("missing event name".into()));
            }
            let name = match args.remove(0) {
                Value::String(name) => name,
                other => {
                    return Err(CodecError::MalformedEvent(format!(
                        "event name must be a string, got {other}"
                    )));
                }
            };
            Ok(SocketPacket::Event {
                namespace,
                ack_id,
                name,
                args,
            })
        }
        '3' => {
            let ack_id = ack_id.ok_or_else(|| CodecError::MalformedEvent("ack without id".into()))?;
            let args = match data {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            };
            Ok(SocketPacket::Ack {
                namespace,
                ack_id,
                args,
            })
        }
        '4' => Ok(SocketPacket::ConnectError { namespace, data }),
        other => Err(CodecError::UnknownSocketType(other)),
    }
}

fn namespace_prefix(namespace: &str) -> String {
    if namespace == DEFAULT_NAMESPACE || namespace.is_empty() {
        String::new()
    } else {
        format!("{namespace},")
    }
}

pub fn encode_pong(payload: &str) -> String {
    format!("3{payload}")
}

pub fn encode_connect(namespace: &str) -> String {
    format!("40{}", namespace_prefix(namespace))
}

pub fn encode_disconnect(namespace: &str) -> String {
    format!("41{}", namespace_prefix(namespace))
}

/// `42["name",payload]`
pub fn encode_event(namespace: &str, name: &str, payload: &Value) -> Result<String, CodecError> {
    let body = serde_json::to_string(&Value::Array(vec![
        Value::String(name.to_string()),
        payload.clone(),
    ]))?;
    Ok(format!("42{}{body}", namespace_prefix(namespace)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_open() {
        let frame = r#"0{"sid":"lv_VI97HAXpY6yYWAAAC","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;
        match decode(frame).unwrap() {
            EnginePacket::Open(open) => {
                assert_eq!(open.sid, "lv_VI97HAXpY6yYWAAAC");
                assert_eq!(open.ping_interval, 25000);
                assert_eq!(open.max_payload, Some(1_000_000));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn decodes_event_with_payload() {
        let frame = r#"42["producto-servido",{"detalleId":3,"estado":2}]"#;
        let EnginePacket::Message(SocketPacket::Event {
            namespace,
            ack_id,
            name,
            args,
        }) = decode(frame).unwrap()
        else {
            panic!("not an event");
        };
        assert_eq!(namespace, "/");
        assert_eq!(ack_id, None);
        assert_eq!(name, "producto-servido");
        assert_eq!(args, vec![json!({"detalleId": 3, "estado": 2})]);
    }

    #[test]
    fn decodes_namespace_and_ack_id() {
        let frame = r#"42/cocina,17["nuevo-pedido"]"#;
        let EnginePacket::Message(SocketPacket::Event {
            namespace,
            ack_id,
            name,
            args,
        }) = decode(frame).unwrap()
        else {
            panic!("not an event");
        };
        assert_eq!(namespace, "/cocina");
        assert_eq!(ack_id, Some(17));
        assert_eq!(name, "nuevo-pedido");
        assert!(args.is_empty());
    }

    #[test]
    fn decodes_control_packets() {
        assert_eq!(decode("2").unwrap(), EnginePacket::Ping(String::new()));
        assert_eq!(decode("1").unwrap(), EnginePacket::Close);
        assert!(matches!(
            decode(r#"40{"sid":"abc"}"#).unwrap(),
            EnginePacket::Message(SocketPacket::Connect { data: Some(_), .. })
        ));
        assert!(matches!(
            decode(r#"44{"message":"Not authorized"}"#).unwrap(),
            EnginePacket::Message(SocketPacket::ConnectError { .. })
        ));
        assert!(matches!(decode(""), Err(CodecError::Empty)));
        assert!(matches!(decode("9"), Err(CodecError::UnknownEngineType('9'))));
        assert!(matches!(decode("42{}"), Err(CodecError::MalformedEvent(_))));
        assert!(matches!(decode("45-[]"), Err(CodecError::Binary)));
    }

    #[test]
    fn encodes_frames() {
        assert_eq!(encode_connect("/"), "40");
        assert_eq!(encode_connect("/cocina"), "40/cocina,");
        assert_eq!(encode_disconnect("/"), "41");
        assert_eq!(encode_pong(""), "3");
        let frame = encode_event("/", "imprimir-precuenta", &json!({"mesa": "5"})).unwrap();
        assert_eq!(frame, r#"42["imprimir-precuenta",{"mesa":"5"}]"#);
    }
}
