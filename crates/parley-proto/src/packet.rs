/// Packet wire format.
///
/// ```text
/// [0..4]  Kind tag (u32 BE): 1 = User, 2 = Binding, 3 = Message
/// [4..]   Variant payload
/// ```
///
/// Payload primitives:
/// - integers: big-endian, fixed width (i64)
/// - strings: u32 BE byte length, then UTF-8 bytes
/// - optional strings: one presence byte (0 or 1), then the string if present
///
/// `dump()` owns buffer assembly; a variant only contributes its tag and
/// payload bytes, so every buffer is self-describing by construction.
use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

use parley_types::{Binding, Message, User};

/// Kind identifiers, stable across the wire. Never reuse a retired value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PacketKind {
    User = 1,
    Binding = 2,
    Message = 3,
}

impl PacketKind {
    fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            1 => Some(Self::User),
            2 => Some(Self::Binding),
            3 => Some(Self::Message),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum PacketError {
    #[error("unknown packet kind: {0}")]
    UnknownKind(u32),
    #[error("buffer truncated")]
    Truncated,
    #[error("string field is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("{0} trailing bytes after payload")]
    TrailingBytes(usize),
}

/// A transportable domain object, one variant per entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    User(User),
    Binding(Binding),
    Message(Message),
}

impl Packet {
    pub fn kind(&self) -> PacketKind {
        match self {
            Self::User(_) => PacketKind::User,
            Self::Binding(_) => PacketKind::Binding,
            Self::Message(_) => PacketKind::Message,
        }
    }

    /// Serialize to the wire form: kind tag followed by the variant payload.
    /// Infallible; each call is independent of any prior state.
    pub fn dump(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(64);
        buf.put_u32(self.kind() as u32);
        self.encode_payload(&mut buf);
        buf.freeze()
    }

    /// Inverse of [`dump`](Self::dump): read the tag, dispatch to the
    /// matching decoder. The whole buffer must be consumed.
    pub fn parse(data: &[u8]) -> Result<Self, PacketError> {
        let mut cur = data;
        if cur.remaining() < 4 {
            return Err(PacketError::Truncated);
        }
        let tag = cur.get_u32();
        let kind = PacketKind::from_tag(tag).ok_or(PacketError::UnknownKind(tag))?;

        let packet = match kind {
            PacketKind::User => Self::User(User {
                id: take_i64(&mut cur)?,
                username: take_str(&mut cur)?,
                bio: take_opt_str(&mut cur)?,
                email: take_str(&mut cur)?,
                pass: take_str(&mut cur)?,
                hashkey: take_str(&mut cur)?,
            }),
            PacketKind::Binding => Self::Binding(Binding {
                ida: take_i64(&mut cur)?,
                idb: take_i64(&mut cur)?,
            }),
            PacketKind::Message => Self::Message(Message {
                ida: take_i64(&mut cur)?,
                idb: take_i64(&mut cur)?,
                text: take_str(&mut cur)?,
                sender: take_i64(&mut cur)?,
                sent_at: take_i64(&mut cur)?,
            }),
        };

        if cur.has_remaining() {
            return Err(PacketError::TrailingBytes(cur.remaining()));
        }
        Ok(packet)
    }

    fn encode_payload(&self, buf: &mut BytesMut) {
        match self {
            Self::User(u) => {
                buf.put_i64(u.id);
                put_str(buf, &u.username);
                put_opt_str(buf, u.bio.as_deref());
                put_str(buf, &u.email);
                put_str(buf, &u.pass);
                put_str(buf, &u.hashkey);
            }
            Self::Binding(b) => {
                buf.put_i64(b.ida);
                buf.put_i64(b.idb);
            }
            Self::Message(m) => {
                buf.put_i64(m.ida);
                buf.put_i64(m.idb);
                put_str(buf, &m.text);
                buf.put_i64(m.sender);
                buf.put_i64(m.sent_at);
            }
        }
    }
}

fn put_str(buf: &mut BytesMut, s: &str) {
    buf.put_u32(s.len() as u32);
    buf.put_slice(s.as_bytes());
}

fn put_opt_str(buf: &mut BytesMut, s: Option<&str>) {
    match s {
        Some(s) => {
            buf.put_u8(1);
            put_str(buf, s);
        }
        None => buf.put_u8(0),
    }
}

fn take_i64(cur: &mut &[u8]) -> Result<i64, PacketError> {
    if cur.remaining() < 8 {
        return Err(PacketError::Truncated);
    }
    Ok(cur.get_i64())
}

fn take_str(cur: &mut &[u8]) -> Result<String, PacketError> {
    if cur.remaining() < 4 {
        return Err(PacketError::Truncated);
    }
    let len = cur.get_u32() as usize;
    if cur.remaining() < len {
        return Err(PacketError::Truncated);
    }
    let bytes = cur[..len].to_vec();
    cur.advance(len);
    Ok(String::from_utf8(bytes)?)
}

fn take_opt_str(cur: &mut &[u8]) -> Result<Option<String>, PacketError> {
    if cur.remaining() < 1 {
        return Err(PacketError::Truncated);
    }
    match cur.get_u8() {
        0 => Ok(None),
        _ => Ok(Some(take_str(cur)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 7,
            username: "alice".into(),
            bio: Some("climber".into()),
            email: "a@x.com".into(),
            pass: "$argon2id$stub".into(),
            hashkey: "k1".into(),
        }
    }

    #[test]
    fn user_round_trip() {
        let packet = Packet::User(sample_user());
        let bytes = packet.dump();
        assert_eq!(Packet::parse(&bytes).unwrap(), packet);
    }

    #[test]
    fn user_without_bio_round_trip() {
        let mut user = sample_user();
        user.bio = None;
        let packet = Packet::User(user);
        let bytes = packet.dump();
        assert_eq!(Packet::parse(&bytes).unwrap(), packet);
    }

    #[test]
    fn binding_round_trip() {
        let packet = Packet::Binding(Binding { ida: 1, idb: 2 });
        let bytes = packet.dump();
        assert_eq!(Packet::parse(&bytes).unwrap(), packet);
    }

    #[test]
    fn message_round_trip() {
        let packet = Packet::Message(Message {
            ida: 1,
            idb: 2,
            text: "hi there".into(),
            sender: 1,
            sent_at: 1000,
        });
        let bytes = packet.dump();
        assert_eq!(Packet::parse(&bytes).unwrap(), packet);
    }

    #[test]
    fn kind_tag_leads_the_buffer() {
        let bytes = Packet::Binding(Binding { ida: 1, idb: 2 }).dump();
        assert_eq!(&bytes[0..4], &2u32.to_be_bytes());
        // 4-byte tag + two i64 fields, nothing else
        assert_eq!(bytes.len(), 4 + 16);
    }

    #[test]
    fn unknown_kind_rejected() {
        let mut buf = 99u32.to_be_bytes().to_vec();
        buf.extend_from_slice(&[0u8; 16]);
        assert!(matches!(
            Packet::parse(&buf),
            Err(PacketError::UnknownKind(99))
        ));
    }

    #[test]
    fn truncated_buffer_rejected() {
        let bytes = Packet::User(sample_user()).dump();
        for cut in [0, 3, 4, 11, bytes.len() - 1] {
            assert!(matches!(
                Packet::parse(&bytes[..cut]),
                Err(PacketError::Truncated)
            ));
        }
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut buf = Packet::Binding(Binding { ida: 1, idb: 2 }).dump().to_vec();
        buf.push(0xFF);
        assert!(matches!(
            Packet::parse(&buf),
            Err(PacketError::TrailingBytes(1))
        ));
    }

    #[test]
    fn invalid_utf8_rejected() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&3u32.to_be_bytes()); // Message
        buf.extend_from_slice(&1i64.to_be_bytes());
        buf.extend_from_slice(&2i64.to_be_bytes());
        buf.extend_from_slice(&2u32.to_be_bytes());
        buf.extend_from_slice(&[0xC3, 0x28]); // bad continuation byte
        buf.extend_from_slice(&1i64.to_be_bytes());
        buf.extend_from_slice(&1000i64.to_be_bytes());
        assert!(matches!(Packet::parse(&buf), Err(PacketError::Utf8(_))));
    }
}
