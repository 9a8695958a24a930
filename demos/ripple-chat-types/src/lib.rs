//! generated by ripplegen from chat.ripple — do not edit

use ripple_core::wire::{Codec as _, PrimitiveWire as _};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Presence {
    OFFLINE = 0,
    ONLINE = 1,
    AWAY = 2,
}

impl ripple_core::hash::TypeHash for Presence {
    const TYPE_SEED: u64 = 0x2e88e3cb0dfe40bd;
    fn hash_recursive(_visiting: &[u64]) -> i64 {
        ripple_core::hash::finalize(Self::TYPE_SEED as i64)
    }
}

impl Presence {
    fn from_i32(value: i32) -> Result<Self, ripple_core::Error> {
        match value {
            0 => Ok(Self::OFFLINE),
            1 => Ok(Self::ONLINE),
            2 => Ok(Self::AWAY),
            other => Err(ripple_core::Error::UnknownEnumValue {
                type_name: "Presence",
                value: other,
            }),
        }
    }
}

impl ripple_core::wire::Codec for Presence {
    fn encode(&self, buf: &mut [u8]) -> Result<usize, ripple_core::Error> {
        let hash = ripple_core::hash::get_hash::<Self>();
        let mut offset = ripple_core::wire::encode_hash_prefix(buf, 0, hash)?;
        offset += self.encode_no_hash(buf, offset)?;
        Ok(offset)
    }

    fn encode_no_hash(&self, buf: &mut [u8], offset: usize) -> Result<usize, ripple_core::Error> {
        (*self as i32).write_be(buf, offset)
    }

    fn decode(buf: &[u8]) -> Result<Self, ripple_core::Error> {
        let expected = ripple_core::hash::get_hash::<Self>();
        let offset = ripple_core::wire::decode_hash_prefix(buf, 0, expected)?;
        let (value, _used) = Self::decode_no_hash(buf, offset)?;
        Ok(value)
    }

    fn decode_no_hash(buf: &[u8], offset: usize) -> Result<(Self, usize), ripple_core::Error> {
        let (raw, used) = i32::read_be(buf, offset)?;
        Ok((Self::from_i32(raw)?, used))
    }

    fn encoded_size_no_hash(&self) -> usize {
        4
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub display_name: String,
    pub presence: Presence,
}

impl ripple_core::hash::TypeHash for Author {
    const TYPE_SEED: u64 = 0x73ad45ee6f36f513;
    fn hash_recursive(visiting: &[u64]) -> i64 {
        if visiting.contains(&Self::TYPE_SEED) {
            return 0;
        }
        let mut next = visiting.to_vec();
        next.push(Self::TYPE_SEED);
        let mut hash = Self::TYPE_SEED as i64;
        hash = hash.wrapping_add(Presence::hash_recursive(&next));
        ripple_core::hash::finalize(hash)
    }
}

impl ripple_core::wire::Codec for Author {
    fn encode(&self, buf: &mut [u8]) -> Result<usize, ripple_core::Error> {
        let hash = ripple_core::hash::get_hash::<Self>();
        let mut offset = ripple_core::wire::encode_hash_prefix(buf, 0, hash)?;
        offset += self.encode_no_hash(buf, offset)?;
        Ok(offset)
    }

    fn encode_no_hash(&self, buf: &mut [u8], offset: usize) -> Result<usize, ripple_core::Error> {
        let start = offset;
        let mut offset = offset;
        offset += ripple_core::wire::encode_string(buf, offset, &self.display_name)?;
        offset += self.presence.encode_no_hash(buf, offset)?;
        Ok(offset - start)
    }

    fn decode(buf: &[u8]) -> Result<Self, ripple_core::Error> {
        let expected = ripple_core::hash::get_hash::<Self>();
        let offset = ripple_core::wire::decode_hash_prefix(buf, 0, expected)?;
        let (value, _used) = Self::decode_no_hash(buf, offset)?;
        Ok(value)
    }

    fn decode_no_hash(buf: &[u8], offset: usize) -> Result<(Self, usize), ripple_core::Error> {
        let start = offset;
        let mut offset = offset;
        let display_name = {
            let (value, used) = ripple_core::wire::decode_string(buf, offset)?;
            offset += used;
            value
        };
        let presence = {
            let (value, used) = Presence::decode_no_hash(buf, offset)?;
            offset += used;
            value
        };
        Ok((
            Self {
                display_name,
                presence,
            },
            offset - start,
        ))
    }

    fn encoded_size_no_hash(&self) -> usize {
        let mut size = 0usize;
        size += 4 + self.display_name.len() + 1;
        size += self.presence.encoded_size_no_hash();
        size
    }
}

pub fn author_publish(
    rt: &ripple_runtime::Runtime,
    channel: &str,
    msg: &Author,
) -> Result<(), ripple_core::Error> {
    ripple_runtime::trampoline::publish_typed(rt, channel, msg)
}

pub fn author_subscribe<F>(
    rt: &ripple_runtime::Runtime,
    pattern: &str,
    handler: F,
) -> Result<ripple_runtime::SubscriptionId, ripple_core::Error>
where
    F: Fn(&Author, &str) + Send + Sync + 'static,
{
    ripple_runtime::trampoline::subscribe_typed(rt, pattern, handler)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub sent_at_unix_ms: i64,
    pub author: Author,
    pub body_len: i32,
    pub body: Vec<u8>,
}

impl ChatMessage {
    pub const MAX_BODY_BYTES: i32 = 4096;
}

impl ripple_core::hash::TypeHash for ChatMessage {
    const TYPE_SEED: u64 = 0xd15eb52dc707902d;
    fn hash_recursive(visiting: &[u64]) -> i64 {
        if visiting.contains(&Self::TYPE_SEED) {
            return 0;
        }
        let mut next = visiting.to_vec();
        next.push(Self::TYPE_SEED);
        let mut hash = Self::TYPE_SEED as i64;
        hash = hash.wrapping_add(Author::hash_recursive(&next));
        ripple_core::hash::finalize(hash)
    }
}

impl ripple_core::wire::Codec for ChatMessage {
    fn encode(&self, buf: &mut [u8]) -> Result<usize, ripple_core::Error> {
        let hash = ripple_core::hash::get_hash::<Self>();
        let mut offset = ripple_core::wire::encode_hash_prefix(buf, 0, hash)?;
        offset += self.encode_no_hash(buf, offset)?;
        Ok(offset)
    }

    fn encode_no_hash(&self, buf: &mut [u8], offset: usize) -> Result<usize, ripple_core::Error> {
        let start = offset;
        let mut offset = offset;
        offset += self.sent_at_unix_ms.write_be(buf, offset)?;
        offset += self.author.encode_no_hash(buf, offset)?;
        offset += self.body_len.write_be(buf, offset)?;
        offset += ripple_core::wire::encode_array(buf, offset, &self.body)?;
        Ok(offset - start)
    }

    fn decode(buf: &[u8]) -> Result<Self, ripple_core::Error> {
        let expected = ripple_core::hash::get_hash::<Self>();
        let offset = ripple_core::wire::decode_hash_prefix(buf, 0, expected)?;
        let (value, _used) = Self::decode_no_hash(buf, offset)?;
        Ok(value)
    }

    fn decode_no_hash(buf: &[u8], offset: usize) -> Result<(Self, usize), ripple_core::Error> {
        let start = offset;
        let mut offset = offset;
        let sent_at_unix_ms = {
            let (value, used) = i64::read_be(buf, offset)?;
            offset += used;
            value
        };
        let author = {
            let (value, used) = Author::decode_no_hash(buf, offset)?;
            offset += used;
            value
        };
        let body_len = {
            let (value, used) = i32::read_be(buf, offset)?;
            offset += used;
            value
        };
        let body = {
            let (value, used) = ripple_core::wire::decode_array(buf, offset, body_len as usize)?;
            offset += used;
            value
        };
        Ok((
            Self {
                sent_at_unix_ms,
                author,
                body_len,
                body,
            },
            offset - start,
        ))
    }

    fn encoded_size_no_hash(&self) -> usize {
        let mut size = 0usize;
        size += 8;
        size += self.author.encoded_size_no_hash();
        size += 4;
        size += 1 * self.body.len();
        size
    }
}

pub fn chat_message_publish(
    rt: &ripple_runtime::Runtime,
    channel: &str,
    msg: &ChatMessage,
) -> Result<(), ripple_core::Error> {
    ripple_runtime::trampoline::publish_typed(rt, channel, msg)
}

pub fn chat_message_subscribe<F>(
    rt: &ripple_runtime::Runtime,
    pattern: &str,
    handler: F,
) -> Result<ripple_runtime::SubscriptionId, ripple_core::Error>
where
    F: Fn(&ChatMessage, &str) + Send + Sync + 'static,
{
    ripple_runtime::trampoline::subscribe_typed(rt, pattern, handler)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypingIndicator {
    pub user: String,
    pub is_typing: bool,
}

impl ripple_core::hash::TypeHash for TypingIndicator {
    const TYPE_SEED: u64 = 0xa139a89251d343d3;
    fn hash_recursive(_visiting: &[u64]) -> i64 {
        ripple_core::hash::finalize(Self::TYPE_SEED as i64)
    }
}

impl ripple_core::wire::Codec for TypingIndicator {
    fn encode(&self, buf: &mut [u8]) -> Result<usize, ripple_core::Error> {
        let hash = ripple_core::hash::get_hash::<Self>();
        let mut offset = ripple_core::wire::encode_hash_prefix(buf, 0, hash)?;
        offset += self.encode_no_hash(buf, offset)?;
        Ok(offset)
    }

    fn encode_no_hash(&self, buf: &mut [u8], offset: usize) -> Result<usize, ripple_core::Error> {
        let start = offset;
        let mut offset = offset;
        offset += ripple_core::wire::encode_string(buf, offset, &self.user)?;
        offset += self.is_typing.write_be(buf, offset)?;
        Ok(offset - start)
    }

    fn decode(buf: &[u8]) -> Result<Self, ripple_core::Error> {
        let expected = ripple_core::hash::get_hash::<Self>();
        let offset = ripple_core::wire::decode_hash_prefix(buf, 0, expected)?;
        let (value, _used) = Self::decode_no_hash(buf, offset)?;
        Ok(value)
    }

    fn decode_no_hash(buf: &[u8], offset: usize) -> Result<(Self, usize), ripple_core::Error> {
        let start = offset;
        let mut offset = offset;
        let user = {
            let (value, used) = ripple_core::wire::decode_string(buf, offset)?;
            offset += used;
            value
        };
        let is_typing = {
            let (value, used) = bool::read_be(buf, offset)?;
            offset += used;
            value
        };
        Ok((Self { user, is_typing }, offset - start))
    }

    fn encoded_size_no_hash(&self) -> usize {
        let mut size = 0usize;
        size += 4 + self.user.len() + 1;
        size += 1;
        size
    }
}

pub fn typing_indicator_publish(
    rt: &ripple_runtime::Runtime,
    channel: &str,
    msg: &TypingIndicator,
) -> Result<(), ripple_core::Error> {
    ripple_runtime::trampoline::publish_typed(rt, channel, msg)
}

pub fn typing_indicator_subscribe<F>(
    rt: &ripple_runtime::Runtime,
    pattern: &str,
    handler: F,
) -> Result<ripple_runtime::SubscriptionId, ripple_core::Error>
where
    F: Fn(&TypingIndicator, &str) + Send + Sync + 'static,
{
    ripple_runtime::trampoline::subscribe_typed(rt, pattern, handler)
}
