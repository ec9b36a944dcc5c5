// src/protocol/a2s.rs
//! A2S_INFO request encoding and response decoding.
//!
//! Only the plain single-datagram exchange is supported. A server answering
//! with an `S2C_CHALLENGE` (0x41) packet decodes as `UnexpectedType`.

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

use crate::models::server::ServerInfo;

/// Header shared by every single-packet message.
pub const PACKET_HEADER: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
pub const A2S_INFO: u8 = 0x54;
pub const S2A_INFO: u8 = 0x49;

const INFO_QUERY: [u8; 25] = [
    0xFF, 0xFF, 0xFF, 0xFF, A2S_INFO, b'S', b'o', b'u', b'r', b'c', b'e', b' ', b'E', b'n', b'g',
    b'i', b'n', b'e', b' ', b'Q', b'u', b'e', b'r', b'y', 0x00,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Invalid response")]
    TooShort,
    #[error("Invalid response type")]
    UnexpectedType,
    #[error("Truncated response")]
    Truncated,
}

pub fn encode_info_query() -> &'static [u8] {
    &INFO_QUERY
}

/// Cursor over a response datagram. Every read past the end is `Truncated`.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    fn bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos.checked_add(len).ok_or(DecodeError::Truncated)?;
        let slice = self.buf.get(self.pos..end).ok_or(DecodeError::Truncated)?;
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.bytes(1)?[0])
    }

    fn u16_le(&mut self) -> Result<u16, DecodeError> {
        Ok(LittleEndian::read_u16(self.bytes(2)?))
    }

    fn ascii_char(&mut self) -> Result<char, DecodeError> {
        Ok(char::from(self.u8()?))
    }

    /// Reads up to the next zero byte and moves past it.
    fn cstring(&mut self) -> Result<String, DecodeError> {
        let rest = self.buf.get(self.pos..).ok_or(DecodeError::Truncated)?;
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(DecodeError::Truncated)?;
        let value = String::from_utf8_lossy(&rest[..len]).into_owned();
        self.pos += len + 1;
        Ok(value)
    }
}

pub fn decode_info_response(datagram: &[u8]) -> Result<ServerInfo, DecodeError> {
    if datagram.len() < 5 {
        return Err(DecodeError::TooShort);
    }
    if datagram[4] != S2A_INFO {
        return Err(DecodeError::UnexpectedType);
    }

    let mut reader = Reader::new(datagram, 5);
    let _protocol = reader.u8()?;

    let name = reader.cstring()?;
    let map = reader.cstring()?;
    let _folder = reader.cstring()?;
    let game = reader.cstring()?;

    let _app_id = reader.u16_le()?;
    let players = reader.u8()?;
    let max_players = reader.u8()?;
    let bots = reader.u8()?;
    let server_type = reader.ascii_char()?;
    let _environment = reader.ascii_char()?;
    let _visibility = reader.u8()?;
    let vac = reader.u8()? == 1;

    Ok(ServerInfo {
        name,
        map,
        game,
        players,
        max_players,
        bots,
        server_type,
        vac,
    })
}
