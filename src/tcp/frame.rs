//! Response frames in the RESP encoding.
//!
//! Only the encode side exists here: requests arrive as plain text lines,
//! but every reply is one of the RESP frame shapes below.

use bytes::{BufMut, Bytes, BytesMut};

/// A single response frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// `+<text>\r\n`
    Simple(String),
    /// `-<text>\r\n`
    Error(String),
    /// `:<int>\r\n`
    Integer(i64),
    /// `$<len>\r\n<data>\r\n`
    Bulk(String),
    /// `$-1\r\n`
    Null,
    /// `*<N>\r\n` followed by N frames
    Array(Vec<Frame>),
}

impl Frame {
    /// The `+OK` reply.
    pub fn ok() -> Frame {
        Frame::Simple("OK".to_string())
    }

    /// An `-ERR <message>` reply.
    pub fn err(message: impl std::fmt::Display) -> Frame {
        Frame::Error(format!("ERR {message}"))
    }

    /// An array of bulk strings, one per input item.
    pub fn bulk_array<I, S>(items: I) -> Frame
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Frame::Array(items.into_iter().map(|s| Frame::Bulk(s.into())).collect())
    }

    /// Encodes the frame into `dst`.
    pub fn encode(&self, dst: &mut BytesMut) {
        match self {
            Frame::Simple(s) => {
                dst.put_u8(b'+');
                dst.put(s.as_bytes());
                dst.put(&b"\r\n"[..]);
            }
            Frame::Error(s) => {
                dst.put_u8(b'-');
                dst.put(s.as_bytes());
                dst.put(&b"\r\n"[..]);
            }
            Frame::Integer(n) => {
                dst.put_u8(b':');
                dst.put(n.to_string().as_bytes());
                dst.put(&b"\r\n"[..]);
            }
            Frame::Bulk(data) => {
                dst.put_u8(b'$');
                dst.put(data.len().to_string().as_bytes());
                dst.put(&b"\r\n"[..]);
                dst.put(data.as_bytes());
                dst.put(&b"\r\n"[..]);
            }
            Frame::Null => {
                dst.put(&b"$-1\r\n"[..]);
            }
            Frame::Array(frames) => {
                dst.put_u8(b'*');
                dst.put(frames.len().to_string().as_bytes());
                dst.put(&b"\r\n"[..]);
                for frame in frames {
                    frame.encode(dst);
                }
            }
        }
    }

    /// Encodes the frame into a fresh byte buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.freeze()
    }
}
