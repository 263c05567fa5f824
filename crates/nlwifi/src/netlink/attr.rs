//! Netlink attribute (nlattr) encoding and decoding.
//!
//! Attributes are TLV records: a 4-byte header (length including header,
//! type) followed by the payload and zero padding up to the next 4-byte
//! boundary. A nested attribute is simply an attribute whose payload is
//! itself an encoded attribute list; this module never interprets payloads.

use crate::error::{Error, Result};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Netlink attribute alignment.
pub const NLA_ALIGNTO: usize = 4;

/// Align a length to NLA_ALIGNTO boundary.
#[inline]
pub const fn nla_align(len: usize) -> usize {
    (len + NLA_ALIGNTO - 1) & !(NLA_ALIGNTO - 1)
}

/// Size of the attribute header.
pub const NLA_HDRLEN: usize = 4; // nla_align(size_of::<NlAttr>())

/// Largest payload a single attribute can carry.
pub const NLA_MAX_PAYLOAD: usize = u16::MAX as usize - NLA_HDRLEN;

/// Netlink attribute header (mirrors struct nlattr).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlAttr {
    /// Length including header.
    pub nla_len: u16,
    /// Attribute type.
    pub nla_type: u16,
}

/// Attribute type flags.
pub const NLA_F_NESTED: u16 = 1 << 15;
pub const NLA_F_NET_BYTEORDER: u16 = 1 << 14;
pub const NLA_TYPE_MASK: u16 = !(NLA_F_NESTED | NLA_F_NET_BYTEORDER);

impl NlAttr {
    /// Create a new attribute header.
    ///
    /// The length field is 16 bits wide, so payloads above
    /// [`NLA_MAX_PAYLOAD`] are rejected.
    pub fn new(attr_type: u16, data_len: usize) -> Result<Self> {
        let nla_len = u16::try_from(NLA_HDRLEN + data_len).map_err(|_| {
            Error::InvalidArgument(format!(
                "attribute {} payload of {} bytes exceeds {} bytes",
                attr_type & NLA_TYPE_MASK,
                data_len,
                NLA_MAX_PAYLOAD
            ))
        })?;
        Ok(Self {
            nla_len,
            nla_type: attr_type,
        })
    }

    /// Get the attribute type without flags.
    pub fn kind(&self) -> u16 {
        self.nla_type & NLA_TYPE_MASK
    }

    /// Check if this is a nested attribute.
    pub fn is_nested(&self) -> bool {
        self.nla_type & NLA_F_NESTED != 0
    }

    /// Get the payload length (total length minus header).
    pub fn payload_len(&self) -> usize {
        (self.nla_len as usize).saturating_sub(NLA_HDRLEN)
    }

    /// Convert to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }
}

/// Lenient iterator over netlink attributes in a buffer.
///
/// Stops silently at the first malformed header; use [`decode`] when a
/// malformed buffer must be reported.
pub struct AttrIter<'a> {
    data: &'a [u8],
}

impl<'a> AttrIter<'a> {
    /// Create a new attribute iterator.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Check if there are no more attributes.
    pub fn is_empty(&self) -> bool {
        self.data.len() < NLA_HDRLEN
    }
}

impl<'a> Iterator for AttrIter<'a> {
    /// Returns (attribute type, payload data).
    type Item = (u16, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        match split_first(self.data) {
            Ok(Some((attr, payload, rest))) => {
                self.data = rest;
                Some((attr.kind(), payload))
            }
            _ => {
                self.data = &[];
                None
            }
        }
    }
}

/// Split the first attribute off `data`.
///
/// Returns the header, its payload and the remaining (aligned) buffer.
fn split_first(data: &[u8]) -> Result<Option<(&NlAttr, &[u8], &[u8])>> {
    if data.is_empty() {
        return Ok(None);
    }
    let attr = NlAttr::from_bytes(data)?;
    let len = attr.nla_len as usize;
    if len < NLA_HDRLEN {
        return Err(Error::InvalidAttribute(format!(
            "attribute {} declares length {} shorter than its header",
            attr.kind(),
            len
        )));
    }
    if len > data.len() {
        return Err(Error::Truncated {
            expected: len,
            actual: data.len(),
        });
    }

    let payload = &data[NLA_HDRLEN..len];
    let rest = data.get(nla_align(len)..).unwrap_or(&[]);
    Ok(Some((attr, payload, rest)))
}

/// Strictly decode a flat attribute list into (type, payload) pairs.
///
/// Types are reported without the nested/byte-order flags. A declared length
/// shorter than the header or longer than the remaining buffer is an error.
pub fn decode(mut data: &[u8]) -> Result<Vec<(u16, &[u8])>> {
    let mut attrs = Vec::new();
    while let Some((attr, payload, rest)) = split_first(data)? {
        attrs.push((attr.kind(), payload));
        data = rest;
    }
    Ok(attrs)
}

/// Encode an attribute list into its padded wire form.
pub fn encode(attrs: &[Attribute]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    for attr in attrs {
        attr.write_to(&mut buf)?;
    }
    Ok(buf)
}

/// Value carried by an [`Attribute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Raw payload bytes.
    Bytes(Vec<u8>),
    /// Nested attribute list (encoded with `NLA_F_NESTED`).
    Nested(Vec<Attribute>),
}

/// An owned netlink attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute type, without flags.
    pub kind: u16,
    /// Payload.
    pub value: AttrValue,
}

impl Attribute {
    /// Attribute with a raw payload.
    pub fn bytes(kind: u16, data: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            value: AttrValue::Bytes(data.into()),
        }
    }

    /// Attribute with no payload (a flag).
    pub fn flag(kind: u16) -> Self {
        Self::bytes(kind, Vec::new())
    }

    /// A u8 attribute.
    pub fn u8(kind: u16, value: u8) -> Self {
        Self::bytes(kind, vec![value])
    }

    /// A u16 attribute (native endian).
    pub fn u16(kind: u16, value: u16) -> Self {
        Self::bytes(kind, value.to_ne_bytes().to_vec())
    }

    /// A u32 attribute (native endian).
    pub fn u32(kind: u16, value: u32) -> Self {
        Self::bytes(kind, value.to_ne_bytes().to_vec())
    }

    /// A u64 attribute (native endian).
    pub fn u64(kind: u16, value: u64) -> Self {
        Self::bytes(kind, value.to_ne_bytes().to_vec())
    }

    /// A null-terminated string attribute.
    pub fn string(kind: u16, value: &str) -> Self {
        let mut data = Vec::with_capacity(value.len() + 1);
        data.extend_from_slice(value.as_bytes());
        data.push(0);
        Self::bytes(kind, data)
    }

    /// A nested attribute list.
    pub fn nested(kind: u16, children: Vec<Attribute>) -> Self {
        Self {
            kind,
            value: AttrValue::Nested(children),
        }
    }

    /// Length of the payload once encoded, excluding header and trailing padding.
    pub fn payload_len(&self) -> usize {
        match &self.value {
            AttrValue::Bytes(data) => data.len(),
            AttrValue::Nested(children) => children.iter().map(Attribute::encoded_len).sum(),
        }
    }

    /// Total encoded length including header and trailing padding.
    pub fn encoded_len(&self) -> usize {
        nla_align(NLA_HDRLEN + self.payload_len())
    }

    /// Append this attribute to `buf`, padding to the next boundary.
    ///
    /// Fails without touching `buf` when this attribute or any nested child
    /// is too long for its 16-bit length field.
    pub fn write_to(&self, buf: &mut Vec<u8>) -> Result<()> {
        let start = buf.len();
        let result = self.write_unchecked(buf);
        if result.is_err() {
            buf.truncate(start);
        }
        result
    }

    fn write_unchecked(&self, buf: &mut Vec<u8>) -> Result<()> {
        let start = buf.len();
        let attr_type = match self.value {
            AttrValue::Bytes(_) => self.kind,
            AttrValue::Nested(_) => self.kind | NLA_F_NESTED,
        };
        // nla_len excludes the trailing padding.
        buf.extend_from_slice(NlAttr::new(attr_type, self.payload_len())?.as_bytes());
        match &self.value {
            AttrValue::Bytes(data) => buf.extend_from_slice(data),
            AttrValue::Nested(children) => {
                for child in children {
                    child.write_unchecked(buf)?;
                }
            }
        }
        buf.resize(start + self.encoded_len(), 0);
        Ok(())
    }

    /// Decode a buffer into owned attributes.
    ///
    /// Payloads flagged `NLA_F_NESTED` are decoded recursively; all others
    /// are kept as raw bytes.
    pub fn decode_tree(mut data: &[u8]) -> Result<Vec<Attribute>> {
        let mut attrs = Vec::new();
        while let Some((hdr, payload, rest)) = split_first(data)? {
            let value = if hdr.is_nested() {
                AttrValue::Nested(Self::decode_tree(payload)?)
            } else {
                AttrValue::Bytes(payload.to_vec())
            };
            attrs.push(Attribute {
                kind: hdr.kind(),
                value,
            });
            data = rest;
        }
        Ok(attrs)
    }
}

/// Helper functions for extracting typed values from attribute payloads.
pub mod get {
    use super::*;

    /// Extract a u8 value.
    pub fn u8(data: &[u8]) -> Result<u8> {
        if data.is_empty() {
            return Err(Error::InvalidAttribute("empty u8 attribute".into()));
        }
        Ok(data[0])
    }

    /// Extract a u16 value (native endian).
    pub fn u16_ne(data: &[u8]) -> Result<u16> {
        if data.len() < 2 {
            return Err(Error::InvalidAttribute("truncated u16 attribute".into()));
        }
        Ok(u16::from_ne_bytes([data[0], data[1]]))
    }

    /// Extract a u32 value (native endian).
    pub fn u32_ne(data: &[u8]) -> Result<u32> {
        if data.len() < 4 {
            return Err(Error::InvalidAttribute("truncated u32 attribute".into()));
        }
        Ok(u32::from_ne_bytes([data[0], data[1], data[2], data[3]]))
    }

    /// Extract a u64 value (native endian).
    pub fn u64_ne(data: &[u8]) -> Result<u64> {
        if data.len() < 8 {
            return Err(Error::InvalidAttribute("truncated u64 attribute".into()));
        }
        Ok(u64::from_ne_bytes([
            data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
        ]))
    }

    /// Extract an i32 value (native endian).
    pub fn i32_ne(data: &[u8]) -> Result<i32> {
        if data.len() < 4 {
            return Err(Error::InvalidAttribute("truncated i32 attribute".into()));
        }
        Ok(i32::from_ne_bytes([data[0], data[1], data[2], data[3]]))
    }

    /// Extract a null-terminated string.
    pub fn string(data: &[u8]) -> Result<&str> {
        // Find null terminator or use whole buffer
        let len = data.iter().position(|&b| b == 0).unwrap_or(data.len());
        std::str::from_utf8(&data[..len])
            .map_err(|e| Error::InvalidAttribute(format!("invalid UTF-8: {}", e)))
    }

    /// Extract bytes (no interpretation).
    pub fn bytes(data: &[u8]) -> &[u8] {
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_pads_each_attribute() {
        let buf = encode(&[Attribute::u8(1, 7), Attribute::string(4, "wlan0")]).unwrap();
        // 4+1 -> 8, 4+6 -> 12
        assert_eq!(buf.len(), 20);
        assert_eq!(buf.len() % NLA_ALIGNTO, 0);

        let first = NlAttr::from_bytes(&buf).unwrap();
        assert_eq!(first.nla_len, 5);
        assert_eq!(first.nla_type, 1);
        assert_eq!(&buf[4..8], &[7, 0, 0, 0]);

        let second = NlAttr::from_bytes(&buf[8..]).unwrap();
        assert_eq!(second.nla_len, 10);
        assert_eq!(&buf[12..18], b"wlan0\0");
    }

    #[test]
    fn test_decode_pairs() {
        let buf = encode(&[
            Attribute::u32(3, 42),
            Attribute::flag(9),
            Attribute::u16(2, 0x13),
        ])
        .unwrap();
        let attrs = decode(&buf).unwrap();
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs[0].0, 3);
        assert_eq!(get::u32_ne(attrs[0].1).unwrap(), 42);
        assert_eq!(attrs[1], (9, &[][..]));
        assert_eq!(get::u16_ne(attrs[2].1).unwrap(), 0x13);
    }

    #[test]
    fn test_decode_tree_restores_nested() {
        let attrs = vec![
            Attribute::u32(1, 0),
            Attribute::nested(
                45,
                vec![
                    Attribute::bytes(1, b"home".to_vec()),
                    Attribute::nested(2, vec![Attribute::u8(1, 3)]),
                ],
            ),
            Attribute::string(4, "mon0"),
        ];
        let buf = encode(&attrs).unwrap();
        assert_eq!(buf.len() % NLA_ALIGNTO, 0);
        assert_eq!(Attribute::decode_tree(&buf).unwrap(), attrs);
    }

    #[test]
    fn test_nested_header_length_covers_children() {
        let nest = Attribute::nested(7, vec![Attribute::u8(1, 1), Attribute::u32(2, 2)]);
        let buf = encode(std::slice::from_ref(&nest)).unwrap();
        let hdr = NlAttr::from_bytes(&buf).unwrap();
        assert!(hdr.is_nested());
        assert_eq!(hdr.kind(), 7);
        assert_eq!(hdr.nla_len as usize, NLA_HDRLEN + 8 + 8);
        assert_eq!(buf.len(), nest.encoded_len());
    }

    #[test]
    fn test_decode_rejects_overlong_length() {
        let mut buf = encode(&[Attribute::u32(1, 5)]).unwrap();
        buf[0] = 40; // claims 40 bytes, only 8 present
        assert!(matches!(
            decode(&buf),
            Err(Error::Truncated {
                expected: 40,
                actual: 8
            })
        ));
    }

    #[test]
    fn test_decode_rejects_short_length() {
        let mut buf = encode(&[Attribute::u32(1, 5)]).unwrap();
        buf[0] = 2;
        assert!(matches!(decode(&buf), Err(Error::InvalidAttribute(_))));
    }

    #[test]
    fn test_decode_rejects_partial_header() {
        assert!(matches!(
            decode(&[8, 0]),
            Err(Error::Truncated {
                expected: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_iter_stops_at_garbage() {
        let mut buf = encode(&[Attribute::u32(1, 5), Attribute::u32(2, 6)]).unwrap();
        buf[8] = 200;
        let kinds: Vec<u16> = AttrIter::new(&buf).map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![1]);
    }

    #[test]
    fn test_iter_masks_flags() {
        let buf = encode(&[Attribute::nested(22, vec![])]).unwrap();
        let (kind, payload) = AttrIter::new(&buf).next().unwrap();
        assert_eq!(kind, 22);
        assert!(payload.is_empty());
    }

    #[test]
    fn test_encode_rejects_oversize_payload() {
        let err = encode(&[Attribute::bytes(1, vec![0xab; 70_000])]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let max = encode(&[Attribute::bytes(1, vec![0xab; NLA_MAX_PAYLOAD])]).unwrap();
        assert_eq!(NlAttr::from_bytes(&max).unwrap().nla_len, u16::MAX);
        assert_eq!(decode(&max).unwrap()[0].1.len(), NLA_MAX_PAYLOAD);
    }

    #[test]
    fn test_oversize_nest_leaves_buffer_untouched() {
        // Each child fits, their sum does not.
        let nest = Attribute::nested(
            2,
            vec![
                Attribute::bytes(1, vec![0; 40_000]),
                Attribute::bytes(1, vec![0; 40_000]),
            ],
        );
        let mut buf = encode(&[Attribute::u32(1, 5)]).unwrap();
        assert!(nest.write_to(&mut buf).is_err());
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn test_get_helpers() {
        assert!(get::u8(&[]).is_err());
        assert!(get::u32_ne(&[1, 2]).is_err());
        assert_eq!(get::string(b"US\0\0").unwrap(), "US");
        assert_eq!(get::string(b"wlan0").unwrap(), "wlan0");
        assert_eq!(get::i32_ne(&(-300i32).to_ne_bytes()).unwrap(), -300);
    }
}
