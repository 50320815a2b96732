use crate::value::Bencode;

const BEN_END: u8 = b'e';
const DICT_START: u8 = b'd';
const LIST_START: u8 = b'l';
const INT_START: u8 = b'i';
const BYTE_LEN_END: u8 = b':';

/// Encodes `value` into freshly allocated bytes.
pub fn encode(value: &Bencode) -> Vec<u8> {
    let mut sink = Vec::new();
    encode_into(value, &mut sink);
    sink
}

/// Encodes `value`, appending to `sink`. `sink` is never truncated or
/// read back — the encoder only ever appends, matching the spec's
/// append-only byte sink contract.
pub fn encode_into(value: &Bencode, sink: &mut Vec<u8>) {
    match value {
        Bencode::Int(n) => encode_int(*n, sink),
        Bencode::Bytes(b) => encode_bytes(b, sink),
        Bencode::Text(s) => encode_bytes(s.as_bytes(), sink),
        Bencode::List(items) => encode_list(items, sink),
        Bencode::Dict(map) => encode_dict(map, sink),
    }
}

fn encode_int(n: i64, sink: &mut Vec<u8>) {
    sink.push(INT_START);
    sink.extend(n.to_string().into_bytes());
    sink.push(BEN_END);
}

fn encode_bytes(bytes: &[u8], sink: &mut Vec<u8>) {
    sink.extend(bytes.len().to_string().into_bytes());
    sink.push(BYTE_LEN_END);
    sink.extend_from_slice(bytes);
}

fn encode_list(items: &[Bencode], sink: &mut Vec<u8>) {
    sink.push(LIST_START);
    for item in items {
        encode_into(item, sink);
    }
    sink.push(BEN_END);
}

fn encode_dict(map: &std::collections::BTreeMap<Vec<u8>, Bencode>, sink: &mut Vec<u8>) {
    sink.push(DICT_START);
    // BTreeMap iterates keys in ascending order already, so no sort is needed
    // here the way bip_bencode's encode_dict sorts a Vec pulled from the map.
    for (key, value) in map {
        encode_bytes(key, sink);
        encode_into(value, sink);
    }
    sink.push(BEN_END);
}
