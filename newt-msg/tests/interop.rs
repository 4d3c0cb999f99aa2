use coap_lite::{CoapOption, MessageClass, MessageType, Packet, RequestType};
use itertools::iproduct;
use newt_msg::known::{no, ContentFormat};
use newt_msg::*;

fn uplink_message() -> Message {
  let token = Token::try_from_slice(&[0xA1, 0xB2, 0xC3, 0xD4]).unwrap();
  let mut msg = Message::new(Type::Con, Code::POST, Id(0x1234), token);
  msg.add(no::URI_QUERY, OptValue::from("token=0000071A"));
  msg.add(no::URI_HOST, OptValue::from("localhost"));
  msg.add(no::URI_PATH, OptValue::from("things"));
  msg.add(no::URI_PATH, OptValue::from("upload"));
  msg.add(no::CONTENT_FORMAT, ContentFormat::Json.to_opt_value());
  msg.payload = Payload(br#"{"temp":21.5,"humidity":40.0,"abn":0}"#.to_vec());
  msg
}

fn values(packet: &Packet, opt: CoapOption) -> Vec<Vec<u8>> {
  packet.get_option(opt)
        .map(|vs| vs.iter().cloned().collect())
        .unwrap_or_default()
}

#[test]
fn coap_lite_parses_what_we_encode() {
  let msg = uplink_message();
  let bytes: Vec<u8> = msg.try_into_bytes().unwrap();
  let packet = Packet::from_bytes(&bytes).unwrap();

  assert_eq!(packet.header.message_id, 0x1234);
  assert_eq!(packet.header.get_type(), MessageType::Confirmable);
  assert_eq!(packet.header.code, MessageClass::Request(RequestType::Post));
  assert_eq!(values(&packet, CoapOption::UriHost), vec![b"localhost".to_vec()]);
  assert_eq!(values(&packet, CoapOption::UriPath),
             vec![b"things".to_vec(), b"upload".to_vec()]);
  assert_eq!(values(&packet, CoapOption::UriQuery),
             vec![b"token=0000071A".to_vec()]);
  assert_eq!(values(&packet, CoapOption::ContentFormat), vec![vec![50]]);
  assert_eq!(packet.payload, msg.payload.0);
}

#[test]
fn we_parse_what_coap_lite_encodes() {
  let mut packet = Packet::new();
  packet.header.message_id = 42;
  packet.header.set_type(MessageType::Acknowledgement);
  packet.header.code = MessageClass::Request(RequestType::Post);
  packet.add_option(CoapOption::UriPath, b"things".to_vec());
  packet.add_option(CoapOption::UriQuery, b"a=b".to_vec());
  packet.payload = b"hi".to_vec();

  let bytes = packet.to_bytes().unwrap();
  let msg = Message::try_from_bytes(&bytes).unwrap();

  assert_eq!(msg.id, Id(42));
  assert_eq!(msg.ty, Type::Ack);
  assert_eq!(msg.code, Code::POST);
  assert_eq!(msg.get_first(no::URI_PATH), Some(&OptValue::from("things")));
  assert_eq!(msg.get_first(no::URI_QUERY), Some(&OptValue::from("a=b")));
  assert_eq!(msg.payload.as_str(), Some("hi"));
}

#[test]
fn round_trip() {
  let msg = uplink_message();
  let bytes: Vec<u8> = msg.try_into_bytes().unwrap();
  assert_eq!(Message::try_from_bytes(&bytes), Ok(msg));
}

/// Encoded size of one option: header byte, delta and length
/// extensions, value.
fn opt_size(delta: usize, len: usize) -> usize {
  let ext = |n: usize| match n {
    | n if n < 13 => 0,
    | n if n < 269 => 1,
    | _ => 2,
  };
  1 + ext(delta) + ext(len) + len
}

#[test]
fn truncation_never_panics() {
  for (tkl, value_len, payload_len) in iproduct!([0usize, 4, 8], [0usize, 12, 13, 300], [0usize, 1, 20]) {
    let token = Token::try_from_slice(&[9; 8][..tkl]).unwrap();
    let mut msg = Message::new(Type::Non, Code::POST, Id(1), token);
    msg.add(no::URI_HOST, OptValue(vec![b'h'; value_len]));
    msg.add(OptNumber(300), OptValue(vec![b'x'; value_len]));
    msg.payload = Payload(vec![b'p'; payload_len]);

    let bytes: Vec<u8> = msg.try_into_bytes().unwrap();
    assert_eq!(Message::try_from_bytes(&bytes).as_ref(), Ok(&msg));

    // offsets where an option may legally end
    let opts_start = 4 + tkl;
    let host_end = opts_start + opt_size(3, value_len);
    let opts_end = host_end + opt_size(297, value_len);
    assert_eq!(opts_end,
               bytes.len() - if payload_len == 0 { 0 } else { payload_len + 1 });

    for cut in 0..bytes.len() {
      let prefix = &bytes[..cut];
      let full = Message::try_from_bytes(prefix);
      let raw = RawMessage::try_from_bytes(prefix);
      assert_eq!(full.is_ok(), raw.is_ok());

      match cut {
        | cut if cut < opts_start => {
          assert_eq!(full, Err(MessageParseError::UnexpectedEndOfStream))
        },
        | cut if cut == opts_start || cut == host_end || cut == opts_end => {
          let parsed = full.unwrap();
          assert!(parsed.payload.0.is_empty());
          assert_eq!(parsed.opts_iter().count(),
                     [opts_start, host_end, opts_end].iter()
                                                     .position(|end| *end == cut)
                                                     .unwrap());
        },
        | cut if cut < opts_end => {
          assert_eq!(full,
                     Err(MessageParseError::OptParseError(OptParseError::UnexpectedEndOfStream)),
                     "cut at {} of {:02x?}",
                     cut,
                     bytes)
        },
        // marker with nothing after it
        | cut if cut == opts_end + 1 => {
          assert_eq!(full, Err(MessageParseError::PayloadMarkerWithoutPayload))
        },
        | _ => assert_eq!(full.unwrap().payload.0.len(), cut - opts_end - 1),
      }
    }
  }
}

#[test]
fn delta_boundaries_survive_a_full_message() {
  let numbers = [0u16, 12, 13, 268, 269, 270];
  let mut msg = Message::new(Type::Con, Code::POST, Id(7), Token::default());
  for n in numbers {
    msg.add(OptNumber(n), OptValue(n.to_be_bytes().to_vec()));
  }
  msg.payload = Payload(b"boundaries".to_vec());

  let bytes: Vec<u8> = msg.try_into_bytes().unwrap();

  let full = Message::try_from_bytes(&bytes).unwrap();
  assert_eq!(full.opts_iter()
                 .map(|(n, v)| (n.0, v.0.clone()))
                 .collect::<Vec<_>>(),
             numbers.iter()
                    .map(|n| (*n, n.to_be_bytes().to_vec()))
                    .collect::<Vec<_>>());
  assert_eq!(full.payload.as_str(), Some("boundaries"));

  let raw = RawMessage::try_from_bytes(&bytes[..]).unwrap();
  assert_eq!(raw.opts()
                .map(|(n, v)| (n.0, v.to_vec()))
                .collect::<Vec<_>>(),
             numbers.iter()
                    .map(|n| (*n, n.to_be_bytes().to_vec()))
                    .collect::<Vec<_>>());
  assert_eq!(raw.payload(), b"boundaries");
}
