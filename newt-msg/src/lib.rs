//! Low-level representation of CoAP messages.
//!
//! The most notable item in `newt_msg` is [`Message`];
//! a CoAP message very close to the actual byte layout.
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |Ver| T |  TKL  |      Code     |          Message ID           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |   Token (if any, TKL bytes) ...
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |   Options (if any) ...
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |1 1 1 1 1 1 1 1|    Payload (if any) ...
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! ## Owned vs. borrowed
//! - [`Message`] owns everything it parsed and can be serialized back with
//!   [`TryIntoBytes`].
//! - [`RawMessage`] borrows the datagram and only records where the option
//!   block and payload live; option values are pulled out on demand.
//!
//! ```
//! use newt_msg::*;
//!
//! let mut msg = Message::new(Type::Con, Code::POST, Id(1), Token::default());
//! msg.add(known::no::URI_PATH, OptValue(b"upload".to_vec()));
//! msg.payload = Payload(b"{}".to_vec());
//!
//! let bytes: Vec<u8> = msg.try_into_bytes().unwrap();
//! assert_eq!(Message::try_from_bytes(&bytes).unwrap(), msg);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(not(test), forbid(missing_debug_implementations, unreachable_pub))]
#![cfg_attr(not(test), deny(unsafe_code, missing_copy_implementations))]
#![cfg_attr(any(docsrs, feature = "docs"), feature(doc_cfg))]
#![deny(missing_docs)]

extern crate alloc as std_alloc;

/// Bounds-checked byte cursor
pub mod cursor;

#[doc(hidden)]
pub mod from_bytes;

/// Message structs
pub mod msg;

/// Borrowed, lazily-decoded messages
pub mod raw;

#[doc(hidden)]
pub mod to_bytes;

#[doc(inline)]
pub use cursor::Cursor;
#[doc(inline)]
pub use from_bytes::TryFromBytes;
#[doc(inline)]
pub use msg::*;
#[doc(inline)]
pub use raw::RawMessage;
#[doc(inline)]
pub use to_bytes::{Buffer, MessageToBytesError, TryIntoBytes};

#[cfg(test)]
pub(crate) fn test_msg() -> (Message, Vec<u8>) {
  let header: [u8; 4] = 0b0100_0001_0100_0101_0000_0000_0000_0001_u32.to_be_bytes();
  let token: [u8; 1] = [254u8];
  let content_format: &[u8] = b"application/json";
  let options: [&[u8]; 2] = [&[0b_1100_1101u8, 0b00000011u8], content_format];
  let payload: [&[u8]; 2] = [&[0b1111_1111_u8], b"hello, world!"];
  let bytes = [header.as_ref(),
               token.as_ref(),
               options.concat().as_ref(),
               payload.concat().as_ref()].concat();

  let msg = Message { id: Id(1),
                      ty: Type::Con,
                      ver: Version(1),
                      token: Token(tinyvec::array_vec!([u8; 8] => 254)),
                      opts: OptionMap::from([(OptNumber(12),
                                              vec![OptValue(content_format.to_vec())])]),
                      code: Code { class: 2,
                                   detail: 5 },
                      payload: Payload(b"hello, world!".to_vec()) };
  (msg, bytes)
}
