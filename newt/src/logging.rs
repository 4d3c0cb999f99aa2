use newt_msg::Message;

/// One-line description of a message for log output,
/// e.g. `Con 0.02 id=0x0001 with 40 byte payload`
pub fn msg_summary(msg: &Message) -> String {
  format!("{:?} {} id={:#06x} with {} byte payload",
          msg.ty,
          msg.code,
          msg.id.0,
          msg.payload.0.len())
}

#[cfg(test)]
mod tests {
  use newt_msg::{Code, Id, Payload, Token, Type};

  use super::*;

  #[test]
  fn summary() {
    let mut msg = Message::new(Type::Con, Code::POST, Id(1), Token::default());
    msg.payload = Payload(vec![0; 40]);
    assert_eq!(msg_summary(&msg), "Con 0.02 id=0x0001 with 40 byte payload");
  }
}
