use newt_msg::known::{no, ContentFormat};
use newt_msg::{Code, Id, Message, OptValue, Payload, Token, Type};

/// A request to be sent by [`crate::blocking::Client`]
///
/// ```
/// use newt::req::Req;
/// use newt_msg::known::{no, ContentFormat};
/// use newt_msg::{Code, Id, Token, Type};
///
/// let req = Req::post("things/upload").host("localhost")
///                                     .query("token=0000071A")
///                                     .content_format(ContentFormat::Json)
///                                     .payload(r#"{"temp":21.5}"#);
///
/// let msg = req.to_message(Type::Con, Id(7), Token::default());
/// assert_eq!(msg.code, Code::POST);
/// assert_eq!(msg.get(no::URI_PATH).map(|p| p.len()), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Req {
  code: Code,
  host: Option<String>,
  path: String,
  query: Vec<String>,
  content_format: Option<ContentFormat>,
  payload: Vec<u8>,
}

impl Req {
  /// Create a request with an arbitrary method code
  pub fn new(code: Code, path: impl AsRef<str>) -> Self {
    Self { code,
           host: None,
           path: path.as_ref().to_string(),
           query: vec![],
           content_format: None,
           payload: vec![] }
  }

  /// Create a POST request
  pub fn post(path: impl AsRef<str>) -> Self {
    Self::new(Code::POST, path)
  }

  /// Set the Uri-Host
  pub fn host(mut self, host: impl AsRef<str>) -> Self {
    self.host = Some(host.as_ref().to_string());
    self
  }

  /// Add a Uri-Query argument (e.g. `token=0000071A`)
  pub fn query(mut self, query: impl AsRef<str>) -> Self {
    self.query.push(query.as_ref().to_string());
    self
  }

  /// Set the Content-Format of the payload
  pub fn content_format(mut self, format: ContentFormat) -> Self {
    self.content_format = Some(format);
    self
  }

  /// Set the payload
  pub fn payload(mut self, payload: impl AsRef<[u8]>) -> Self {
    self.payload = payload.as_ref().to_vec();
    self
  }

  /// Serialize `body` as JSON and use it as the payload,
  /// also setting the Content-Format to JSON
  pub fn json<T: serde::Serialize>(self, body: &T) -> Result<Self, serde_json::Error> {
    serde_json::to_vec(body).map(|bytes| self.content_format(ContentFormat::Json).payload(bytes))
  }

  /// The method code
  pub fn code(&self) -> Code {
    self.code
  }

  /// The path, as given
  pub fn path(&self) -> &str {
    &self.path
  }

  /// The payload bytes
  pub fn payload_bytes(&self) -> &[u8] {
    &self.payload
  }

  /// Build the message for this request.
  ///
  /// The path is split on `/` into one Uri-Path option per non-empty segment.
  pub fn to_message(&self, ty: Type, id: Id, token: Token) -> Message {
    let mut msg = Message::new(ty, self.code, id, token);

    if let Some(host) = self.host.as_deref() {
      msg.add(no::URI_HOST, OptValue::from(host));
    }

    self.path
        .split('/')
        .filter(|seg| !seg.is_empty())
        .for_each(|seg| msg.add(no::URI_PATH, OptValue::from(seg)));

    if let Some(format) = self.content_format {
      msg.add(no::CONTENT_FORMAT, format.to_opt_value());
    }

    self.query
        .iter()
        .for_each(|q| msg.add(no::URI_QUERY, OptValue::from(q.as_str())));

    msg.payload = Payload(self.payload.clone());
    msg
  }
}
