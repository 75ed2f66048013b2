use std::collections::HashMap;

/// a response of the host fetch primitive
pub trait FetchResponse: Send {
    fn get_http_status(&self) -> u16;
    /// get a header, names should be matched case insensitive
    fn get_header(&self, name: &str) -> Option<&str>;
    /// read the next chunk of the body, None when the body is exhausted
    fn read(&mut self) -> Option<Vec<u8>>;
    /// true for a 2xx status
    fn is_ok(&self) -> bool {
        (200..300).contains(&self.get_http_status())
    }
}

/// read a body till completion, invalid utf-8 is replaced like a browser's text() does
pub fn read_text(response: &mut dyn FetchResponse) -> String {
    let mut bytes = vec![];
    while let Some(mut buffer) = response.read() {
        bytes.append(&mut buffer);
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// a response which has its whole body in memory
pub struct BufferedResponse {
    status: u16,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
}

impl BufferedResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }
    pub fn body<B: Into<Vec<u8>>>(mut self, body: B) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl FetchResponse for BufferedResponse {
    fn get_http_status(&self) -> u16 {
        self.status
    }

    fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name.to_ascii_lowercase().as_str())
            .map(|v| v.as_str())
    }

    fn read(&mut self) -> Option<Vec<u8>> {
        self.body.take()
    }
}
