use crate::resolver::ModuleUrl;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FetchMethod {
    /// metadata only, the body is never read
    Head,
    Get,
}

impl FetchMethod {
    pub fn as_str(&self) -> &str {
        match self {
            FetchMethod::Head => "HEAD",
            FetchMethod::Get => "GET",
        }
    }
}

impl Display for FetchMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct FetchRequest {
    url: ModuleUrl,
    method: FetchMethod,
    headers: HashMap<String, Vec<String>>,
}

impl FetchRequest {
    pub fn new(url: &ModuleUrl, method: FetchMethod, headers: HashMap<String, Vec<String>>) -> Self {
        Self {
            url: url.clone(),
            method,
            headers,
        }
    }
    pub fn get_url(&self) -> &ModuleUrl {
        &self.url
    }
    pub fn get_method(&self) -> FetchMethod {
        self.method
    }
    pub fn get_header(&self, name: &str) -> &[String] {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }
}
