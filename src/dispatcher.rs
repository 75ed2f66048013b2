//! finds out what kind of module a url points to before anything is downloaded

use crate::features::fetch::request::FetchMethod;
use crate::features::fetch::{fetch_checked, Fetcher};
use crate::moduleerror::ModuleError;
use crate::resolver::ModuleUrl;
use std::fmt::{Display, Formatter};

/// the Accept header of the metadata request, any module kind will do
pub const MODULE_ACCEPT: &str = "text/javascript, text/css, text/html";

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ContentKind {
    Script,
    StyleSheet,
    Markup,
}

impl ContentKind {
    /// the mime type requested when the body of a module of this kind is fetched
    pub fn mime(&self) -> &'static str {
        match self {
            ContentKind::Script => "text/javascript",
            ContentKind::StyleSheet => "text/css",
            ContentKind::Markup => "text/html",
        }
    }

    /// map a content type to a kind, parameters like charset are ignored
    pub fn from_mime(content_type: &str) -> Option<ContentKind> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        match mime.as_str() {
            "text/javascript" | "application/javascript" => Some(ContentKind::Script),
            "text/css" => Some(ContentKind::StyleSheet),
            "text/html" => Some(ContentKind::Markup),
            _ => None,
        }
    }
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ContentKind::Script => "script",
            ContentKind::StyleSheet => "stylesheet",
            ContentKind::Markup => "markup",
        })
    }
}

/// issue a metadata only request and map the declared content type to a ContentKind
pub async fn probe(fetcher: &dyn Fetcher, url: &ModuleUrl) -> Result<ContentKind, ModuleError> {
    let response = fetch_checked(fetcher, url, FetchMethod::Head, MODULE_ACCEPT).await?;
    match response.get_header("Content-Type") {
        Some(content_type) => match ContentKind::from_mime(content_type) {
            Some(kind) => {
                log::debug!("module {} is a {} module", url, kind);
                Ok(kind)
            }
            None => Err(ModuleError::UnknownModuleType {
                url: url.to_string(),
                mime: Some(
                    content_type
                        .split(';')
                        .next()
                        .unwrap_or(content_type)
                        .trim()
                        .to_string(),
                ),
            }),
        },
        None => Err(ModuleError::UnknownModuleType {
            url: url.to_string(),
            mime: None,
        }),
    }
}

#[cfg(test)]
pub mod tests {
    use crate::dispatcher::{probe, ContentKind, MODULE_ACCEPT};
    use crate::features::fetch::request::FetchMethod;
    use crate::moduleerror::ModuleError;
    use crate::resolver::ModuleUrl;
    use crate::testutils::MockFetcher;

    #[test]
    fn test_from_mime() {
        assert_eq!(
            ContentKind::from_mime("text/javascript"),
            Some(ContentKind::Script)
        );
        assert_eq!(
            ContentKind::from_mime("Application/JavaScript; charset=utf-8"),
            Some(ContentKind::Script)
        );
        assert_eq!(
            ContentKind::from_mime("text/css;charset=UTF-8"),
            Some(ContentKind::StyleSheet)
        );
        assert_eq!(
            ContentKind::from_mime(" text/html "),
            Some(ContentKind::Markup)
        );
        assert_eq!(ContentKind::from_mime("text/plain"), None);
        assert_eq!(ContentKind::from_mime(""), None);
        for kind in [ContentKind::Script, ContentKind::StyleSheet, ContentKind::Markup] {
            assert_eq!(ContentKind::from_mime(kind.mime()), Some(kind));
        }
    }

    #[tokio::test]
    async fn test_probe() {
        let fetcher = MockFetcher::new()
            .resource("https://h/a.html", 200, Some("text/html; charset=utf-8"), "<p>")
            .resource("https://h/a.txt", 200, Some("text/plain"), "plain")
            .resource("https://h/untyped", 200, None, "?")
            .resource("https://h/gone.js", 410, Some("text/javascript"), "");

        let url = ModuleUrl::parse("https://h/a.html").ok().unwrap();
        assert_eq!(probe(&fetcher, &url).await.ok(), Some(ContentKind::Markup));

        let url = ModuleUrl::parse("https://h/a.txt").ok().unwrap();
        match probe(&fetcher, &url).await {
            Err(ModuleError::UnknownModuleType { mime, .. }) => {
                assert_eq!(mime.as_deref(), Some("text/plain"))
            }
            _ => panic!("expected UnknownModuleType"),
        }

        let url = ModuleUrl::parse("https://h/untyped").ok().unwrap();
        match probe(&fetcher, &url).await {
            Err(ModuleError::UnknownModuleType { mime, .. }) => assert!(mime.is_none()),
            _ => panic!("expected UnknownModuleType"),
        }

        let url = ModuleUrl::parse("https://h/gone.js").ok().unwrap();
        let res = probe(&fetcher, &url).await;
        assert_eq!(res.err().and_then(|e| e.get_status()), Some(410));

        // probing never reads a body
        assert_eq!(fetcher.count(FetchMethod::Get), 0);
        assert_eq!(fetcher.count(FetchMethod::Head), 4);
        assert!(fetcher
            .accepted()
            .iter()
            .all(|accept| accept.as_deref() == Some(MODULE_ACCEPT)));
    }
}
