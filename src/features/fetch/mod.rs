//! the network retrieval interface
//!
//! hosts either implement [Fetcher] directly or register a blocking provider closure with
//! [ModuleLoaderBuilder::fetch_response_provider](../../builder/struct.ModuleLoaderBuilder.html#method.fetch_response_provider),
//! which is then run in the blocking pool of the helper runtime, so loads may be awaited from any executor

use crate::features::fetch::request::{FetchMethod, FetchRequest};
use crate::features::fetch::response::FetchResponse;
use crate::moduleerror::ModuleError;
use crate::resolver::ModuleUrl;
use crate::utils::helper_tasks::add_helper_task_blocking;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashMap;
use std::sync::Arc;

pub mod request;
pub mod response;

pub type FetchResult = Result<Box<dyn FetchResponse>, ModuleError>;

/// the fetch primitive of the host
///
/// an Err should only be returned when no response could be obtained at all, non success statuses are returned as
/// a response and checked by the loader
pub trait Fetcher: Send + Sync {
    fn fetch(&self, request: FetchRequest) -> BoxFuture<'static, FetchResult>;
}

/// a Fetcher which calls a blocking provider in a helper thread
pub struct ProviderFetcher<P>
where
    P: Fn(&FetchRequest) -> FetchResult + Send + Sync + 'static,
{
    provider: Arc<P>,
}

impl<P> ProviderFetcher<P>
where
    P: Fn(&FetchRequest) -> FetchResult + Send + Sync + 'static,
{
    pub fn new(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }
}

impl<P> Fetcher for ProviderFetcher<P>
where
    P: Fn(&FetchRequest) -> FetchResult + Send + Sync + 'static,
{
    fn fetch(&self, request: FetchRequest) -> BoxFuture<'static, FetchResult> {
        let provider = self.provider.clone();
        let url = request.get_url().to_string();
        log::trace!("adding a helper task for {} {}", request.get_method(), url);
        async move {
            match add_helper_task_blocking(move || provider(&request)).await {
                Ok(res) => res,
                Err(e) => Err(ModuleError::Network {
                    url,
                    message: format!("fetch provider failed: {e}"),
                }),
            }
        }
        .boxed()
    }
}

/// fetch a module url and make sure the response has a success status
///
/// accept is sent as the Accept header
pub(crate) async fn fetch_checked(
    fetcher: &dyn Fetcher,
    url: &ModuleUrl,
    method: FetchMethod,
    accept: &str,
) -> FetchResult {
    log::debug!("fetching {} {}", method, url);
    let mut headers = HashMap::new();
    headers.insert("Accept".to_string(), vec![accept.to_string()]);
    let request = FetchRequest::new(url, method, headers);
    let response = fetcher.fetch(request).await?;
    if response.is_ok() {
        Ok(response)
    } else {
        let status = response.get_http_status();
        log::debug!("fetching {} {} failed with status {}", method, url, status);
        Err(ModuleError::Fetch {
            url: url.to_string(),
            status,
        })
    }
}

#[cfg(test)]
pub mod tests {
    use crate::features::fetch::request::{FetchMethod, FetchRequest};
    use crate::features::fetch::response::{read_text, BufferedResponse, FetchResponse};
    use crate::features::fetch::{fetch_checked, FetchResult, Fetcher, ProviderFetcher};
    use crate::moduleerror::ModuleError;
    use crate::resolver::ModuleUrl;
use crate::utils::helper_tasks::add_helper_task_blocking;

    #[tokio::test]
    async fn test_provider_fetcher() {
        let fetcher = ProviderFetcher::new(|req: &FetchRequest| -> FetchResult {
            assert_eq!(req.get_header("accept").to_vec(), vec!["text/javascript".to_string()]);
            if req.get_url().as_str().ends_with("missing.js") {
                Ok(Box::new(BufferedResponse::new(404)))
            } else {
                let res: Box<dyn FetchResponse> = Box::new(
                    BufferedResponse::new(200).body(format!("{} {}", req.get_method(), req.get_url())),
                );
                Ok(res)
            }
        });

        let url = ModuleUrl::parse("https://h/a.js").ok().unwrap();
        let mut res = fetch_checked(&fetcher, &url, FetchMethod::Get, "text/javascript")
            .await
            .ok()
            .expect("fetch failed");
        assert_eq!(read_text(res.as_mut()), "GET https://h/a.js");

        let url = ModuleUrl::parse("https://h/missing.js").ok().unwrap();
        let res = fetch_checked(&fetcher, &url, FetchMethod::Head, "text/javascript").await;
        assert_eq!(res.err().and_then(|e| e.get_status()), Some(404));
    }

    #[tokio::test]
    async fn test_provider_panic_is_network_error() {
        let fetcher = ProviderFetcher::new(|_req: &FetchRequest| -> FetchResult {
            panic!("provider blew up")
        });
        let url = ModuleUrl::parse("https://h/a.js").ok().unwrap();
        let res = fetcher.fetch(FetchRequest::new(&url, FetchMethod::Get, Default::default()));
        match res.await {
            Err(ModuleError::Network { url, .. }) => assert_eq!(url, "https://h/a.js"),
            _ => panic!("expected a NetworkError"),
        }
    }

    #[test]
    fn test_provider_fetcher_without_runtime() {
        let fetcher = ProviderFetcher::new(|req: &FetchRequest| -> FetchResult {
            let res: Box<dyn FetchResponse> =
                Box::new(BufferedResponse::new(200).body(req.get_url().to_string()));
            Ok(res)
        });
        let url = ModuleUrl::parse("https://h/a.css").ok().unwrap();
        let mut res = futures::executor::block_on(fetch_checked(
            &fetcher,
            &url,
            FetchMethod::Get,
            "text/css",
        ))
        .ok()
        .expect("fetch failed");
        assert_eq!(read_text(res.as_mut()), "https://h/a.css");
    }
}
