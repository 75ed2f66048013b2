use crate::dispatcher::ContentKind;
use crate::features::fetch::fetch_checked;
use crate::features::fetch::request::FetchMethod;
use crate::features::fetch::response::read_text;
use crate::loaders::{ContentLoader, LoaderContext};
use crate::moduleerror::ModuleError;
use crate::resolver::ModuleUrl;
use crate::stylesheet::StyleSheet;
use crate::values::{Exports, ModuleValue};
use futures::future::BoxFuture;
use futures::FutureExt;

/// stylesheet modules export a constructed stylesheet as their default
pub struct StyleSheetLoader {}

impl ContentLoader for StyleSheetLoader {
    fn kind(&self) -> ContentKind {
        ContentKind::StyleSheet
    }

    fn load<'a>(
        &'a self,
        context: &'a LoaderContext,
        url: &'a ModuleUrl,
    ) -> BoxFuture<'a, Result<Exports, ModuleError>> {
        async move {
            let mut response =
                fetch_checked(context.fetcher.as_ref(), url, FetchMethod::Get, self.kind().mime())
                    .await?;
            let css = read_text(response.as_mut());
            let sheet = StyleSheet::from_css(url.clone(), css.as_str());
            Ok(Exports::with_default(ModuleValue::StyleSheet(sheet)))
        }
        .boxed()
    }
}
