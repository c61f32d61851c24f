use super::IconFetcher;
use crate::error::{IconError, IconResult};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::path::{Path, PathBuf};

/// Reads icons from an asset directory on disk (`<root>/<name>.<extension>`)
#[derive(Debug, Clone)]
pub struct LocalAssetFetcher {
    root: PathBuf,
    extension: String,
}

impl LocalAssetFetcher {
    pub fn new(root: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            root: root.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the file path for a name, refusing anything that could escape the root
    pub fn icon_path(&self, name: &str) -> IconResult<PathBuf> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
            || name.contains('\0')
        {
            return Err(IconError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(format!("{}.{}", name, self.extension)))
    }
}

impl IconFetcher for LocalAssetFetcher {
    fn fetch(&self, name: &str) -> BoxFuture<'static, IconResult<String>> {
        let path = self.icon_path(name);

        async move {
            let path = path?;
            log::debug!("Reading icon from {:?}", path);
            Ok(tokio::fs::read_to_string(&path).await?)
        }
        .boxed()
    }
}
