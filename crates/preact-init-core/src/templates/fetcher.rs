//! Template fetching from git hosts
//!
//! Hosted shorthands are downloaded as zip archives over HTTPS unless SSH is
//! requested, in which case the repository is cloned. Direct URLs are cloned,
//! except `.zip` URLs which are downloaded.

use super::source::TemplateSource;
use crate::error::{InitError, Result};
use std::future::Future;
use std::io::{self, Cursor};
use std::path::Path;
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use zip::ZipArchive;

/// Collaborator that populates a directory with a template's files
pub trait Fetcher {
    /// Fetch `template` into `destination`, which already exists.
    fn fetch(
        &self,
        template: &str,
        destination: &Path,
        use_ssh: bool,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Production fetcher: git clone or HTTP archive download
pub struct GitFetcher {
    client: reqwest::Client,
}

impl GitFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(user_agent: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    async fn download_archive(&self, url: &str, destination: &Path) -> std::result::Result<(), String> {
        tracing::debug!(url, "downloading template archive");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {} from {}", response.status(), url));
        }

        let bytes = response.bytes().await.map_err(|e| e.to_string())?.to_vec();
        let destination = destination.to_path_buf();
        let written = tokio::task::spawn_blocking(move || extract_archive(&bytes, &destination))
            .await
            .map_err(|e| e.to_string())??;

        tracing::debug!(url, files = written, "archive extracted");
        Ok(())
    }

    async fn clone_repository(
        &self,
        source: &TemplateSource,
        destination: &Path,
        use_ssh: bool,
    ) -> std::result::Result<(), String> {
        let url = source.clone_url(use_ssh);
        tracing::debug!(%url, "cloning template repository");

        // Clone next to the destination so the final move is a rename
        let parent = destination.parent().unwrap_or_else(|| Path::new("."));
        let staging = tempfile::Builder::new()
            .prefix(".preact-init-")
            .tempdir_in(parent)
            .map_err(|e| format!("failed to create staging directory: {}", e))?;
        let checkout = staging.path().join("checkout");

        let mut command = Command::new("git");
        command.arg("clone").arg("--depth").arg("1");
        if let Some(reference) = source.reference() {
            command.arg("--branch").arg(reference);
        }
        command
            .arg(&url)
            .arg(&checkout)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let output = command.output().await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => "git is not installed".to_string(),
            _ => format!("failed to execute git clone: {}", e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.lines().last().unwrap_or("").trim().to_string();
            return Err(format!(
                "git clone exited with code {}: {}",
                output.status.code().unwrap_or(-1),
                detail
            ));
        }

        match fs::remove_dir_all(checkout.join(".git")).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(format!("failed to remove .git: {}", e)),
        }

        move_entries(&checkout, destination)
            .await
            .map_err(|e| format!("failed to move cloned files: {}", e))
    }
}

impl Fetcher for GitFetcher {
    async fn fetch(&self, template: &str, destination: &Path, use_ssh: bool) -> Result<()> {
        let fetch_error = |reason: String| InitError::Fetch {
            template: template.to_string(),
            reason,
        };

        let source: TemplateSource = template.parse().map_err(fetch_error)?;

        let archive = match &source {
            TemplateSource::Hosted { .. } if use_ssh => None,
            _ => source.archive_url(),
        };

        let result = match archive {
            Some(url) => self.download_archive(&url, destination).await,
            None => self.clone_repository(&source, destination, use_ssh).await,
        };

        result.map_err(fetch_error)
    }
}

/// Move every entry of `from` into `to`, replacing existing entries
async fn move_entries(from: &Path, to: &Path) -> io::Result<()> {
    let mut entries = fs::read_dir(from).await?;
    while let Some(entry) = entries.next_entry().await? {
        let target = to.join(entry.file_name());
        if let Ok(metadata) = fs::symlink_metadata(&target).await {
            if metadata.is_dir() {
                fs::remove_dir_all(&target).await?;
            } else {
                fs::remove_file(&target).await?;
            }
        }
        fs::rename(entry.path(), &target).await?;
    }
    Ok(())
}

/// Extract a zip archive into `destination`, dropping the archive's
/// top-level directory. Returns the number of files written.
fn extract_archive(bytes: &[u8], destination: &Path) -> std::result::Result<usize, String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| format!("invalid zip archive: {}", e))?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(|e| e.to_string())?;

        let Some(relative) = file
            .enclosed_name()
            .map(|path| path.components().skip(1).collect::<std::path::PathBuf>())
        else {
            tracing::warn!(entry = file.name(), "skipping unsafe archive path");
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }

        let target = destination.join(&relative);
        if file.is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| e.to_string())?;
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let mut out = std::fs::File::create(&target)
            .map_err(|e| format!("failed to write {}: {}", target.display(), e))?;
        io::copy(&mut file, &mut out).map_err(|e| e.to_string())?;

        #[cfg(unix)]
        if let Some(mode) = file.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&target, std::fs::Permissions::from_mode(mode & 0o777))
                .map_err(|e| e.to_string())?;
        }

        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_zip(files: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options = SimpleFileOptions::default();
            for (path, content) in files {
                zip.start_file(*path, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer
    }

    #[test]
    fn test_extract_strips_top_level_directory() {
        let bytes = build_zip(&[
            ("starter-master/package.json", "{}"),
            ("starter-master/src/index.js", "console.log(1)"),
        ]);
        let tmp = tempfile::tempdir().unwrap();

        let written = extract_archive(&bytes, tmp.path()).unwrap();
        assert_eq!(written, 2);
        assert!(tmp.path().join("package.json").is_file());
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("src/index.js")).unwrap(),
            "console.log(1)"
        );
    }

    #[test]
    fn test_extract_rejects_garbage() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(extract_archive(b"not a zip", tmp.path()).is_err());
    }

    #[tokio::test]
    async fn test_move_entries_replaces_existing() {
        let tmp = tempfile::tempdir().unwrap();
        let from = tmp.path().join("from");
        let to = tmp.path().join("to");
        std::fs::create_dir_all(from.join("src")).unwrap();
        std::fs::create_dir_all(&to).unwrap();
        std::fs::write(from.join("README.md"), "template").unwrap();
        std::fs::write(to.join("README.md"), "existing").unwrap();

        move_entries(&from, &to).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(to.join("README.md")).unwrap(),
            "template"
        );
        assert!(to.join("src").is_dir());
    }

    #[tokio::test]
    async fn test_unparsable_source_is_fetch_error() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = GitFetcher::new("preact-init-test");
        let err = fetcher
            .fetch("not a source", tmp.path(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, InitError::Fetch { ref template, .. } if template == "not a source"));
    }
}
