// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    io::{self, SeekFrom},
    path::{Path, PathBuf},
};

use log::debug;
use tokio::{
    fs,
    io::{AsyncReadExt as _, AsyncSeekExt as _, AsyncWriteExt as _},
};

use crate::error::Result;

/// A plain text file in the GnuPG home directory that is only ever read
/// line by line or appended to, like `sshcontrol` and `gpg-agent.conf`.
pub(crate) struct LineFile {
    path: PathBuf,
}

impl LineFile {
    pub(crate) fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `None` if the file does not exist.
    pub(crate) async fn read_lines(&self) -> Result<Option<Vec<String>>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content.lines().map(str::to_owned).collect())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Appends one line, creating the file if needed. A missing newline at
    /// the end of the existing content is added first so the new line does
    /// not get glued onto the previous one.
    pub(crate) async fn append_line(&self, line: &str) -> Result<()> {
        let mut file = fs::OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .await?;

        let mut content = String::with_capacity(line.len() + 2);
        if file.metadata().await?.len() > 0 {
            let mut last = [0_u8; 1];
            _ = file.seek(SeekFrom::End(-1)).await?;
            _ = file.read_exact(&mut last).await?;
            if last[0] != b'\n' {
                content.push('\n');
            }
        }
        content.push_str(line);
        content.push('\n');

        debug!("Appending {:?} to {}", line, self.path.display());
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_none() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = LineFile::new(dir.path().join("sshcontrol"));

        assert_eq!(file.read_lines().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn append_creates_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = LineFile::new(dir.path().join("sshcontrol"));
        file.append_line("AAAA").await?;
        file.append_line("BBBB").await?;

        assert_eq!(
            file.read_lines().await?,
            Some(vec!["AAAA".to_owned(), "BBBB".to_owned()])
        );
        assert_eq!(std::fs::read_to_string(file.path())?, "AAAA\nBBBB\n");
        Ok(())
    }

    #[tokio::test]
    async fn append_after_unterminated_line() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("gpg-agent.conf");
        std::fs::write(&path, "default-cache-ttl 600")?;
        LineFile::new(&path).append_line("enable-putty-support").await?;

        assert_eq!(
            std::fs::read_to_string(&path)?,
            "default-cache-ttl 600\nenable-putty-support\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn read_lines_handles_crlf() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("sshcontrol");
        std::fs::write(&path, "# comment\r\nAAAA 0\r\n\r\nBBBB")?;

        assert_eq!(
            LineFile::new(&path).read_lines().await?,
            Some(vec![
                "# comment".to_owned(),
                "AAAA 0".to_owned(),
                String::new(),
                "BBBB".to_owned(),
            ])
        );
        Ok(())
    }
}
