use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use metrics::counter;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

use crate::api::StoreError;
use crate::record::Record;
use crate::stores::{parse_bytes, RecordStore, RecordStream};

/// Append-only history file, one JSON record per line.
pub struct FileStore {
    path: PathBuf,
    // Held for the whole of an append so lines never interleave.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> FileStore {
        let path = path.into();
        info!("storing captured requests in {}", path.display());

        FileStore {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Something a whole line can be appended to and rolled back from.
#[async_trait]
trait AppendTarget: AsyncWrite + Unpin + Send {
    async fn len(&self) -> io::Result<u64>;
    async fn truncate(&mut self, len: u64) -> io::Result<()>;
}

#[async_trait]
impl AppendTarget for File {
    async fn len(&self) -> io::Result<u64> {
        Ok(self.metadata().await?.len())
    }

    async fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len).await
    }
}

async fn write_line<W: AsyncWrite + Unpin>(target: &mut W, line: &[u8]) -> io::Result<()> {
    target.write_all(line).await?;
    target.flush().await
}

/// Write `line` at the end of `target`. On failure the target is cut back to
/// its previous length so no partial line is left behind.
async fn append_line<T: AppendTarget>(target: &mut T, line: &[u8]) -> io::Result<()> {
    let length = target.len().await?;

    if let Err(err) = write_line(target, line).await {
        if let Err(truncate_err) = target.truncate(length).await {
            error!("failed to truncate after a failed append: {}", truncate_err);
        }
        return Err(err);
    }
    Ok(())
}

fn records<R>(reader: R) -> RecordStream
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    // Lines are framed as raw bytes so that one line of invalid UTF-8 is
    // skipped like any other malformed record.
    stream::unfold(Some((reader, 0usize)), |state| async move {
        let Some((mut reader, mut number)) = state else {
            return None;
        };
        let mut buf = Vec::new();
        loop {
            number += 1;
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => return None,
                Ok(_) => {
                    let line = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
                    let line = line.strip_suffix(b"\r").unwrap_or(line);
                    if let Some(record) = parse_bytes(number, line) {
                        return Some((Ok(record), Some((reader, number))));
                    }
                }
                // Stop at the first read error rather than spinning on it.
                Err(err) => return Some((Err(StoreError::Read(err)), None)),
            }
        }
    })
    .boxed()
}

#[async_trait]
impl RecordStore for FileStore {
    #[instrument(skip_all)]
    async fn append(&self, record: &Record) -> Result<(), StoreError> {
        let mut line = record.to_line();
        line.push('\n');

        let _guard = self.write_lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(StoreError::Write)?;
        append_line(&mut file, line.as_bytes())
            .await
            .map_err(StoreError::Write)?;

        counter!("tryout_records_stored_total").increment(1);
        Ok(())
    }

    #[instrument(skip_all)]
    async fn all(&self) -> Result<RecordStream, StoreError> {
        let file = match File::open(&self.path).await {
            Ok(file) => file,
            // Nothing has been captured yet.
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(stream::empty().boxed())
            }
            Err(err) => return Err(StoreError::Read(err)),
        };

        let metadata = file.metadata().await.map_err(StoreError::Read)?;
        if !metadata.is_file() {
            return Err(StoreError::Read(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", self.path.display()),
            )));
        }

        Ok(records(BufReader::new(file)))
    }
}
