//! Streamed GET of one blob into a local file.

use std::cell::Cell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::client::{is_success, status_from_header_line, BlobClient};
use crate::error::DownloadError;

/// Downloads `url` into `dest`, overwriting any existing file. Returns bytes written.
///
/// The file is created on the first body chunk of a 2xx response (or after
/// the transfer for an empty body), so a failed status never leaves a file behind.
/// A transport error mid-body leaves the partial file in place.
pub(crate) fn download_to_file(
    client: &BlobClient,
    url: &str,
    dest: &Path,
) -> Result<u64, DownloadError> {
    let status: Cell<Option<u32>> = Cell::new(None);
    let mut out: Option<BufWriter<File>> = None;
    let mut write_err: Option<DownloadError> = None;
    let mut written = 0u64;

    let mut easy = client.easy(url)?;
    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|line| {
            if let Some(code) = status_from_header_line(line) {
                status.set(Some(code));
            }
            true
        })?;
        transfer.write_function(|data| {
            if !status.get().is_some_and(is_success) {
                return Ok(0); // abort transfer
            }
            if out.is_none() {
                match File::create(dest) {
                    Ok(f) => out = Some(BufWriter::new(f)),
                    Err(source) => {
                        write_err = Some(DownloadError::Create {
                            path: dest.display().to_string(),
                            source,
                        });
                        return Ok(0);
                    }
                }
            }
            if let Some(w) = out.as_mut() {
                if let Err(source) = w.write_all(data) {
                    write_err = Some(DownloadError::Write {
                        path: dest.display().to_string(),
                        source,
                    });
                    return Ok(0);
                }
            }
            written += data.len() as u64;
            Ok(data.len())
        })?;
        transfer.perform()
    };

    if let Some(err) = write_err {
        return Err(err);
    }
    let code = easy.response_code()?;
    if let Err(err) = performed {
        if err.is_write_error() && !is_success(code) {
            return Err(DownloadError::Status(code));
        }
        return Err(err.into());
    }
    if !is_success(code) {
        return Err(DownloadError::Status(code));
    }

    let mut writer = match out {
        Some(w) => w,
        None => BufWriter::new(File::create(dest).map_err(|source| DownloadError::Create {
            path: dest.display().to_string(),
            source,
        })?),
    };
    writer.flush().map_err(|source| DownloadError::Write {
        path: dest.display().to_string(),
        source,
    })?;

    Ok(written)
}
