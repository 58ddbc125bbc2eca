use crate::error::StatsError;
use crate::log;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use zstd::stream::read::Decoder as ZstdDecoder;

pub type ArchiveInput = Box<dyn BufRead>;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CompressionMode {
    #[default]
    Plain,
    Zstd,
}

impl CompressionMode {
    pub fn parse(raw: &str) -> Result<Self, StatsError> {
        let normalized = raw.trim();
        if normalized.eq_ignore_ascii_case("zstd") {
            Ok(Self::Zstd)
        } else if normalized.eq_ignore_ascii_case("plain") {
            Ok(Self::Plain)
        } else {
            Err(StatsError::InvalidCompression(normalized.to_string()))
        }
    }

    /// `.zst` archives are zstd-compressed, everything else is plain text.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("zst") => Self::Zstd,
            _ => Self::Plain,
        }
    }
}

/// Opens an archive for sequential line reading.
pub fn open_archive(
    path: &Path,
    compression: Option<CompressionMode>,
) -> Result<ArchiveInput, StatsError> {
    let compression = compression.unwrap_or_else(|| CompressionMode::detect(path));

    let file = File::open(path).map_err(|source| {
        let err = StatsError::Open {
            path: path.to_path_buf(),
            source,
        };
        log::error(err.to_string());
        err
    })?;

    match compression {
        CompressionMode::Plain => Ok(Box::new(BufReader::new(file))),
        CompressionMode::Zstd => ZstdDecoder::new(file)
            .map(|decoder| Box::new(BufReader::new(decoder)) as ArchiveInput)
            .map_err(|source| StatsError::Decoder {
                path: path.to_path_buf(),
                source,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn test_parse_compression_mode_case_insensitive() {
        assert_eq!(CompressionMode::parse("zstd").unwrap(), CompressionMode::Zstd);
        assert_eq!(CompressionMode::parse(" ZSTD ").unwrap(), CompressionMode::Zstd);
        assert_eq!(CompressionMode::parse("Plain").unwrap(), CompressionMode::Plain);
    }

    #[test]
    fn test_parse_compression_mode_rejects_unsupported_value() {
        let err = CompressionMode::parse("gzip").unwrap_err();
        assert!(matches!(err, StatsError::InvalidCompression(ref v) if v == "gzip"));
        assert!(CompressionMode::parse("").is_err());
    }

    #[test]
    fn test_detect_compression_from_extension() {
        assert_eq!(
            CompressionMode::detect(Path::new("lichess_2024-01.pgn.zst")),
            CompressionMode::Zstd
        );
        assert_eq!(
            CompressionMode::detect(Path::new("twic1520.pgn")),
            CompressionMode::Plain
        );
        assert_eq!(CompressionMode::detect(Path::new("archive")), CompressionMode::Plain);
    }

    #[test]
    fn test_open_missing_archive_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("does-not-exist.pgn");
        let err = match open_archive(&path, None) {
            Ok(_) => panic!("opening a missing file should fail"),
            Err(err) => err,
        };
        match err {
            StatsError::Open { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_open_zstd_archive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("compressed.pgn.zst");
        let compressed = zstd::stream::encode_all("[Event \"Z\"]\n".as_bytes(), 3).unwrap();
        std::fs::write(&path, compressed).unwrap();

        let mut text = String::new();
        open_archive(&path, None)
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "[Event \"Z\"]\n");
    }

    #[test]
    fn test_open_plain_archive_with_explicit_mode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.zst");
        std::fs::write(&path, "[Event \"P\"]\n").unwrap();

        let mut text = String::new();
        open_archive(&path, Some(CompressionMode::Plain))
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "[Event \"P\"]\n");
    }
}
