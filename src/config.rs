use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_MAX_UPLOAD: usize = 16 * 1024 * 1024;

/// Web server settings. Every flag can also come from the environment or a
/// `.env` file.
#[derive(Parser, Debug, Clone)]
#[command(name = "qrstudio", about = "Styled QR code generator (web form)")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "QRSTUDIO_ADDR", default_value = "127.0.0.1:5000")]
    pub addr: SocketAddr,

    /// Where uploads and downloaded images are kept
    #[arg(long, env = "QRSTUDIO_UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Largest accepted request body in bytes
    #[arg(long, env = "QRSTUDIO_MAX_UPLOAD", default_value_t = DEFAULT_MAX_UPLOAD)]
    pub max_upload_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::parse_from([
            "qrstudio",
            "--addr",
            "0.0.0.0:8080",
            "--upload-dir",
            "/tmp/qr",
            "--max-upload-bytes",
            "1024",
        ]);
        assert_eq!(config.addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/qr"));
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn rejects_bad_address() {
        assert!(ServerConfig::try_parse_from(["qrstudio", "--addr", "nowhere"]).is_err());
    }
}
