//! Banner text handling.
//!
//! Services like SSH, FTP, and SMTP send a greeting line as soon as a
//! connection opens. The prober captures those raw bytes; this module turns
//! them into displayable text.

/// Maximum number of banner bytes kept from a single read.
pub const MAX_BANNER_BYTES: usize = 512;

/// Decode captured banner bytes into text.
///
/// Decoding is lossy: undecodable sequences become replacement characters
/// rather than failing the probe. Carriage returns are stripped, input is
/// capped at [`MAX_BANNER_BYTES`]. Returns `None` when nothing printable
/// survives.
pub fn decode(data: &[u8]) -> Option<String> {
    let data = &data[..data.len().min(MAX_BANNER_BYTES)];
    let text: String = String::from_utf8_lossy(data)
        .chars()
        .filter(|&c| c != '\r')
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// First line of a banner, for single-line display contexts.
pub fn first_line(banner: &str) -> &str {
    banner.lines().next().unwrap_or("").trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_greeting() {
        let data = b"SSH-2.0-OpenSSH_9.6\r\n";
        assert_eq!(decode(data), Some("SSH-2.0-OpenSSH_9.6\n".to_string()));
    }

    #[test]
    fn test_decode_strips_all_carriage_returns() {
        let data = b"220 mail.example.com ESMTP\r\n250 ok\r\n";
        let banner = decode(data).unwrap();
        assert!(!banner.contains('\r'));
        assert!(banner.contains('\n'));
    }

    #[test]
    fn test_decode_invalid_utf8_is_best_effort() {
        let data = b"\xff\xfehello";
        let banner = decode(data).unwrap();
        assert!(banner.contains("hello"));
    }

    #[test]
    fn test_decode_empty_and_whitespace() {
        assert_eq!(decode(b""), None);
        assert_eq!(decode(b"\r\r\n  \n"), None);
    }

    #[test]
    fn test_decode_caps_length() {
        let data = vec![b'a'; 2048];
        let banner = decode(&data).unwrap();
        assert_eq!(banner.len(), MAX_BANNER_BYTES);
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("HTTP/1.0 200 OK\nServer: nginx\n"), "HTTP/1.0 200 OK");
        assert_eq!(first_line("single"), "single");
        assert_eq!(first_line(""), "");
    }
}
