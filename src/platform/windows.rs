use super::permission_bits;
use std::fs::Metadata;

/// Windows only exposes the read-only attribute, so the bits are either
/// `r--r--r--` or `rw-rw-rw-`.
pub fn mode_string(metadata: &Metadata) -> String {
    let kind = if metadata.is_dir() {
        'd'
    } else if metadata.file_type().is_symlink() {
        'L'
    } else {
        '-'
    };
    let bits = if metadata.permissions().readonly() {
        0o444
    } else {
        0o666
    };
    format!("{}{}", kind, permission_bits(bits))
}
