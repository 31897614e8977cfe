#[cfg(target_os = "windows")]
pub mod windows;

use std::fs::Metadata;

/// Render a file's type and permission bits as a ten character string,
/// `-rw-r--r--` style.
#[cfg(target_os = "windows")]
pub fn mode_string(metadata: &Metadata) -> String {
    windows::mode_string(metadata)
}

#[cfg(unix)]
pub fn mode_string(metadata: &Metadata) -> String {
    use std::os::unix::fs::{FileTypeExt, PermissionsExt};

    let file_type = metadata.file_type();
    let kind = if file_type.is_dir() {
        'd'
    } else if file_type.is_symlink() {
        'L'
    } else if file_type.is_fifo() {
        'p'
    } else if file_type.is_socket() {
        'S'
    } else if file_type.is_block_device() {
        'D'
    } else if file_type.is_char_device() {
        'c'
    } else {
        '-'
    };

    let mut out = String::with_capacity(10);
    out.push(kind);
    out.push_str(&permission_bits(metadata.permissions().mode()));
    out
}

#[cfg(not(any(unix, target_os = "windows")))]
pub fn mode_string(metadata: &Metadata) -> String {
    let kind = if metadata.is_dir() { 'd' } else { '-' };
    let bits = if metadata.permissions().readonly() {
        0o444
    } else {
        0o666
    };
    format!("{}{}", kind, permission_bits(bits))
}

/// The `rwxrwxrwx` part for the low nine bits of `mode`.
pub fn permission_bits(mode: u32) -> String {
    const FLAGS: [char; 3] = ['r', 'w', 'x'];
    (0..9)
        .map(|i| {
            if mode & (1 << (8 - i)) != 0 {
                FLAGS[i % 3]
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_bits() {
        assert_eq!(permission_bits(0o644), "rw-r--r--");
        assert_eq!(permission_bits(0o755), "rwxr-xr-x");
        assert_eq!(permission_bits(0o000), "---------");
        assert_eq!(permission_bits(0o100777), "rwxrwxrwx");
    }

    #[cfg(unix)]
    #[test]
    fn test_mode_string_for_file_and_dir() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o640)).unwrap();

        let file_mode = mode_string(&std::fs::metadata(&file).unwrap());
        assert_eq!(file_mode, "-rw-r-----");

        let dir_mode = mode_string(&std::fs::metadata(dir.path()).unwrap());
        assert!(dir_mode.starts_with('d'));
        assert_eq!(dir_mode.len(), 10);
    }
}
