use sha2::{Digest, Sha256};

/// Series colors, ordered so neighbouring entries contrast.
pub const PALETTE: [&str; 12] = [
    "#4fb3ff", "#63d0a8", "#ffb347", "#ff6b6b", "#b48cff", "#f7d154", "#4dd4e0", "#ff8fc7",
    "#9ccc65", "#ff9f5a", "#7f9cff", "#d4a373",
];

/// Stable color for a group key.
pub fn color_for_key(key: &str) -> &'static str {
    let digest = Sha256::digest(key.as_bytes());
    let n = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    PALETTE[n as usize % PALETTE.len()]
}
