/// How an out-of-range channel result is stored in a byte.
///
/// `Wrap` reproduces plain 8-bit storage: the value is truncated toward zero
/// and wrapped modulo 256, so `256.0` stores as `0` and `-1.0` as `255`.
/// `Clamp` rounds to nearest and saturates to `[0, 255]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overflow {
    /// Truncate, then wrap modulo 256.
    #[default]
    Wrap,
    /// Round, then saturate to `[0, 255]`.
    Clamp,
}

impl Overflow {
    /// Store a computed channel value as a byte.
    #[inline]
    pub fn store(self, v: f64) -> u8 {
        match self {
            // `as i64` truncates toward zero (NaN -> 0), `as u8` keeps the low byte.
            Self::Wrap => (v as i64) as u8,
            Self::Clamp => v.round().clamp(0.0, 255.0) as u8,
        }
    }
}
